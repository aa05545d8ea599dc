//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod import;
mod info;
mod palette;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::color::{parse_color, Color};
use crate::config::{self, CliOverrides, ConfigError, TilechipConfig};
use crate::output::read_palette_file;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Check if a path looks like a PNG image.
pub fn is_png_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Find all PNG files in a directory (recursively), sorted by path.
pub fn find_png_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let dir_str = dir.display().to_string();

    for pattern in [format!("{}/**/*.png", dir_str), format!("{}/**/*.PNG", dir_str)] {
        if let Ok(paths) = glob(&pattern) {
            files.extend(paths.filter_map(Result::ok));
        }
    }

    files.sort();
    files.dedup();
    files
}

/// Expand directories among `inputs` into the PNG files they contain.
/// Plain files are kept in the order given.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(find_png_files(input));
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Tilechip - Import images into fixed-capacity palette and sprite chips
#[derive(Parser)]
#[command(name = "tilechip")]
#[command(about = "Tilechip - Cut PNG images into deduplicated tiles over a shared palette")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that builds chips from configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ChipArgs {
    /// Path to tilechip.toml (default: search upward from the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Palette file replacing the configured palette (.json color list or image)
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Mask color treated as transparent (e.g. "#FF00FF", "magenta")
    #[arg(long, value_parser = parse_color)]
    pub mask: Option<Color>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import PNG images into the palette and sprite chips
    Import {
        /// Input PNG files or directories (searched recursively for *.png)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        chips: ChipArgs,

        /// Output directory for colors.json and sprites.json
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Deduplicate tiles against the whole sprite chip
        #[arg(long, conflicts_with = "non_unique")]
        unique: bool,

        /// Keep tile positions, skipping only empty tiles
        #[arg(long)]
        non_unique: bool,

        /// Continue from chips previously written to the output directory
        #[arg(long)]
        append: bool,

        /// Print the import reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how an image's palette reconciles against the chip palette
    Palette {
        /// Input PNG file
        input: PathBuf,

        #[command(flatten)]
        chips: ChipArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration and chip capacities
    Info {
        #[command(flatten)]
        chips: ChipArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Configuration with CLI overrides applied, plus the directory relative
/// paths in it are resolved against.
pub(crate) struct LoadedConfig {
    pub config: TilechipConfig,
    pub source: Option<PathBuf>,
    pub root: PathBuf,
}

impl LoadedConfig {
    /// Output directory, resolved against the project root.
    pub fn out_dir(&self) -> PathBuf {
        config::resolve_path(&self.root, &self.config.project.out)
    }
}

/// Failure to assemble the effective configuration.
pub(crate) enum SetupError {
    Config(ConfigError),
    /// A command-line argument could not be used
    InvalidArgs(String),
}

impl SetupError {
    pub fn report(&self) -> ExitCode {
        match self {
            SetupError::Config(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
            SetupError::InvalidArgs(msg) => {
                eprintln!("Error: {}", msg);
                ExitCode::from(EXIT_INVALID_ARGS)
            }
        }
    }
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

/// Load configuration for `args` and apply `overrides` on top of it.
pub(crate) fn load_effective_config(
    args: &ChipArgs,
    mut overrides: CliOverrides,
) -> Result<LoadedConfig, SetupError> {
    if let Some(ref path) = args.config {
        if !path.exists() {
            return Err(SetupError::InvalidArgs(format!(
                "config file '{}' not found",
                path.display()
            )));
        }
    }

    let source = args.config.clone().or_else(config::find_config);
    let mut config = config::load_config(source.as_deref())?;

    if let Some(ref palette_path) = args.palette {
        let palette = read_palette_file(palette_path).map_err(|e| {
            let path = palette_path.display();
            SetupError::InvalidArgs(format!("cannot read palette '{}': {}", path, e))
        })?;
        overrides.palette = Some(palette);
    }
    if args.mask.is_some() {
        overrides.mask_color = args.mask;
    }

    config::merge_cli_overrides(&mut config, &overrides);
    config::ensure_valid(&config)?;

    let root = match source.as_deref().and_then(Path::parent) {
        Some(parent) => parent.to_path_buf(),
        None => env::current_dir().map_err(ConfigError::Io)?,
    };

    Ok(LoadedConfig { config, source, root })
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    // RUST_LOG still wins over the flags
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Import { inputs, chips, out, unique, non_unique, append, json } => {
            let unique = match (unique, non_unique) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let overrides = CliOverrides { out, unique, ..Default::default() };
            import::run_import(&inputs, &chips, overrides, append, json)
        }
        Commands::Palette { input, chips, json } => palette::run_palette(&input, &chips, json),
        Commands::Info { chips, json } => info::run_info(&chips, json),
    }
}
