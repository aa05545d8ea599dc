//! Info command implementation

use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{CliOverrides, TilechipConfig};

use super::{load_effective_config, ChipArgs, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Serialize)]
struct Info<'a> {
    config_file: Option<&'a PathBuf>,
    out_dir: PathBuf,
    sprite_capacity: usize,
    #[serde(flatten)]
    config: &'a TilechipConfig,
}

/// Execute the info command
pub fn run_info(args: &ChipArgs, json: bool) -> ExitCode {
    let loaded = match load_effective_config(args, CliOverrides::default()) {
        Ok(l) => l,
        Err(e) => return e.report(),
    };
    let chips = loaded.config.build_chips();
    let info = Info {
        config_file: loaded.source.as_ref(),
        out_dir: loaded.out_dir(),
        sprite_capacity: chips.sprite_chip.total_sprites(),
        config: &loaded.config,
    };

    if json {
        return match serde_json::to_string_pretty(&info) {
            Ok(s) => {
                println!("{}", s);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    let config = &loaded.config;
    match info.config_file {
        Some(path) => println!("Config:   {}", path.display()),
        None => println!("Config:   (defaults)"),
    }
    println!("Project:  {}", config.project.name);
    println!("Output:   {}", info.out_dir.display());
    println!();
    println!("Colors");
    println!("  max colors:  {}", config.colors.max_colors);
    println!("  palette:     {} colors", chips.color_chip.total_used_colors());
    println!("  mask color:  {}", config.colors.mask_color);
    if let Some(ref map) = config.colors.color_map {
        println!("  color map:   {} colors", map.len());
    }
    println!();
    let sprites = &config.sprites;
    println!("Sprites");
    println!("  sprite size: {}x{}", sprites.width, sprites.height);
    println!("  texture:     {}x{}", sprites.texture_width, sprites.texture_height);
    println!("  capacity:    {} sprites", info.sprite_capacity);
    println!("  colors each: {}", sprites.colors_per_sprite);
    println!("  mode:        {}", if sprites.unique { "unique" } else { "non-unique" });
    println!("  empty index: {}", sprites.empty_index);

    ExitCode::from(EXIT_SUCCESS)
}
