//! Import command implementation

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::chips::ChipSet;
use crate::config::CliOverrides;
use crate::import::{import_image, ImportOptions, ImportReport, SourceImage};
use crate::output::{self, OutputError, COLORS_FILE, COLOR_MAP_FILE, SPRITES_FILE};

use super::{
    expand_inputs, is_png_file, load_effective_config, ChipArgs, EXIT_ERROR, EXIT_INVALID_ARGS,
    EXIT_SUCCESS,
};

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a Path,
    #[serde(flatten)]
    report: &'a ImportReport,
}

/// Execute the import command
pub fn run_import(
    inputs: &[PathBuf],
    args: &ChipArgs,
    overrides: CliOverrides,
    append: bool,
    json: bool,
) -> ExitCode {
    let files = expand_inputs(inputs);
    if files.is_empty() {
        eprintln!("Error: no PNG files found in the given inputs");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    if let Some(missing) = files.iter().find(|f| !f.exists()) {
        eprintln!("Error: input '{}' not found", missing.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    if let Some(other) = files.iter().find(|f| !is_png_file(f)) {
        eprintln!("Error: input '{}' is not a PNG file", other.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    // restored chips carry their own palette and mask
    if append && (args.mask.is_some() || args.palette.is_some()) {
        eprintln!("Error: --mask and --palette cannot be combined with --append");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let forced_unique = overrides.unique;
    let loaded = match load_effective_config(args, overrides) {
        Ok(l) => l,
        Err(e) => return e.report(),
    };
    let out_dir = loaded.out_dir();

    let mut chips = loaded.config.build_chips();
    if append {
        if let Err(e) = restore_chips(&mut chips, &out_dir) {
            eprintln!("Error: cannot resume from '{}': {}", out_dir.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        if let Some(unique) = forced_unique {
            chips.sprite_chip = chips.sprite_chip.with_unique(unique);
        }
    }

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        let image = match SourceImage::open(file, chips.mask_color()) {
            Ok(i) => i,
            Err(e) => {
                eprintln!("Error: {}: {}", file.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        };

        match import_image(&mut chips, &image, ImportOptions::default()) {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("Error: {}: {}", file.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = write_chips(&chips, &out_dir) {
        eprintln!("Error: Failed to write chips to '{}': {}", out_dir.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    if json {
        let entries: Vec<FileReport> = files
            .iter()
            .zip(&reports)
            .map(|(file, report)| FileReport { file: file.as_path(), report })
            .collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for (file, report) in files.iter().zip(&reports) {
            print_summary(file, report);
        }
        println!(
            "Wrote: {} ({} colors, {} of {} sprite slots used)",
            out_dir.display(),
            chips.color_chip.total_used_colors(),
            chips.sprite_chip.committed(),
            chips.sprite_chip.total_sprites()
        );
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn print_summary(file: &Path, report: &ImportReport) {
    println!(
        "Imported: {} ({} tiles: {} committed, {} duplicate, {} empty)",
        file.display(),
        report.tiles_total,
        report.tiles_committed,
        report.duplicates_skipped,
        report.empty_skipped
    );
    if !report.orphans_dropped.is_empty() {
        let dropped: Vec<String> = report.orphans_dropped.iter().map(|c| c.to_hex()).collect();
        println!("  Colors dropped (palette full): {}", dropped.join(", "));
    }
    if report.tiles_unwritten > 0 {
        println!("  Tiles not written (sprite chip full): {}", report.tiles_unwritten);
    }
    if report.undefined_pixels > 0 {
        println!("  Pixels without a palette slot: {}", report.undefined_pixels);
    }
    if report.out_of_range_indices > 0 {
        println!("  Pixels beyond colors per sprite: {}", report.out_of_range_indices);
    }
}

/// Replace the configured chips with ones written by an earlier import.
fn restore_chips(chips: &mut ChipSet, out_dir: &Path) -> Result<(), OutputError> {
    let colors = out_dir.join(COLORS_FILE);
    if colors.exists() {
        chips.color_chip = output::read_color_chip(&colors)?;
    }
    let color_map = out_dir.join(COLOR_MAP_FILE);
    if chips.color_map_chip.is_some() && color_map.exists() {
        chips.color_map_chip = Some(output::read_color_chip(&color_map)?);
    }
    let sprites = out_dir.join(SPRITES_FILE);
    if sprites.exists() {
        chips.sprite_chip = output::read_sprite_chip(&sprites)?;
    }
    Ok(())
}

fn write_chips(chips: &ChipSet, out_dir: &Path) -> Result<(), OutputError> {
    output::write_color_chip(&chips.color_chip, &out_dir.join(COLORS_FILE))?;
    if let Some(ref color_map) = chips.color_map_chip {
        output::write_color_chip(color_map, &out_dir.join(COLOR_MAP_FILE))?;
    }
    output::write_sprite_chip(&chips.sprite_chip, &out_dir.join(SPRITES_FILE))
}
