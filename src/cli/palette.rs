//! Palette command implementation

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::color::Color;
use crate::config::CliOverrides;
use crate::import::{reconcile, SourceImage};

use super::{load_effective_config, ChipArgs, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Serialize)]
struct PaletteSlot {
    index: usize,
    color: Color,
    /// Color the slot held before reconciliation
    previous: Color,
}

#[derive(Serialize)]
struct PaletteReport {
    slots: Vec<PaletteSlot>,
    admitted: Vec<Color>,
    dropped: Vec<Color>,
}

/// Execute the palette command
pub fn run_palette(input: &Path, args: &ChipArgs, json: bool) -> ExitCode {
    let loaded = match load_effective_config(args, CliOverrides::default()) {
        Ok(l) => l,
        Err(e) => return e.report(),
    };
    let chips = loaded.config.build_chips();

    let image = match SourceImage::open(input, chips.mask_color()) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let reference = chips.reference_colors();
    let result = reconcile(&reference, image.palette(), chips.mask_color());
    let report = PaletteReport {
        slots: result
            .color_map
            .colors()
            .iter()
            .zip(&reference)
            .enumerate()
            .map(|(index, (&color, &previous))| PaletteSlot { index, color, previous })
            .collect(),
        admitted: result.admitted,
        dropped: result.dropped,
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!(
        "{}: {} image colors against {} palette slots",
        input.display(),
        image.palette().len(),
        reference.len()
    );
    for slot in &report.slots {
        if slot.color == slot.previous {
            println!("  {:>3}: {}", slot.index, slot.color);
        } else {
            println!("  {:>3}: {} (was {})", slot.index, slot.color, slot.previous);
        }
    }
    if !report.dropped.is_empty() {
        let dropped: Vec<String> = report.dropped.iter().map(|c| c.to_hex()).collect();
        println!("Dropped ({}): {}", dropped.len(), dropped.join(", "));
    }

    ExitCode::from(EXIT_SUCCESS)
}
