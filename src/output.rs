//! JSON persistence for chips and palette files

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::chips::{ColorChip, SpriteChip};
use crate::color::Color;

/// File name of the persisted color chip inside an output directory.
pub const COLORS_FILE: &str = "colors.json";
/// File name of the persisted sprite chip inside an output directory.
pub const SPRITES_FILE: &str = "sprites.json";
/// File name of the persisted reference palette, when one is configured.
pub const COLOR_MAP_FILE: &str = "colormap.json";

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// On-disk form of a [`ColorChip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChipFile {
    pub max_colors: usize,
    pub mask_color: Color,
    /// The used part of the palette; unset slots appear as the mask color.
    pub colors: Vec<Color>,
}

impl From<&ColorChip> for ColorChipFile {
    fn from(chip: &ColorChip) -> Self {
        Self {
            max_colors: chip.max_colors(),
            mask_color: chip.mask_color(),
            colors: chip.colors_used(),
        }
    }
}

impl ColorChipFile {
    pub fn into_chip(self) -> ColorChip {
        ColorChip::from_colors(&self.colors, self.max_colors, self.mask_color)
    }
}

/// One occupied sprite slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteEntry {
    pub index: usize,
    pub data: Vec<i32>,
}

/// On-disk form of a [`SpriteChip`]. Only occupied slots are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteChipFile {
    pub width: usize,
    pub height: usize,
    pub texture_width: usize,
    pub texture_height: usize,
    pub colors_per_sprite: usize,
    pub unique: bool,
    pub empty_index: i32,
    pub sprites: Vec<SpriteEntry>,
}

impl From<&SpriteChip> for SpriteChipFile {
    fn from(chip: &SpriteChip) -> Self {
        let sprites = chip
            .slots()
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref().map(|data| SpriteEntry { index, data: data.clone() })
            })
            .collect();
        Self {
            width: chip.width(),
            height: chip.height(),
            texture_width: chip.texture_width(),
            texture_height: chip.texture_height(),
            colors_per_sprite: chip.colors_per_sprite(),
            unique: chip.unique(),
            empty_index: chip.empty_index(),
            sprites,
        }
    }
}

impl SpriteChipFile {
    pub fn into_chip(self) -> SpriteChip {
        let mut chip =
            SpriteChip::new(self.width, self.height, self.texture_width, self.texture_height)
                .with_colors_per_sprite(self.colors_per_sprite)
                .with_unique(self.unique)
                .with_empty_index(self.empty_index);
        for entry in &self.sprites {
            chip.update_sprite_at(entry.index, &entry.data);
        }
        chip
    }
}

/// Write a value as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, OutputError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn write_color_chip(chip: &ColorChip, path: &Path) -> Result<(), OutputError> {
    write_json(&ColorChipFile::from(chip), path)
}

pub fn write_sprite_chip(chip: &SpriteChip, path: &Path) -> Result<(), OutputError> {
    write_json(&SpriteChipFile::from(chip), path)
}

pub fn read_color_chip(path: &Path) -> Result<ColorChip, OutputError> {
    read_json::<ColorChipFile>(path).map(ColorChipFile::into_chip)
}

pub fn read_sprite_chip(path: &Path) -> Result<SpriteChip, OutputError> {
    read_json::<SpriteChipFile>(path).map(SpriteChipFile::into_chip)
}

/// Read a palette from a `.json` array of color strings, or from an image
/// whose opaque pixels, in scan order, list the palette colors.
pub fn read_palette_file(path: &Path) -> Result<Vec<Color>, OutputError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        return read_json(path);
    }

    let image = image::open(path)?.to_rgba8();
    let mut seen = HashSet::new();
    Ok(image
        .pixels()
        .filter(|p| p[3] != 0)
        .map(|p| Color::from_rgba(*p))
        .filter(|c| seen.insert(*c))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_MASK_COLOR;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_sprite_chip_file_keeps_only_occupied_slots() {
        let mut chip = SpriteChip::new(1, 2, 4, 2).with_unique(false);
        chip.update_sprite_at(2, &[3, -1]);

        let file = SpriteChipFile::from(&chip);
        assert_eq!(file.sprites, vec![SpriteEntry { index: 2, data: vec![3, -1] }]);

        let restored = file.into_chip();
        assert_eq!(restored, chip);
    }

    #[test]
    fn test_color_chip_file_restores_used_count() {
        let chip = ColorChip::from_colors(&[Color::new(1, 1, 1), Color::new(2, 2, 2)], 8, DEFAULT_MASK_COLOR);
        let file = ColorChipFile::from(&chip);
        assert_eq!(file.colors.len(), 2);
        assert_eq!(file.into_chip(), chip);
    }

    #[test]
    fn test_write_creates_directories() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = temp.path().join("nested").join("out").join(COLORS_FILE);
        let chip = ColorChip::from_colors(&[Color::new(0, 0, 0)], 2, DEFAULT_MASK_COLOR);

        write_color_chip(&chip, &path).expect("should write color chip");
        let back = read_color_chip(&path).expect("should read color chip");
        assert_eq!(back, chip);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"#000000\""));
    }

    #[test]
    fn test_read_palette_json() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = temp.path().join("palette.json");
        fs::write(&path, r##"["#000000", "#ff0000", "white"]"##).unwrap();

        let palette = read_palette_file(&path).expect("should read palette");
        assert_eq!(palette, vec![Color::new(0, 0, 0), Color::new(255, 0, 0), Color::new(255, 255, 255)]);
    }

    #[test]
    fn test_read_palette_png_skips_transparent_and_repeats() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = temp.path().join("palette.png");
        let mut image = RgbaImage::from_pixel(4, 1, Rgba([0, 0, 255, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        image.put_pixel(2, 0, Rgba([9, 9, 9, 255]));
        image.save(&path).unwrap();

        let palette = read_palette_file(&path).expect("should read palette");
        assert_eq!(palette, vec![Color::new(0, 0, 255), Color::new(9, 9, 9)]);
    }
}
