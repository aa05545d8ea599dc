//! Configuration schema types for `tilechip.toml`
//!
//! Describes the destination chips an import writes into.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::chips::{ChipSet, ColorChip, SpriteChip, EMPTY_INDEX};
use crate::color::{Color, DEFAULT_MASK_COLOR};

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Directory for `colors.json` and `sprites.json`
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

/// Color chip settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorsConfig {
    /// Palette capacity
    #[serde(default = "default_max_colors")]
    pub max_colors: usize,
    /// Color treated as transparent; never matched and never admitted
    #[serde(default = "default_mask_color")]
    pub mask_color: Color,
    /// Slots visible to imports; defaults to `max_colors`. Slots past the
    /// end of `palette` start unset and can take new colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_colors: Option<usize>,
    /// Existing palette, slot by slot
    #[serde(default)]
    pub palette: Vec<Color>,
    /// Separate reference palette to match against instead of `palette`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_map: Option<Vec<Color>>,
}

fn default_max_colors() -> usize {
    256
}

fn default_mask_color() -> Color {
    DEFAULT_MASK_COLOR
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            max_colors: default_max_colors(),
            mask_color: default_mask_color(),
            used_colors: None,
            palette: Vec::new(),
            color_map: None,
        }
    }
}

/// Sprite chip settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpritesConfig {
    /// Sprite width in pixels
    #[serde(default = "default_sprite_size")]
    pub width: usize,
    /// Sprite height in pixels
    #[serde(default = "default_sprite_size")]
    pub height: usize,
    /// Backing texture width; capacity is derived from it
    #[serde(default = "default_texture_size")]
    pub texture_width: usize,
    /// Backing texture height
    #[serde(default = "default_texture_size")]
    pub texture_height: usize,
    /// Legal color indices per sprite
    #[serde(default = "default_colors_per_sprite")]
    pub colors_per_sprite: usize,
    /// Deduplicate sprites instead of keeping positions
    #[serde(default = "default_true")]
    pub unique: bool,
    /// Index that marks an empty pixel
    #[serde(default = "default_empty_index")]
    pub empty_index: i32,
}

fn default_sprite_size() -> usize {
    8
}

fn default_texture_size() -> usize {
    128
}

fn default_colors_per_sprite() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_empty_index() -> i32 {
    EMPTY_INDEX
}

impl Default for SpritesConfig {
    fn default() -> Self {
        Self {
            width: default_sprite_size(),
            height: default_sprite_size(),
            texture_width: default_texture_size(),
            texture_height: default_texture_size(),
            colors_per_sprite: default_colors_per_sprite(),
            unique: true,
            empty_index: default_empty_index(),
        }
    }
}

impl ColorsConfig {
    /// Used-color count after applying the `max_colors` default.
    pub fn used_colors(&self) -> usize {
        self.used_colors.unwrap_or(self.max_colors)
    }

    fn build_chip(&self, colors: &[Color]) -> ColorChip {
        let mut chip = ColorChip::from_colors(colors, self.max_colors, self.mask_color);
        chip.set_total_used_colors(self.used_colors());
        chip
    }
}

/// Complete `tilechip.toml` configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilechipConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default)]
    pub sprites: SpritesConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "sprites.width")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tilechip.toml: '{}' {}", self.field, self.message)
    }
}

impl TilechipConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.project.name.is_empty() {
            push("project.name", "must be a non-empty string".to_string());
        }

        let colors = &self.colors;
        if colors.max_colors == 0 {
            push("colors.max_colors", "must be a positive integer".to_string());
        }
        if colors.used_colors() > colors.max_colors {
            push(
                "colors.used_colors",
                format!("is {} but max_colors is {}", colors.used_colors(), colors.max_colors),
            );
        }
        if colors.palette.len() > colors.used_colors().min(colors.max_colors) {
            push(
                "colors.palette",
                format!(
                    "has {} colors but only {} slots are in use",
                    colors.palette.len(),
                    colors.used_colors().min(colors.max_colors)
                ),
            );
        }
        if let Some(ref map) = colors.color_map {
            if map.len() > colors.max_colors {
                push(
                    "colors.color_map",
                    format!("has {} colors but max_colors is {}", map.len(), colors.max_colors),
                );
            }
        }

        let sprites = &self.sprites;
        if sprites.width == 0 {
            push("sprites.width", "must be a positive integer".to_string());
        }
        if sprites.height == 0 {
            push("sprites.height", "must be a positive integer".to_string());
        }
        if sprites.texture_width < sprites.width || sprites.texture_height < sprites.height {
            push(
                "sprites.texture_width",
                format!(
                    "texture {}x{} cannot hold a single {}x{} sprite",
                    sprites.texture_width, sprites.texture_height, sprites.width, sprites.height
                ),
            );
        }
        if sprites.colors_per_sprite == 0 {
            push("sprites.colors_per_sprite", "must be a positive integer".to_string());
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Empty chips shaped by this configuration, seeded with its palettes.
    pub fn build_chips(&self) -> ChipSet {
        let colors = &self.colors;
        let color_chip = colors.build_chip(&colors.palette);

        let sprites = &self.sprites;
        let sprite_chip = SpriteChip::new(
            sprites.width,
            sprites.height,
            sprites.texture_width,
            sprites.texture_height,
        )
        .with_colors_per_sprite(sprites.colors_per_sprite)
        .with_unique(sprites.unique)
        .with_empty_index(sprites.empty_index);

        let chips = ChipSet::new(color_chip, sprite_chip);
        match colors.color_map {
            Some(ref map) => chips.with_color_map(colors.build_chip(map)),
            None => chips,
        }
    }
}
