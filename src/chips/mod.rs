//! Destination chips for imported images
//!
//! A [`ColorChip`] holds the global palette and a [`SpriteChip`] holds the
//! fixed-size tiles. Both are fixed-capacity slot arrays that an import
//! job mutates in place; neither ever grows.

mod color_chip;
mod sprite_chip;

pub use color_chip::ColorChip;
pub use sprite_chip::{calculate_total_sprites, SpriteChip, EMPTY_INDEX};

use crate::color::Color;

/// The interface the tile writer needs from a destination tile store.
pub trait TileStore {
    /// Number of tile slots; no write lands at or beyond this index.
    fn total_capacity(&self) -> usize;

    fn tile_width(&self) -> usize;

    fn tile_height(&self) -> usize;

    /// Upper bound (exclusive) of legal color indices inside a tile.
    fn colors_per_tile(&self) -> usize;

    /// Slot of the first committed tile whose data equals `data`.
    fn find_exact_match(&self, data: &[i32]) -> Option<usize>;

    /// Lowest slot holding no tile; `None` when every slot is taken.
    fn first_free_slot(&self) -> Option<usize>;

    /// Whether every index in `data` is the store's mask index.
    fn is_empty(&self, data: &[i32]) -> bool;

    fn write_at(&mut self, index: usize, data: &[i32]);

    /// Default commit policy: deduplicate (`true`) or keep positions.
    fn unique(&self) -> bool;
}

/// The chips an import job reads from and writes to.
#[derive(Debug, Clone)]
pub struct ChipSet {
    pub color_chip: ColorChip,
    /// Optional separate reference palette used for matching instead of
    /// the main color chip's colors.
    pub color_map_chip: Option<ColorChip>,
    pub sprite_chip: SpriteChip,
}

impl ChipSet {
    pub fn new(color_chip: ColorChip, sprite_chip: SpriteChip) -> Self {
        Self { color_chip, color_map_chip: None, sprite_chip }
    }

    pub fn with_color_map(mut self, color_map_chip: ColorChip) -> Self {
        self.color_map_chip = Some(color_map_chip);
        self
    }

    /// The reference palette for reconciliation: the color-map chip when
    /// present, otherwise the main color chip, truncated to the main chip's
    /// used-color count.
    pub fn reference_colors(&self) -> Vec<Color> {
        let used = self.color_chip.total_used_colors();
        let source = self.color_map_chip.as_ref().unwrap_or(&self.color_chip);
        (0..used)
            .map(|i| source.get_color(i).unwrap_or(source.mask_color()))
            .collect()
    }

    /// Mask color of whichever chip supplies the reference palette.
    pub fn mask_color(&self) -> Color {
        self.color_map_chip.as_ref().unwrap_or(&self.color_chip).mask_color()
    }
}
