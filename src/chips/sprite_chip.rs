//! Fixed-capacity tile store

use log::warn;

use super::TileStore;

/// Index value that marks an undefined (transparent) pixel.
pub const EMPTY_INDEX: i32 = -1;

/// A grid of equally sized sprite slots laid out over a texture.
///
/// Capacity is `(texture_width / width) * (texture_height / height)`.
/// Each slot is either empty or holds `width * height` color indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteChip {
    width: usize,
    height: usize,
    texture_width: usize,
    texture_height: usize,
    colors_per_sprite: usize,
    unique: bool,
    empty_index: i32,
    slots: Vec<Option<Vec<i32>>>,
}

impl SpriteChip {
    /// A chip with unique mode on, 8 colors per sprite and `-1` as the
    /// empty index.
    pub fn new(width: usize, height: usize, texture_width: usize, texture_height: usize) -> Self {
        let capacity = calculate_total_sprites(texture_width, texture_height, width, height);
        Self {
            width,
            height,
            texture_width,
            texture_height,
            colors_per_sprite: 8,
            unique: true,
            empty_index: EMPTY_INDEX,
            slots: vec![None; capacity],
        }
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn with_colors_per_sprite(mut self, colors: usize) -> Self {
        self.colors_per_sprite = colors;
        self
    }

    pub fn with_empty_index(mut self, index: i32) -> Self {
        self.empty_index = index;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texture_width(&self) -> usize {
        self.texture_width
    }

    pub fn texture_height(&self) -> usize {
        self.texture_height
    }

    pub fn colors_per_sprite(&self) -> usize {
        self.colors_per_sprite
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    pub fn empty_index(&self) -> i32 {
        self.empty_index
    }

    pub fn total_sprites(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding data.
    pub fn committed(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Lowest slot holding no data.
    pub fn first_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn sprite_at(&self, index: usize) -> Option<&[i32]> {
        self.slots.get(index).and_then(|s| s.as_deref())
    }

    pub fn slots(&self) -> &[Option<Vec<i32>>] {
        &self.slots
    }

    /// Linear scan over committed slots; empty slots never match.
    pub fn find_sprite(&self, data: &[i32]) -> Option<usize> {
        self.slots.iter().position(|slot| slot.as_deref() == Some(data))
    }

    pub fn is_empty(&self, data: &[i32]) -> bool {
        data.iter().all(|&i| i == self.empty_index)
    }

    /// Writes are ignored when `index` is past the last slot or the data is
    /// not exactly one sprite long.
    pub fn update_sprite_at(&mut self, index: usize, data: &[i32]) {
        if data.len() != self.width * self.height {
            warn!(
                "sprite data has {} pixels, expected {}x{}; write to slot {} ignored",
                data.len(),
                self.width,
                self.height,
                index
            );
            return;
        }
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Some(data.to_vec()),
            None => warn!("sprite slot {} is outside the chip ({} slots)", index, self.slots.len()),
        }
    }
}

impl TileStore for SpriteChip {
    fn total_capacity(&self) -> usize {
        self.total_sprites()
    }

    fn tile_width(&self) -> usize {
        self.width
    }

    fn tile_height(&self) -> usize {
        self.height
    }

    fn colors_per_tile(&self) -> usize {
        self.colors_per_sprite
    }

    fn find_exact_match(&self, data: &[i32]) -> Option<usize> {
        self.find_sprite(data)
    }

    fn first_free_slot(&self) -> Option<usize> {
        SpriteChip::first_free_slot(self)
    }

    fn is_empty(&self, data: &[i32]) -> bool {
        SpriteChip::is_empty(self, data)
    }

    fn write_at(&mut self, index: usize, data: &[i32]) {
        self.update_sprite_at(index, data);
    }

    fn unique(&self) -> bool {
        self.unique
    }
}

/// Number of `sprite_width x sprite_height` cells that fit in a texture.
/// Zero-sized sprites fit nowhere.
pub fn calculate_total_sprites(
    texture_width: usize,
    texture_height: usize,
    sprite_width: usize,
    sprite_height: usize,
) -> usize {
    let cols = texture_width.checked_div(sprite_width).unwrap_or(0);
    let rows = texture_height.checked_div(sprite_height).unwrap_or(0);
    cols * rows
}
