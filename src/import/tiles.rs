//! Tile extraction from an indexed pixel buffer

use log::debug;

/// A row-major buffer of color indices cut into fixed-size tiles.
///
/// Tiles are numbered left to right, top to bottom. Partial tiles on the
/// right and bottom edges are not addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: usize,
    height: usize,
    pixels: Vec<i32>,
    tile_width: usize,
    tile_height: usize,
}

impl IndexedImage {
    /// `pixels.len()` must equal `width * height`, and tile dimensions must be
    /// non-zero; the import job checks both before building one.
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<i32>,
        tile_width: usize,
        tile_height: usize,
    ) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        debug_assert!(tile_width > 0 && tile_height > 0);
        Self { width, height, pixels, tile_width, tile_height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[i32] {
        &self.pixels
    }

    pub fn tiles_per_row(&self) -> usize {
        self.width / self.tile_width
    }

    pub fn tiles_per_column(&self) -> usize {
        self.height / self.tile_height
    }

    pub fn total_tiles(&self) -> usize {
        self.tiles_per_row() * self.tiles_per_column()
    }

    /// Pixel coordinates of the top-left corner of tile `index`.
    pub fn tile_origin(&self, index: usize) -> (usize, usize) {
        let per_row = self.tiles_per_row().max(1);
        ((index % per_row) * self.tile_width, (index / per_row) * self.tile_height)
    }

    /// The `tile_width * tile_height` indices of tile `index`, row-major.
    ///
    /// `colors_per_tile` is the legal index range for the destination; values
    /// outside it are passed through unchanged. Returns `None` for a tile
    /// outside the image.
    pub fn tile_data(&self, index: usize, colors_per_tile: usize) -> Option<Vec<i32>> {
        if index >= self.total_tiles() {
            return None;
        }

        let (x0, y0) = self.tile_origin(index);
        let mut data = Vec::with_capacity(self.tile_width * self.tile_height);
        for y in y0..y0 + self.tile_height {
            let row = y * self.width;
            data.extend_from_slice(&self.pixels[row + x0..row + x0 + self.tile_width]);
        }

        let out_of_range = count_out_of_range(&data, colors_per_tile);
        if out_of_range > 0 {
            debug!(
                "tile {} has {} indices at or above {} colors per tile",
                index, out_of_range, colors_per_tile
            );
        }
        Some(data)
    }

    /// Count of pixels whose index is defined but not below `colors_per_tile`.
    pub fn count_out_of_range(&self, colors_per_tile: usize) -> usize {
        count_out_of_range(&self.pixels, colors_per_tile)
    }
}

fn count_out_of_range(indices: &[i32], colors_per_tile: usize) -> usize {
    indices.iter().filter(|&&i| i >= 0 && i as usize >= colors_per_tile).count()
}
