//! Pixel indexing against a reconciled color map

use rayon::prelude::*;
use std::collections::HashMap;

use super::palette::ColorMap;
use crate::chips::EMPTY_INDEX;
use crate::color::Color;

/// Rewrite every pixel as the slot of its color in `color_map`.
///
/// Pixels whose color is not in the map become [`EMPTY_INDEX`]. When the
/// map holds a color more than once the lowest slot wins. Pixels are
/// independent, so the work is spread over the rayon pool.
pub fn index_pixels(pixels: &[Color], color_map: &ColorMap) -> Vec<i32> {
    let mut lookup: HashMap<Color, i32> = HashMap::with_capacity(color_map.len());
    for (i, &color) in color_map.colors().iter().enumerate() {
        lookup.entry(color).or_insert(i as i32);
    }

    pixels.par_iter().map(|c| lookup.get(c).copied().unwrap_or(EMPTY_INDEX)).collect()
}
