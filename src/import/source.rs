//! Decoded source images

use image::RgbaImage;
use std::collections::HashSet;
use std::path::Path;

use super::ImportError;
use crate::color::Color;

/// A decoded image: a row-major grid of colors plus its palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    palette: Vec<Color>,
}

impl SourceImage {
    /// Build an image from raw pixels. The palette is the distinct colors in
    /// the order they are first seen scanning row by row.
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, ImportError> {
        let palette = distinct_colors(&pixels);
        Self::with_palette(width, height, pixels, palette)
    }

    /// Build an image with an explicit palette, e.g. from an indexed decoder.
    /// The palette may list colors that no pixel uses.
    pub fn with_palette(
        width: usize,
        height: usize,
        pixels: Vec<Color>,
        palette: Vec<Color>,
    ) -> Result<Self, ImportError> {
        if pixels.len() != width * height {
            return Err(ImportError::DimensionMismatch { len: pixels.len(), width, height });
        }
        Ok(Self { width, height, pixels, palette })
    }

    /// Convert a decoded RGBA image. Fully transparent pixels become `mask`;
    /// alpha is dropped from everything else.
    pub fn from_rgba(image: &RgbaImage, mask: Color) -> Self {
        let pixels: Vec<Color> = image
            .pixels()
            .map(|p| if p[3] == 0 { mask } else { Color::from_rgba(*p) })
            .collect();
        let palette = distinct_colors(&pixels);
        Self { width: image.width() as usize, height: image.height() as usize, pixels, palette }
    }

    /// Decode an image file (any format the `image` crate reads).
    pub fn open<P: AsRef<Path>>(path: P, mask: Color) -> Result<Self, ImportError> {
        let image = image::open(path.as_ref())?.to_rgba8();
        Ok(Self::from_rgba(&image, mask))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

fn distinct_colors(pixels: &[Color]) -> Vec<Color> {
    let mut seen = HashSet::new();
    pixels.iter().copied().filter(|c| seen.insert(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_palette_in_scan_order() {
        let (a, b, c) = (Color::new(1, 0, 0), Color::new(2, 0, 0), Color::new(3, 0, 0));
        let image = SourceImage::new(2, 2, vec![b, a, b, c]).unwrap();
        assert_eq!(image.palette(), &[b, a, c]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = SourceImage::new(3, 2, vec![Color::new(0, 0, 0); 5]).unwrap_err();
        assert!(matches!(err, ImportError::DimensionMismatch { len: 5, width: 3, height: 2 }));
    }

    #[test]
    fn test_transparent_pixels_become_mask() {
        let mask = Color::new(255, 0, 255);
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        let image = SourceImage::from_rgba(&rgba, mask);
        assert_eq!(image.pixels(), &[Color::new(10, 20, 30), mask]);
        assert_eq!(image.palette(), &[Color::new(10, 20, 30), mask]);
    }
}
