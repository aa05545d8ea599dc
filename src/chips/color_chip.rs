//! Fixed-capacity global palette

use log::warn;

use crate::color::Color;

/// A palette of `max_colors` slots, of which the first `total_used_colors`
/// are visible to importers. Unset slots read back as the mask color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorChip {
    colors: Vec<Option<Color>>,
    total_used_colors: usize,
    mask_color: Color,
}

impl ColorChip {
    /// An empty chip with every slot in use but unset.
    pub fn new(max_colors: usize, mask_color: Color) -> Self {
        Self { colors: vec![None; max_colors], total_used_colors: max_colors, mask_color }
    }

    /// A chip whose first slots hold `colors`; the used-color count is the
    /// number of colors that fit.
    pub fn from_colors(colors: &[Color], max_colors: usize, mask_color: Color) -> Self {
        let mut slots = vec![None; max_colors];
        for (slot, color) in slots.iter_mut().zip(colors) {
            *slot = Some(*color);
        }
        if colors.len() > max_colors {
            warn!(
                "palette has {} colors but the chip holds {}; extra colors ignored",
                colors.len(),
                max_colors
            );
        }
        Self { colors: slots, total_used_colors: colors.len().min(max_colors), mask_color }
    }

    pub fn max_colors(&self) -> usize {
        self.colors.len()
    }

    pub fn total_used_colors(&self) -> usize {
        self.total_used_colors
    }

    /// Clamped to the chip's capacity.
    pub fn set_total_used_colors(&mut self, total: usize) {
        self.total_used_colors = total.min(self.colors.len());
    }

    pub fn mask_color(&self) -> Color {
        self.mask_color
    }

    pub fn get_color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied().flatten()
    }

    /// Returns false when `index` is outside the chip.
    pub fn update_color_at(&mut self, index: usize, color: Color) -> bool {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = Some(color);
                true
            }
            None => false,
        }
    }

    pub fn slots(&self) -> &[Option<Color>] {
        &self.colors
    }

    /// The used part of the palette with unset slots shown as the mask color.
    pub fn colors_used(&self) -> Vec<Color> {
        self.colors[..self.total_used_colors]
            .iter()
            .map(|c| c.unwrap_or(self.mask_color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_MASK_COLOR;

    #[test]
    fn test_from_colors_sets_used_count() {
        let chip = ColorChip::from_colors(&[Color::new(0, 0, 0), Color::new(1, 1, 1)], 4, DEFAULT_MASK_COLOR);
        assert_eq!(chip.max_colors(), 4);
        assert_eq!(chip.total_used_colors(), 2);
        assert_eq!(chip.get_color(1), Some(Color::new(1, 1, 1)));
        assert_eq!(chip.get_color(2), None);
        assert_eq!(chip.get_color(99), None);
    }

    #[test]
    fn test_from_colors_clamps_to_capacity() {
        let colors: Vec<Color> = (0..6).map(|i| Color::new(i, 0, 0)).collect();
        let chip = ColorChip::from_colors(&colors, 4, DEFAULT_MASK_COLOR);
        assert_eq!(chip.total_used_colors(), 4);
        assert_eq!(chip.colors_used(), colors[..4].to_vec());
    }

    #[test]
    fn test_unset_slots_read_as_mask() {
        let mut chip = ColorChip::new(3, DEFAULT_MASK_COLOR);
        assert!(chip.update_color_at(1, Color::new(5, 5, 5)));
        assert!(!chip.update_color_at(3, Color::new(5, 5, 5)));
        assert_eq!(
            chip.colors_used(),
            vec![DEFAULT_MASK_COLOR, Color::new(5, 5, 5), DEFAULT_MASK_COLOR]
        );
    }

    #[test]
    fn test_set_total_used_colors_clamped() {
        let mut chip = ColorChip::new(4, DEFAULT_MASK_COLOR);
        chip.set_total_used_colors(2);
        assert_eq!(chip.colors_used().len(), 2);
        chip.set_total_used_colors(10);
        assert_eq!(chip.total_used_colors(), 4);
    }
}
