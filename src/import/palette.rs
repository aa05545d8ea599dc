//! Palette reconciliation
//!
//! Merges an image's palette into the used part of a destination palette.
//! Destination colors that also appear in the image keep their slot.
//! Image colors the destination doesn't have ("orphans") take the slots
//! nobody claimed, lowest slot first. The palette never grows: orphans
//! beyond the open slots are dropped and reported.

use serde::Serialize;

use crate::color::Color;

/// Destination slot assignment produced by [`reconcile`].
///
/// Always the same length as the reference palette it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ColorMap {
    colors: Vec<Color>,
}

impl ColorMap {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Slot of the first entry equal to `color`.
    pub fn position(&self, color: Color) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }
}

impl From<Vec<Color>> for ColorMap {
    fn from(colors: Vec<Color>) -> Self {
        Self { colors }
    }
}

/// Result of reconciling an image palette against a reference palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    pub color_map: ColorMap,
    /// Orphan colors that were given an open slot, in admission order.
    pub admitted: Vec<Color>,
    /// Orphan colors that found no open slot, in image palette order.
    pub dropped: Vec<Color>,
}

/// Reconcile `source` (the image palette) against `reference` (the
/// destination palette already truncated to its used-color count).
///
/// Colors equal to `mask` are skipped. A source color matching a reference
/// slot claims it; a match on an already claimed slot, or no match at all,
/// makes it an orphan. Orphans fill the unclaimed slots in ascending order
/// and any slot still unclaimed keeps its reference color.
///
/// # Examples
///
/// ```
/// use tilechip::color::Color;
/// use tilechip::import::palette::reconcile;
///
/// let [a, b, c, d, x, m] = [1, 2, 3, 4, 5, 6].map(|v| Color::new(v, 0, 0));
/// let result = reconcile(&[a, b, c, d], &[a, x, c, m], m);
/// assert_eq!(result.color_map.colors(), &[a, x, c, d]);
/// assert!(result.dropped.is_empty());
/// ```
pub fn reconcile(reference: &[Color], source: &[Color], mask: Color) -> Reconciliation {
    let mut slots: Vec<Option<Color>> = vec![None; reference.len()];
    let mut orphans = Vec::new();

    for &color in source {
        if color == mask {
            continue;
        }

        match reference.iter().position(|&c| c == color) {
            Some(id) if slots[id].is_none() => slots[id] = Some(color),
            _ => orphans.push(color),
        }
    }

    let open_slots: Vec<usize> =
        slots.iter().enumerate().filter(|(_, s)| s.is_none()).map(|(i, _)| i).collect();

    let admitted_count = open_slots.len().min(orphans.len());
    for (&slot, &color) in open_slots.iter().zip(&orphans) {
        slots[slot] = Some(color);
    }
    let dropped = orphans.split_off(admitted_count);

    let colors = slots
        .into_iter()
        .zip(reference)
        .map(|(slot, &fallback)| slot.unwrap_or(fallback))
        .collect();

    Reconciliation { color_map: ColorMap { colors }, admitted: orphans, dropped }
}
