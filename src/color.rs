//! Color values and color string parsing
//!
//! Chip palettes compare colors by their canonical `#RRGGBB` form, so a
//! [`Color`] carries only the RGB channels. Alpha in the input is accepted
//! but discarded.
//!
//! Supported input formats:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `magenta`, etc.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mask color used when none is configured.
pub const DEFAULT_MASK_COLOR: Color = Color { r: 255, g: 0, b: 255 };

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// An opaque RGB color. Equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from an image pixel, dropping alpha.
    pub fn from_rgba(rgba: Rgba<u8>) -> Self {
        Self { r: rgba[0], g: rgba[1], b: rgba[2] }
    }

    /// Canonical `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_color(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Parse a color string into a [`Color`].
///
/// Hex strings take a fast path; everything else goes through lightningcss.
///
/// # Examples
///
/// ```
/// use tilechip::color::{parse_color, Color};
///
/// assert_eq!(parse_color("#F00").unwrap(), Color::new(255, 0, 0));
/// assert_eq!(parse_color("#00FF0080").unwrap(), Color::new(0, 255, 0));
/// assert_eq!(parse_color("magenta").unwrap(), Color::new(255, 0, 255));
/// ```
pub fn parse_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if s.starts_with('#') {
        return parse_hex_color(s);
    }

    parse_css_color(s)
}

/// Parse a hex color string (#RGB, #RGBA, #RRGGBB, #RRGGBBAA)
fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let bytes = hex.as_bytes();
    match hex.len() {
        // short forms double each digit; the alpha digit is ignored
        3 | 4 => Ok(Color::new(
            hex_digit(bytes[0]) * 17,
            hex_digit(bytes[1]) * 17,
            hex_digit(bytes[2]) * 17,
        )),
        6 | 8 => Ok(Color::new(
            hex_digit(bytes[0]) * 16 + hex_digit(bytes[1]),
            hex_digit(bytes[2]) * 16 + hex_digit(bytes[3]),
            hex_digit(bytes[4]) * 16 + hex_digit(bytes[5]),
        )),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Digit value of an already validated hex byte.
fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Color, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Color::new(rgba.red, rgba.green, rgba.blue)),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Color::new(
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
            )),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#0F0").unwrap(), Color::new(0, 255, 0));
        assert_eq!(parse_color("#0F08").unwrap(), Color::new(0, 255, 0));
        assert_eq!(parse_color("#1a2B3c").unwrap(), Color::new(0x1A, 0x2B, 0x3C));
        assert_eq!(parse_color("#1A2B3C00").unwrap(), Color::new(0x1A, 0x2B, 0x3C));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#GG0000"), Err(ColorError::InvalidHex('G')));
        assert!(matches!(parse_color("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_parse_css() {
        assert_eq!(parse_color("rgb(255, 0, 0)").unwrap(), Color::new(255, 0, 0));
        assert_eq!(parse_color("magenta").unwrap(), DEFAULT_MASK_COLOR);
    }

    #[test]
    fn test_alpha_is_not_identity() {
        assert_eq!(parse_color("#FF000000").unwrap(), parse_color("#FF0000").unwrap());
    }

    #[test]
    fn test_hex_roundtrip_is_canonical() {
        let c = parse_color("#abcdef").unwrap();
        assert_eq!(c.to_hex(), "#ABCDEF");
        assert_eq!(c.to_string(), "#ABCDEF");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let colors = vec![Color::new(0, 0, 0), Color::new(255, 0, 255)];
        let json = serde_json::to_string(&colors).unwrap();
        assert_eq!(json, r##"["#000000","#FF00FF"]"##);
        let back: Vec<Color> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, colors);
    }
}
