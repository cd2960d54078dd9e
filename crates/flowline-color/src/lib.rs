//! Hex colors and palettes for flowline.
//!
//! Colors are 8-bit sRGB triples written as `#rrggbb`. Interpolation is done
//! per channel on the byte values and rounded back to bytes, which is what
//! stroke colors in the SVG output need.

use std::fmt;
use std::str::FromStr;

use flowline_easing::Lerp;
use rand::Rng;

pub mod presets;

// ============================================================================
// Errors
// ============================================================================

/// Error parsing a `#rrggbb` color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    /// The string did not start with `#`.
    #[error("color {0:?} must start with '#'")]
    MissingHash(String),
    /// The string did not have exactly six hex digits.
    #[error("color {0:?} must have six hex digits")]
    BadLength(String),
    /// A digit was not hexadecimal.
    #[error("color {0:?} contains a non-hex digit")]
    BadDigit(String),
}

/// Error building a palette with no colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("palette must contain at least one color")]
pub struct EmptyPaletteError;

// ============================================================================
// HexColor
// ============================================================================

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct HexColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl HexColor {
    /// Black (`#000000`).
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (`#ffffff`).
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates from a packed `0xRRGGBB` value.
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(((hex >> 16) & 0xFF) as u8, ((hex >> 8) & 0xFF) as u8, (hex & 0xFF) as u8)
    }

    /// Packs into `0xRRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Builds a color from channel values, rounding and clamping each to `[0, 255]`.
    pub fn from_channels(r: f32, g: f32, b: f32) -> Self {
        Self::new(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Draws a uniformly random color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_u32(rng.random_range(0..=0xFF_FFFF))
    }

    /// Byte-wise linear interpolation, rounded.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self.lerp_to(&other, t)
    }

    /// Returns `255 - channel` for every channel.
    pub fn invert(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl Lerp for HexColor {
    /// Channels are clamped, so overshooting easing curves saturate.
    fn lerp_to(&self, other: &Self, t: f32) -> Self {
        let channel = |a: u8, b: u8| (a as f32).lerp_to(&(b as f32), t);
        Self::from_channels(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError::MissingHash(s.to_string()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParseColorError::BadLength(s.to_string()));
        }
        let hex = u32::from_str_radix(digits, 16).map_err(|_| ParseColorError::BadDigit(s.to_string()))?;
        Ok(Self::from_u32(hex))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

// ============================================================================
// Palette
// ============================================================================

/// An ordered, non-empty list of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<HexColor>", into = "Vec<HexColor>"))]
pub struct Palette {
    colors: Vec<HexColor>,
}

impl Palette {
    /// Creates a palette, failing if `colors` is empty.
    pub fn new(colors: Vec<HexColor>) -> Result<Self, EmptyPaletteError> {
        if colors.is_empty() {
            return Err(EmptyPaletteError);
        }
        Ok(Self { colors })
    }

    /// Generates `size` random colors (at least one).
    pub fn random<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Self {
        Self {
            colors: (0..size.max(1)).map(|_| HexColor::random(rng)).collect(),
        }
    }

    /// Generates a random palette of three to eight colors.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let size = rng.random_range(3..=8);
        Self::random(rng, size)
    }

    /// Returns the colors in order.
    pub fn colors(&self) -> &[HexColor] {
        &self.colors
    }

    /// Returns the number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; palettes are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if the palette contains `color`.
    pub fn contains(&self, color: HexColor) -> bool {
        self.colors.contains(&color)
    }

    /// Picks a uniformly random color.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> HexColor {
        self.colors[rng.random_range(0..self.colors.len())]
    }

    /// Returns the palette with every occurrence of `color` removed.
    pub fn without(&self, color: HexColor) -> Result<Self, EmptyPaletteError> {
        Self::new(self.colors.iter().copied().filter(|&c| c != color).collect())
    }

    /// Mutable access to the colors. The palette stays non-empty.
    pub fn colors_mut(&mut self) -> &mut [HexColor] {
        &mut self.colors
    }
}

impl TryFrom<Vec<HexColor>> for Palette {
    type Error = EmptyPaletteError;

    fn try_from(colors: Vec<HexColor>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<HexColor> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
