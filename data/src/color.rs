use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Straight-alpha 8-bit color, persisted as `#AARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb8(255, 255, 255);

    pub const ORANGE: Color = Color::from_rgb8(255, 165, 0);
    pub const BLUE: Color = Color::from_rgb8(33, 150, 243);
    pub const PURPLE: Color = Color::from_rgb8(156, 39, 176);
    pub const GREEN: Color = Color::from_rgb8(76, 175, 80);
    pub const RED: Color = Color::from_rgb8(239, 83, 80);
    pub const TEAL: Color = Color::from_rgb8(38, 166, 154);
    pub const GRID: Color = Color::from_argb8(40, 200, 200, 200);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { a: 255, r, g, b }
    }

    pub const fn from_argb8(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Multiplies the alpha channel by `factor` (clamped to `[0, 1]`).
    pub fn scale_alpha(self, factor: f32) -> Self {
        let a = (f32::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLUE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("expected 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digits in {0:?}")]
    InvalidDigit(String),
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError::MissingHash(trimmed.to_string()))?;

        if !hex.is_ascii() {
            return Err(ParseColorError::InvalidDigit(trimmed.to_string()));
        }

        let byte = |index: usize| {
            u8::from_str_radix(&hex[index..index + 2], 16)
                .map_err(|_| ParseColorError::InvalidDigit(trimmed.to_string()))
        };

        match hex.len() {
            8 => Ok(Color::from_argb8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            6 => Ok(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
            len => Err(ParseColorError::InvalidLength(len)),
        }
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let color_str = String::deserialize(deserializer)?;
        color_str.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// On/off dash lengths in pixels. Empty for solid lines.
    pub fn dash_pattern(self) -> &'static [f32] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[6.0, 4.0],
            LineStyle::Dotted => &[2.0, 3.0],
        }
    }
}
