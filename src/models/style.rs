// ABOUTME: Color and text style values used by snackbar requests and controller defaults
// Colors are written as #RGB or #RRGGBB strings in config files and CLI flags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),

    #[error("Color must have 3 or 6 hex digits: {0}")]
    BadLength(String),

    #[error("Invalid hex digit in color: {0}")]
    BadDigit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;

        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| ColorParseError::BadDigit(s.to_string()))?;

        match digits.as_slice() {
            // #FFF expands each nibble: F -> FF
            [r, g, b] => Ok(Self::rgb(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            _ => Err(ColorParseError::BadLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Per-request color overrides; `None` means "use the controller default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOverrides {
    pub text_color: Option<Color>,
    pub button_color: Option<Color>,
    pub background_color: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: f32,
    pub align: TextAlign,
    pub max_lines: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            align: TextAlign::Left,
            max_lines: 2,
        }
    }
}

/// Colors after per-request overrides have been merged onto the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedStyle {
    pub text_color: Color,
    pub button_color: Color,
    pub background_color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#323232".parse::<Color>(), Ok(Color::rgb(0x32, 0x32, 0x32)));
        assert_eq!("#FFF".parse::<Color>(), Ok(Color::rgb(255, 255, 255)));
        assert_eq!("#03a9f4".parse::<Color>(), Ok(Color::rgb(0x03, 0xa9, 0xf4)));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(matches!("323232".parse::<Color>(), Err(ColorParseError::MissingHash(_))));
        assert!(matches!("#12345".parse::<Color>(), Err(ColorParseError::BadLength(_))));
        assert!(matches!("#zzzzzz".parse::<Color>(), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn displays_as_lowercase_hex() {
        assert_eq!(Color::rgb(3, 169, 244).to_string(), "#03a9f4");
    }
}
