//! Hex color values accepted into committed UI state.
//!
//! A [`HexColor`] can only be constructed from text matching `#RRGGBB`
//! (case-insensitive, exactly six hex digits). The original text is kept
//! verbatim so comparisons against server payloads stay plain string
//! comparisons.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static HEX_COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Error returned when text does not match the `#RRGGBB` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a #RRGGBB color")]
pub struct HexColorError(pub String);

/// One of the three channels of an sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RgbChannel {
    #[default]
    Red,
    Green,
    Blue,
}

impl RgbChannel {
    pub fn next(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Green => Self::Red,
            Self::Blue => Self::Green,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "R",
            Self::Green => "G",
            Self::Blue => "B",
        }
    }
}

/// A validated `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Returns `true` when `text` matches `^#[0-9A-Fa-f]{6}$`.
    pub fn is_valid(text: &str) -> bool {
        HEX_COLOR_PATTERN.is_match(text)
    }

    pub fn parse(text: &str) -> Result<Self, HexColorError> {
        if Self::is_valid(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(HexColorError(text.to_string()))
        }
    }

    /// Builds a lowercase color from channel values, the way browser color
    /// inputs report them.
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(format!("#{red:02x}{green:02x}{blue:02x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&self.0[range], 16).unwrap_or_default();
        (channel(1..3), channel(3..5), channel(5..7))
    }

    pub fn channel(&self, channel: RgbChannel) -> u8 {
        let (red, green, blue) = self.rgb();
        match channel {
            RgbChannel::Red => red,
            RgbChannel::Green => green,
            RgbChannel::Blue => blue,
        }
    }

    /// Returns a copy with one channel shifted by `delta`, saturating at the
    /// channel bounds.
    pub fn with_channel_delta(&self, channel: RgbChannel, delta: i16) -> Self {
        let shift = |value: u8| (i16::from(value) + delta).clamp(0, 255) as u8;
        let (red, green, blue) = self.rgb();
        match channel {
            RgbChannel::Red => Self::from_rgb(shift(red), green, blue),
            RgbChannel::Green => Self::from_rgb(red, shift(green), blue),
            RgbChannel::Blue => Self::from_rgb(red, green, shift(blue)),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = HexColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) { Ok(Self(value)) } else { Err(HexColorError(value)) }
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}
