//! RGBA colors, their text forms, and the light and dark tank palettes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TankError;

// ============================================================================
// COLOR
// ============================================================================

/// Color representation for tank elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0.0, 1.0]`.
    pub a: f32,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// Linear blend towards `other`, `t` clamped to `[0, 1]`.
    pub fn mix(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: (self.a as f64 + (other.a as f64 - self.a as f64) * t) as f32,
        }
    }

    fn named(name: &str) -> Option<Color> {
        let color = match name {
            "black" => Color::new(0x00, 0x00, 0x00),
            "white" => Color::new(0xff, 0xff, 0xff),
            "red" => Color::new(0xff, 0x00, 0x00),
            "green" => Color::new(0x00, 0x80, 0x00),
            "blue" => Color::new(0x00, 0x00, 0xff),
            "yellow" => Color::new(0xff, 0xff, 0x00),
            "orange" => Color::new(0xff, 0xa5, 0x00),
            "purple" => Color::new(0x80, 0x00, 0x80),
            "gray" | "grey" => Color::new(0x80, 0x80, 0x80),
            "transparent" => Color::with_alpha(0x00, 0x00, 0x00, 0.0),
            _ => return None,
        };
        Some(color)
    }

    fn from_hex(hex: &str) -> Option<Color> {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        let pair = |i: usize| digits[i] * 16 + digits[i + 1];
        match digits.len() {
            3 => Some(Color::new(
                digits[0] * 17,
                digits[1] * 17,
                digits[2] * 17,
            )),
            6 => Some(Color::new(pair(0), pair(2), pair(4))),
            8 => Some(Color::with_alpha(
                pair(0),
                pair(2),
                pair(4),
                pair(6) as f32 / 255.0,
            )),
            _ => None,
        }
    }

    fn from_function(body: &str, with_alpha: bool) -> Option<Color> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let (r, g, b) = (channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        let a = if with_alpha {
            parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(Color::with_alpha(r, g, b, a))
    }
}

impl FromStr for Color {
    type Err = TankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let parsed = if let Some(hex) = text.strip_prefix('#') {
            Color::from_hex(hex)
        } else if let Some(body) = text.strip_prefix("rgba(").and_then(|t| t.strip_suffix(')')) {
            Color::from_function(body, true)
        } else if let Some(body) = text.strip_prefix("rgb(").and_then(|t| t.strip_suffix(')')) {
            Color::from_function(body, false)
        } else {
            Color::named(&text)
        };
        parsed.ok_or_else(|| TankError::ColorParse(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = TankError;

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
        if self.is_opaque() {
            write!(f, "rgb({},{},{})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

// ============================================================================
// THEME
// ============================================================================

/// Light or dark palette. Only border, label and base fill tones depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Liquid color used when no segment applies.
    pub const fn base_fill(self) -> Color {
        match self {
            Theme::Dark => Color::new(0xff, 0xff, 0xff),
            Theme::Light => Color::with_alpha(0x00, 0x00, 0x00, 0.67),
        }
    }

    pub const fn border(self) -> Color {
        match self {
            Theme::Dark => Color::new(0xff, 0xff, 0xff),
            Theme::Light => Color::with_alpha(0x00, 0x00, 0x00, 0.34),
        }
    }

    pub const fn text(self) -> Color {
        match self {
            Theme::Dark => Color::new(0xff, 0xff, 0xff),
            Theme::Light => Color::with_alpha(0x00, 0x00, 0x00, 0.87),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#f00".parse::<Color>().unwrap(), Color::new(0xff, 0, 0));
        assert_eq!("#00ff7f".parse::<Color>().unwrap(), Color::new(0, 0xff, 0x7f));
        let translucent: Color = "#00000080".parse().unwrap();
        assert_eq!(translucent.as_tuple(), (0, 0, 0));
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_functional_and_named_forms() {
        assert_eq!("rgb(255, 255, 255)".parse::<Color>().unwrap(), Color::new(255, 255, 255));
        assert_eq!(
            "rgba(0,0,0,0.67)".parse::<Color>().unwrap(),
            Color::with_alpha(0, 0, 0, 0.67)
        );
        assert_eq!("Red".parse::<Color>().unwrap(), Color::new(0xff, 0, 0));
        assert_eq!("grey".parse::<Color>().unwrap(), "gray".parse::<Color>().unwrap());
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#12", "#ggg", "rgb(1,2)", "rgba(1,2,3)", "chartreuse-ish"] {
            assert!(matches!(bad.parse::<Color>(), Err(TankError::ColorParse(_))), "{bad}");
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let color = Color::with_alpha(12, 34, 56, 0.5);
        assert_eq!(color.to_string(), "rgba(12,34,56,0.5)");
        assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
        assert_eq!(Color::new(1, 2, 3).to_string(), "rgb(1,2,3)");
    }

    #[test]
    fn theme_tones() {
        assert_eq!(Theme::from_dark(true).base_fill(), Color::new(255, 255, 255));
        assert_eq!(
            Theme::from_dark(false).base_fill(),
            Color::with_alpha(0, 0, 0, 0.67)
        );
        assert_eq!(Theme::Light.border(), Color::with_alpha(0, 0, 0, 0.34));
        assert_eq!(Theme::Light.text(), Color::with_alpha(0, 0, 0, 0.87));
        assert_eq!(Theme::Dark.border(), Theme::Dark.text());
    }

    #[test]
    fn mix_endpoints() {
        let a = Color::new(0, 0, 0);
        let b = Color::new(200, 100, 50);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5).as_tuple(), (100, 50, 25));
    }
}
