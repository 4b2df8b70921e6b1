//! Tank configuration: segments, label formatting, the builder and TOML options.

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::color::Color;
use crate::error::Result;

// ============================================================================
// SEGMENTS AND FILL STYLE
// ============================================================================

/// A value band painted with one fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(alias = "startValue")]
    pub start_value: f64,
    #[serde(alias = "endValue")]
    pub end_value: f64,
    pub color: Color,
}

impl Segment {
    pub const fn new(start_value: f64, end_value: f64, color: Color) -> Self {
        Self {
            start_value,
            end_value,
            color,
        }
    }
}

/// How segments color the liquid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStyle {
    /// The whole liquid takes the color of the segment containing the value.
    #[default]
    Solid,
    /// The liquid shows every band as a vertical gradient.
    Segmented,
}

// ============================================================================
// LABEL TEXT
// ============================================================================

/// Turns the target value into label text.
#[derive(Clone)]
pub struct ValueFormatter(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl ValueFormatter {
    pub fn new(format: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(format))
    }

    /// Plain numeric text: `1.0` renders as `1`, `0.25` as `0.25`.
    pub fn plain() -> Self {
        Self::new(|value| value.to_string())
    }

    pub fn fixed(decimals: usize) -> Self {
        Self::new(move |value| format!("{value:.decimals$}"))
    }

    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::plain()
    }
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueFormatter(..)")
    }
}

/// Font used for the value label.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub family: String,
}

impl FontSpec {
    /// CSS shorthand, e.g. `normal 400 20px Helvetica`.
    pub fn css(&self) -> String {
        format!("normal 400 {}px {}", self.size, self.family)
    }
}

// ============================================================================
// TANK CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct TankConfig {
    #[builder(default = 0.0)]
    pub min: f64,
    #[builder(default = 1.0)]
    pub max: f64,

    // Label
    #[builder(default = 20.0)]
    pub font_size: f32,
    #[builder(default = "Helvetica".to_string(), into)]
    pub font_family: String,
    #[builder(default)]
    pub value_formatter: ValueFormatter,

    // Colors
    #[builder(default = false)]
    pub dark: bool,
    #[builder(default)]
    pub fill_style: FillStyle,
    #[builder(default)]
    pub segments: Vec<Segment>,

    // Window configuration
    #[builder(default = "Liquid Tank".to_string(), into)]
    pub title: String,
    #[builder(default = 300)]
    pub window_width: usize,
    #[builder(default = 300)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TankConfig {
    pub fn font(&self) -> FontSpec {
        FontSpec {
            size: self.font_size,
            family: self.font_family.clone(),
        }
    }
}

/// Partial range change for [`crate::LiquidTank::configure`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeUpdate {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeUpdate {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

// ============================================================================
// FILE OPTIONS
// ============================================================================

/// Plain-data options as read from a TOML file.
///
/// ```toml
/// min = 0
/// max = 100
/// fill_style = "segmented"
/// segments = [
///     { start_value = 0, end_value = 20, color = "#d32f2f" },
///     { start_value = 80, end_value = 100, color = "orange" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankOptions {
    pub min: f64,
    pub max: f64,
    #[serde(alias = "fontSize")]
    pub font_size: f32,
    #[serde(alias = "fontFamily")]
    pub font_family: String,
    pub dark: bool,
    #[serde(alias = "fillStyle")]
    pub fill_style: FillStyle,
    pub segments: Vec<Segment>,
    /// Fixed number of decimals in the label; plain formatting when absent.
    pub decimals: Option<usize>,
    pub title: String,
    pub window_width: usize,
    pub window_height: usize,
    pub max_framerate: f64,
}

impl Default for TankOptions {
    fn default() -> Self {
        let defaults = TankConfig::default();
        Self {
            min: defaults.min,
            max: defaults.max,
            font_size: defaults.font_size,
            font_family: defaults.font_family,
            dark: defaults.dark,
            fill_style: defaults.fill_style,
            segments: defaults.segments,
            decimals: None,
            title: defaults.title,
            window_width: defaults.window_width,
            window_height: defaults.window_height,
            max_framerate: defaults.max_framerate,
        }
    }
}

impl TankOptions {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn into_config(self) -> TankConfig {
        let formatter = self
            .decimals
            .map_or_else(ValueFormatter::plain, ValueFormatter::fixed);
        TankConfig::builder()
            .min(self.min)
            .max(self.max)
            .font_size(self.font_size)
            .font_family(self.font_family)
            .value_formatter(formatter)
            .dark(self.dark)
            .fill_style(self.fill_style)
            .segments(self.segments)
            .title(self.title)
            .window_width(self.window_width)
            .window_height(self.window_height)
            .max_framerate(self.max_framerate)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TankError;

    #[test]
    fn builder_defaults() {
        let config = TankConfig::builder().build();
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 1.0);
        assert_eq!(config.font_size, 20.0);
        assert_eq!(config.font_family, "Helvetica");
        assert!(!config.dark);
        assert_eq!(config.fill_style, FillStyle::Solid);
        assert!(config.segments.is_empty());
        assert_eq!(config.font().css(), "normal 400 20px Helvetica");
    }

    #[test]
    fn plain_formatter_matches_number_to_text() {
        let plain = ValueFormatter::plain();
        assert_eq!(plain.format(1.0), "1");
        assert_eq!(plain.format(0.5), "0.5");
        assert_eq!(plain.format(-3.25), "-3.25");
        assert_eq!(ValueFormatter::fixed(2).format(1.0), "1.00");
    }

    #[test]
    fn custom_formatter() {
        let config = TankConfig::builder()
            .value_formatter(ValueFormatter::new(|v| format!("{:.0}%", v * 100.0)))
            .build();
        assert_eq!(config.value_formatter.format(0.42), "42%");
    }

    #[test]
    fn options_from_toml() {
        let options = TankOptions::from_toml_str(
            r##"
            min = 0
            max = 100
            dark = true
            fillStyle = "segmented"
            decimals = 1
            segments = [
                { startValue = 0, endValue = 20, color = "#ff0000" },
                { start_value = 80, end_value = 100, color = "rgba(0,0,255,0.5)" },
            ]
            "##,
        )
        .unwrap();
        assert_eq!(options.fill_style, FillStyle::Segmented);
        assert_eq!(options.segments.len(), 2);
        assert_eq!(options.segments[0].color, Color::new(255, 0, 0));
        assert_eq!(options.font_size, 20.0);

        let config = options.into_config();
        assert_eq!(config.max, 100.0);
        assert!(config.dark);
        assert_eq!(config.value_formatter.format(3.0), "3.0");
    }

    #[test]
    fn options_reject_bad_color() {
        let err = TankOptions::from_toml_str(
            r#"segments = [{ start_value = 0, end_value = 1, color = "nope" }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, TankError::Config(_)));
    }
}
