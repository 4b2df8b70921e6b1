//! Fill color resolution: flat colors for solid tanks, gradient stop lists
//! for segmented ones.

use std::cmp::Ordering;

use crate::color::{Color, Theme};
use crate::config::{FillStyle, Segment};
use crate::error::{Result, TankError};
use crate::geometry::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the fill axis, 0 at `min`, 1 at `max`.
    pub offset: f64,
    pub color: Color,
}

/// What the liquid is painted with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Flat(Color),
    Gradient(Vec<GradientStop>),
}

impl Paint {
    /// Color at normalized position `t` along the gradient axis.
    ///
    /// Coincident stops form a hard edge; the later stop wins on the edge.
    pub fn color_at(&self, t: f64) -> Color {
        let stops = match self {
            Paint::Flat(color) => return *color,
            Paint::Gradient(stops) => stops,
        };
        let (first, last) = match (stops.first(), stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::with_alpha(0, 0, 0, 0.0),
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        let index = stops.iter().rposition(|s| s.offset <= t).unwrap_or(0);
        let (a, b) = (stops[index], stops[(index + 1).min(stops.len() - 1)]);
        let width = b.offset - a.offset;
        if width <= 0.0 {
            return a.color;
        }
        a.color.mix(b.color, (t - a.offset) / width)
    }
}

/// Checks every segment once; the first offender is reported.
pub fn validate_segments(segments: &[Segment]) -> Result<()> {
    for (index, segment) in segments.iter().enumerate() {
        if !(segment.start_value < segment.end_value) {
            return Err(TankError::InvalidSegment {
                index,
                start: segment.start_value,
                end: segment.end_value,
            });
        }
    }
    Ok(())
}

fn sorted(segments: &[Segment]) -> Vec<&Segment> {
    let mut sorted: Vec<&Segment> = segments.iter().collect();
    // stable, so equal starts keep their configured order
    sorted.sort_by(|a, b| {
        a.start_value
            .partial_cmp(&b.start_value)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// First segment (by ascending start) containing `value`, bounds inclusive.
pub fn solid_color(value: f64, segments: &[Segment], base: Color) -> Color {
    sorted(segments)
        .into_iter()
        .find(|s| value >= s.start_value && value <= s.end_value)
        .map_or(base, |s| s.color)
}

/// Stops covering the whole range, gaps painted with `base`.
pub fn gradient_stops(range: &Range, segments: &[Segment], base: Color) -> Vec<GradientStop> {
    let sorted = sorted(segments);
    let mut bands: Vec<(f64, f64, Color)> = Vec::with_capacity(sorted.len() * 2 + 1);

    match sorted.first() {
        None => bands.push((range.min, range.max, base)),
        Some(first) if first.start_value > range.min => {
            bands.push((range.min, first.start_value, base));
        }
        Some(_) => {}
    }
    for (i, segment) in sorted.iter().enumerate() {
        bands.push((segment.start_value, segment.end_value, segment.color));
        let next_start = sorted.get(i + 1).map_or(range.max, |s| s.start_value);
        if segment.end_value < next_start {
            bands.push((segment.end_value, next_start, base));
        }
    }

    let mut stops = Vec::with_capacity(bands.len() * 2);
    let mut last_offset = 0.0_f64;
    for (start, end, color) in bands {
        for value in [start, end] {
            let offset = range.fraction(value).unwrap_or(0.0).max(last_offset);
            last_offset = offset;
            stops.push(GradientStop { offset, color });
        }
    }
    stops
}

/// Paint for the liquid at `reference_value`.
///
/// Segmented tanks ignore the reference value: the gradient spans the whole
/// range and the fill rectangle reveals the part below the level.
pub fn resolve_fill_style(
    reference_value: f64,
    range: &Range,
    segments: &[Segment],
    style: FillStyle,
    theme: Theme,
) -> Paint {
    let base = theme.base_fill();
    if segments.is_empty() {
        return Paint::Flat(base);
    }
    match style {
        FillStyle::Solid => Paint::Flat(solid_color(reference_value, segments, base)),
        FillStyle::Segmented => Paint::Gradient(gradient_stops(range, segments, base)),
    }
}
