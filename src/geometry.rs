//! Value-to-geometry mapping for the tank outline and its liquid.
//!
//! Everything here is pure: the same value, range, canvas size and layout
//! always produce the same rectangles.

use crate::error::{Result, TankError};

// ============================================================================
// CORE DATA TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub upper_left: f64,
    pub upper_right: f64,
    pub lower_right: f64,
    pub lower_left: f64,
}

impl CornerRadii {
    /// Rounded bottom, square top: an open-topped vessel.
    pub const fn lower(radius: f64) -> Self {
        Self {
            upper_left: 0.0,
            upper_right: 0.0,
            lower_right: radius,
            lower_left: radius,
        }
    }
}

/// Value range of the gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<()> {
        // written as a negation so NaN bounds are rejected too
        if !(self.max > self.min) {
            return Err(TankError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Normalized position of `value`, clamped to `[0, 1]`.
    pub fn fraction(&self, value: f64) -> Result<f64> {
        self.validate()?;
        if value.is_nan() || value <= self.min {
            return Ok(0.0);
        }
        if value >= self.max {
            return Ok(1.0);
        }
        Ok(((value - self.min) / self.span()).clamp(0.0, 1.0))
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Fixed margins and radii, derived once from the configured font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Height reserved below the tank for the value label.
    pub label_band_height: f64,
    pub outer_padding: f64,
    pub inner_padding: f64,
    /// Distance from the canvas bottom to the label baseline.
    pub label_baseline_offset: f64,
    pub min_canvas_height: f64,
}

/// A collapsed container still needs room for the outline and the label.
pub const MIN_CANVAS_HEIGHT: f64 = 80.0;

impl LayoutConstants {
    pub fn from_font_size(font_size: f32) -> Self {
        Self {
            outer_radius: 24.0,
            inner_radius: 16.0,
            label_band_height: font_size as f64 + 20.0,
            outer_padding: 8.0,
            inner_padding: 10.0,
            label_baseline_offset: 16.0,
            min_canvas_height: MIN_CANVAS_HEIGHT,
        }
    }

    /// Applies the minimum height floor to a measured container size.
    pub fn floor_size(&self, measured: Size) -> Size {
        Size::new(
            measured.width.max(0.0),
            measured.height.max(self.min_canvas_height),
        )
    }

    /// Height available to the vessel itself.
    pub fn usable_height(&self, canvas: Size) -> f64 {
        (canvas.height - self.label_band_height - self.outer_padding).max(0.0)
    }
}

// ============================================================================
// MAPPING
// ============================================================================

/// Liquid region for one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fraction: f64,
}

impl FillRect {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

pub fn compute_fill_rect(
    value: f64,
    range: &Range,
    canvas: Size,
    layout: &LayoutConstants,
) -> Result<FillRect> {
    let fraction = range.fraction(value)?;
    let inner = layout.inner_padding;
    let column = (layout.usable_height(canvas) - inner * 2.0).max(0.0);
    let height = fraction * column;
    Ok(FillRect {
        x: inner,
        y: inner + (column - height),
        width: (canvas.width - inner * 2.0).max(0.0),
        height,
        fraction,
    })
}

pub fn outline_rect(canvas: Size, layout: &LayoutConstants) -> Rect {
    Rect::new(0.0, 0.0, canvas.width, layout.usable_height(canvas))
}

/// Gradient axis from the empty level (min) up to the full level (max).
pub fn gradient_axis(canvas: Size, layout: &LayoutConstants) -> (Point, Point) {
    let inner = layout.inner_padding;
    let usable = layout.usable_height(canvas);
    (Point::new(inner, usable - inner), Point::new(inner, inner))
}

/// Baseline center of the value label.
pub fn label_anchor(canvas: Size, layout: &LayoutConstants) -> Point {
    Point::new(
        canvas.width * 0.5,
        canvas.height - layout.label_baseline_offset,
    )
}

const RADIUS_SCALE_FACTOR: f64 = 1.75;

/// Keeps corner arcs well-formed on rectangles thinner than their radius.
///
/// Each radius is clamped to the rounded rectangle height. An oversized lower
/// radius also narrows the rectangle so the clamped arcs still meet the
/// bottom edge near where the full-size arcs would have.
pub fn fit_corners(rect: Rect, radii: CornerRadii) -> (Rect, CornerRadii) {
    let height = rect.height.max(0.0);
    let fit = |r: f64| {
        if r > height {
            height.round()
        } else {
            r.max(0.0)
        }
    };
    let fitted = CornerRadii {
        upper_left: fit(radii.upper_left),
        upper_right: fit(radii.upper_right),
        lower_right: fit(radii.lower_right),
        lower_left: fit(radii.lower_left),
    };

    let mut rect = rect;
    if radii.lower_left > height {
        let shift = ((radii.lower_left - height) / RADIUS_SCALE_FACTOR).round();
        rect.x += shift;
        rect.width = (rect.width - shift * 2.0).max(0.0);
    }
    (rect, fitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout() -> LayoutConstants {
        LayoutConstants::from_font_size(20.0)
    }

    #[test]
    fn layout_derives_from_font_size() {
        let l = LayoutConstants::from_font_size(14.0);
        assert_eq!(l.label_band_height, 34.0);
        assert_eq!(l.outer_radius, 24.0);
        assert_eq!(l.inner_radius, 16.0);
    }

    #[test]
    fn fraction_clamps() {
        let range = Range::new(10.0, 20.0);
        assert_eq!(range.fraction(5.0).unwrap(), 0.0);
        assert_eq!(range.fraction(15.0).unwrap(), 0.5);
        assert_eq!(range.fraction(25.0).unwrap(), 1.0);
        assert_eq!(range.fraction(f64::NAN).unwrap(), 0.0);
    }

    #[test]
    fn zero_width_range_is_an_error() {
        let range = Range::new(3.0, 3.0);
        let err = compute_fill_rect(3.0, &range, Size::new(100.0, 200.0), &layout()).unwrap_err();
        assert!(matches!(err, TankError::InvalidRange { .. }));
        assert!(Range::new(4.0, 1.0).validate().is_err());
        assert!(Range::new(f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn fill_grows_from_bottom() {
        // usable = 200 - 40 - 8 = 152, column = 132
        let canvas = Size::new(100.0, 200.0);
        let range = Range::new(0.0, 10.0);
        let half = compute_fill_rect(5.0, &range, canvas, &layout()).unwrap();
        assert_eq!(half.fraction, 0.5);
        assert_eq!(half.height, 66.0);
        assert_eq!(half.y, 10.0 + 66.0);
        assert_eq!(half.x, 10.0);
        assert_eq!(half.width, 80.0);

        let empty = compute_fill_rect(-1.0, &range, canvas, &layout()).unwrap();
        assert_eq!(empty.height, 0.0);
        assert_eq!(empty.y, 142.0);

        let full = compute_fill_rect(99.0, &range, canvas, &layout()).unwrap();
        assert_eq!(full.height, 132.0);
        assert_eq!(full.y, 10.0);
        assert_eq!(full.rect().bottom(), empty.y);
    }

    #[test]
    fn outline_spans_width_above_label_band() {
        let rect = outline_rect(Size::new(120.0, 200.0), &layout());
        assert_eq!(rect, Rect::new(0.0, 0.0, 120.0, 152.0));
    }

    #[test]
    fn minimum_height_floor() {
        let floored = layout().floor_size(Size::new(50.0, 10.0));
        assert_eq!(floored, Size::new(50.0, 80.0));
        let kept = layout().floor_size(Size::new(50.0, 300.0));
        assert_eq!(kept.height, 300.0);
    }

    #[test]
    fn gradient_axis_runs_bottom_to_top() {
        let (from, to) = gradient_axis(Size::new(100.0, 200.0), &layout());
        assert_eq!(from, Point::new(10.0, 142.0));
        assert_eq!(to, Point::new(10.0, 10.0));
    }

    #[test]
    fn label_anchor_is_centered() {
        let anchor = label_anchor(Size::new(100.0, 200.0), &layout());
        assert_eq!(anchor, Point::new(50.0, 184.0));
    }

    #[test]
    fn thin_rect_radius_is_clamped_and_narrowed() {
        let rect = Rect::new(10.0, 100.0, 80.0, 4.0);
        let (fitted, radii) = fit_corners(rect, CornerRadii::lower(16.0));
        assert_eq!(radii.lower_left, 4.0);
        assert_eq!(radii.lower_right, 4.0);
        assert_eq!(radii.upper_left, 0.0);
        // (16 - 4) / 1.75 = 6.86 -> 7
        assert_eq!(fitted.x, 17.0);
        assert_eq!(fitted.width, 66.0);
        assert_eq!(fitted.y, 100.0);
    }

    #[test]
    fn tall_rect_keeps_radii() {
        let rect = Rect::new(0.0, 0.0, 100.0, 150.0);
        let (fitted, radii) = fit_corners(rect, CornerRadii::lower(24.0));
        assert_eq!(fitted, rect);
        assert_eq!(radii, CornerRadii::lower(24.0));
    }

    #[test]
    fn empty_rect_has_zero_radii() {
        let (fitted, radii) =
            fit_corners(Rect::new(10.0, 50.0, 80.0, 0.0), CornerRadii::lower(16.0));
        assert_eq!(radii.lower_left, 0.0);
        assert_eq!(fitted.width, 80.0 - 2.0 * 9.0);
    }

    proptest! {
        #[test]
        fn fraction_is_monotonic_and_clamped(
            a in -1_000.0f64..1_000.0,
            b in -1_000.0f64..1_000.0,
            min in -100.0f64..100.0,
            span in 0.001f64..500.0,
        ) {
            let range = Range::new(min, min + span);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let f_lo = range.fraction(lo).unwrap();
            let f_hi = range.fraction(hi).unwrap();
            prop_assert!((0.0..=1.0).contains(&f_lo));
            prop_assert!((0.0..=1.0).contains(&f_hi));
            prop_assert!(f_lo <= f_hi);
        }

        #[test]
        fn fill_stays_inside_outline(
            value in -50.0f64..150.0,
            width in 0.0f64..2_000.0,
            height in 80.0f64..2_000.0,
        ) {
            let canvas = Size::new(width, height);
            let range = Range::new(0.0, 100.0);
            let fill = compute_fill_rect(value, &range, canvas, &layout()).unwrap();
            let outline = outline_rect(canvas, &layout());
            prop_assert!(fill.height >= 0.0);
            prop_assert!(fill.y >= outline.y);
            prop_assert!(fill.rect().bottom() <= outline.bottom() + 1e-9);
        }
    }
}
