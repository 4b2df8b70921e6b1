//! Software rasterizer: draws the tank into an RGBA frame buffer.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::Color;
use crate::config::FontSpec;
use crate::error::{Result, TankError};
use crate::fill::Paint;
use crate::geometry::{CornerRadii, Point, Rect, Size};
use crate::surface::DrawSurface;

const STROKE_WIDTH: f64 = 1.0;

pub struct RasterSurface {
    frame: Vec<u8>,
    width: usize,
    height: usize,
    background: Color,
    font: Option<Font<'static>>,
}

impl RasterSurface {
    pub fn new(background: Color) -> Self {
        Self {
            frame: Vec::new(),
            width: 0,
            height: 0,
            background,
            font: None,
        }
    }

    /// Surface able to draw labels with the given TTF/OTF data.
    pub fn with_font_data(background: Color, data: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(data).ok_or(TankError::Font)?;
        Ok(Self {
            font: Some(font),
            ..Self::new(background)
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(px)
    }

    /// Copies into a `width` x `height` RGBA target, clipping whatever does
    /// not fit.
    pub fn copy_to(&self, target: &mut [u8], width: usize, height: usize) {
        let cols = self.width.min(width);
        for y in 0..self.height.min(height) {
            let src = y * self.width * 4;
            let dst = y * width * 4;
            if dst + cols * 4 > target.len() {
                break;
            }
            target[dst..dst + cols * 4].copy_from_slice(&self.frame[src..src + cols * 4]);
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f64) {
        if x < 0 || y < 0 {
            return;
        }
        let alpha = (coverage * color.a as f64) as f32;
        if alpha > 0.001 {
            set_pixel(
                &mut self.frame,
                self.width,
                x as usize,
                y as usize,
                color.as_tuple(),
                alpha.min(1.0),
            );
        }
    }

    /// Pixel bounds of `rect` grown by `margin`, clipped to the surface.
    fn span(&self, rect: Rect, margin: f64) -> (i64, i64, i64, i64) {
        let x0 = ((rect.x - margin).floor() as i64).max(0);
        let y0 = ((rect.y - margin).floor() as i64).max(0);
        let x1 = ((rect.right() + margin).ceil() as i64).min(self.width as i64);
        let y1 = ((rect.bottom() + margin).ceil() as i64).min(self.height as i64);
        (x0, y0, x1, y1)
    }
}

impl DrawSurface for RasterSurface {
    fn resize(&mut self, size: Size) {
        self.width = size.width.max(0.0) as usize;
        self.height = size.height.max(0.0) as usize;
        self.frame = vec![0; self.width * self.height * 4];
    }

    fn clear(&mut self) {
        let (r, g, b) = self.background.as_tuple();
        let a = (self.background.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, a]);
        }
    }

    fn draw_outline(&mut self, rect: Rect, radii: CornerRadii, stroke: Color) {
        // center the 1px stroke on the rectangle edge, like a canvas stroke
        let (x0, y0, x1, y1) = self.span(rect, STROKE_WIDTH + 1.0);
        for y in y0..y1 {
            for x in x0..x1 {
                let d = rounded_rect_distance(rect, radii, x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (STROKE_WIDTH / 2.0 + 0.5 - d.abs()).clamp(0.0, 1.0);
                self.blend(x, y, stroke, coverage);
            }
        }
    }

    fn draw_fill(&mut self, rect: Rect, radii: CornerRadii, paint: &Paint, axis: (Point, Point)) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let (from, to) = axis;
        let (ax, ay) = (to.x - from.x, to.y - from.y);
        let len_sq = ax * ax + ay * ay;
        let (x0, y0, x1, y1) = self.span(rect, 1.0);
        for y in y0..y1 {
            for x in x0..x1 {
                let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (0.5 - rounded_rect_distance(rect, radii, px, py)).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let t = if len_sq > 0.0 {
                    (((px - from.x) * ax + (py - from.y) * ay) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                self.blend(x, y, paint.color_at(t), coverage);
            }
        }
    }

    /// Only `font.size` applies here: glyphs always come from the face loaded
    /// with [`RasterSurface::with_font_data`], whatever `font.family` says.
    fn draw_label(&mut self, text: &str, position: Point, font: &FontSpec, color: Color) {
        let Some(face) = self.font.as_ref() else {
            log::trace!("no font loaded, label {text:?} skipped");
            return;
        };
        let coverage = glyph_coverage(face, text, Scale::uniform(font.size), position);
        for (x, y, v) in coverage {
            self.blend(x, y, color, v as f64);
        }
    }
}

/// Glyph pixels of `text` centered on `position`, which sits on the baseline.
fn glyph_coverage(
    face: &Font<'static>,
    text: &str,
    scale: Scale,
    position: Point,
) -> Vec<(i64, i64, f32)> {
    let glyphs: Vec<PositionedGlyph> = face.layout(text, scale, point(0.0, 0.0)).collect();
    let advance = glyphs.last().map_or(0.0, |g| {
        g.position().x + g.unpositioned().h_metrics().advance_width
    });
    let origin_x = (position.x - advance as f64 / 2.0).round() as i64;
    let origin_y = position.y.round() as i64;

    let mut coverage = Vec::new();
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                coverage.push((
                    origin_x + (bb.min.x + gx as i32) as i64,
                    origin_y + (bb.min.y + gy as i32) as i64,
                    v,
                ));
            });
        }
    }
    coverage
}

/// Signed distance from `(px, py)` to the rounded rectangle, negative inside.
fn rounded_rect_distance(rect: Rect, radii: CornerRadii, px: f64, py: f64) -> f64 {
    let (half_w, half_h) = (rect.width / 2.0, rect.height / 2.0);
    let cx = px - (rect.x + half_w);
    let cy = py - (rect.y + half_h);
    let r = match (cx < 0.0, cy < 0.0) {
        (true, true) => radii.upper_left,
        (false, true) => radii.upper_right,
        (false, false) => radii.lower_right,
        (true, false) => radii.lower_left,
    }
    .min(half_w)
    .min(half_h)
    .max(0.0);
    let qx = cx.abs() - half_w + r;
    let qy = cy.abs() - half_h + r;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, rgb: (u8, u8, u8), alpha: f32) {
    if x < width && width > 0 && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let src = [rgb.0 as f32, rgb.1 as f32, rgb.2 as f32];
        let dst = [frame[idx] as f32, frame[idx + 1] as f32, frame[idx + 2] as f32];
        let out_alpha = alpha * 255.0 + frame[idx + 3] as f32 * (1.0 - alpha);
        let out = [
            (src[0] * alpha + dst[0] * (1.0 - alpha)).round() as u8,
            (src[1] * alpha + dst[1] * (1.0 - alpha)).round() as u8,
            (src[2] * alpha + dst[2] * (1.0 - alpha)).round() as u8,
            out_alpha.round().min(255.0) as u8,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::GradientStop;

    const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    const RED: Color = Color::new(0xff, 0x00, 0x00);
    const BLUE: Color = Color::new(0x00, 0x00, 0xff);

    fn surface(w: f64, h: f64) -> RasterSurface {
        let mut s = RasterSurface::new(WHITE);
        s.resize(Size::new(w, h));
        s.clear();
        s
    }

    #[test]
    fn clear_paints_background() {
        let s = surface(4.0, 3.0);
        assert_eq!(s.frame().len(), 4 * 3 * 4);
        assert_eq!(s.pixel(3, 2), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(4, 0), None);
    }

    #[test]
    fn flat_fill_covers_interior_only() {
        let mut s = surface(20.0, 20.0);
        let axis = (Point::new(0.0, 20.0), Point::new(0.0, 0.0));
        s.draw_fill(
            Rect::new(5.0, 5.0, 10.0, 10.0),
            CornerRadii::default(),
            &Paint::Flat(RED),
            axis,
        );
        assert_eq!(s.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(16, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn rounded_corner_is_not_filled() {
        let mut s = surface(20.0, 20.0);
        let axis = (Point::new(0.0, 20.0), Point::new(0.0, 0.0));
        s.draw_fill(
            Rect::new(0.0, 0.0, 20.0, 20.0),
            CornerRadii::lower(8.0),
            &Paint::Flat(RED),
            axis,
        );
        // lower-left corner pixel lies outside the arc, upper-left is square
        assert_eq!(s.pixel(0, 19), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn gradient_runs_along_axis() {
        let mut s = surface(10.0, 100.0);
        let paint = Paint::Gradient(vec![
            GradientStop { offset: 0.0, color: RED },
            GradientStop { offset: 0.5, color: RED },
            GradientStop { offset: 0.5, color: BLUE },
            GradientStop { offset: 1.0, color: BLUE },
        ]);
        // offset 0 at the bottom
        let axis = (Point::new(0.0, 100.0), Point::new(0.0, 0.0));
        s.draw_fill(Rect::new(0.0, 0.0, 10.0, 100.0), CornerRadii::default(), &paint, axis);
        assert_eq!(s.pixel(5, 90), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(5, 10), Some([0, 0, 255, 255]));
    }

    #[test]
    fn translucent_fill_blends() {
        let mut s = surface(10.0, 10.0);
        let axis = (Point::default(), Point::new(0.0, 1.0));
        s.draw_fill(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            CornerRadii::default(),
            &Paint::Flat(Color::with_alpha(0, 0, 0, 0.5)),
            axis,
        );
        let [r, g, b, a] = s.pixel(5, 5).unwrap();
        assert!((126..=129).contains(&r));
        assert_eq!((r, g, b, a), (r, r, r, 255));
    }

    #[test]
    fn outline_strokes_the_edge() {
        let mut s = surface(30.0, 30.0);
        s.draw_outline(Rect::new(0.0, 0.0, 30.0, 20.0), CornerRadii::lower(6.0), BLUE);
        // the edge sits between two pixel rows, each gets half the stroke
        let [r, _, b, _] = s.pixel(15, 0).unwrap();
        assert_eq!(b, 255);
        assert!(r < 200);
        assert_eq!(s.pixel(15, 10), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(15, 28), Some([255, 255, 255, 255]));
    }

    #[test]
    fn empty_fill_draws_nothing() {
        let mut s = surface(10.0, 10.0);
        let before = s.frame().to_vec();
        s.draw_fill(
            Rect::new(2.0, 8.0, 6.0, 0.0),
            CornerRadii::lower(4.0),
            &Paint::Flat(RED),
            (Point::default(), Point::new(0.0, 1.0)),
        );
        assert_eq!(s.frame(), before.as_slice());
    }

    #[test]
    fn label_without_font_is_skipped() {
        let mut s = surface(10.0, 10.0);
        let before = s.frame().to_vec();
        let font = FontSpec {
            size: 12.0,
            family: "Helvetica".to_string(),
        };
        s.draw_label("42", Point::new(5.0, 8.0), &font, RED);
        assert_eq!(s.frame(), before.as_slice());
    }

    #[test]
    fn invalid_font_data_is_an_error() {
        let err = RasterSurface::with_font_data(WHITE, vec![1, 2, 3]).err().unwrap();
        assert!(matches!(err, TankError::Font));
    }

    #[test]
    fn copy_clips_to_target() {
        let s = surface(4.0, 4.0);
        let mut target = vec![0u8; 2 * 2 * 4];
        s.copy_to(&mut target, 2, 2);
        assert!(target.iter().all(|&b| b == 255));
    }
}
