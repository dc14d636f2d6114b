// src/rendering/surface.rs
//
// The 2D drawing primitives the spectrum renderer needs. The GTK canvas and
// the export targets wrap a cairo context; tests record calls instead.

use crate::utils::color::Rgba;
use gtk4::cairo;

// ============================================================================
// VALUE TYPES
// ============================================================================

/// Logical canvas size plus the device pixel ratio of the backing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, pixel_ratio: 1.0 }
    }

    pub fn with_pixel_ratio(self, pixel_ratio: f64) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        Self { pixel_ratio, ..self }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.height / 2.0
    }

    /// Device pixels of the backing store (at least 1x1).
    pub fn backing_size(&self) -> (i32, i32) {
        let w = (self.width * self.pixel_ratio).round().max(1.0) as i32;
        let h = (self.height * self.pixel_ratio).round().max(1.0) as i32;
        (w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font<'a> {
    pub family: &'a str,
    pub size: f64,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    /// (on, off) lengths; `None` is a solid line.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Rgba, width: f64, on: f64, off: f64) -> Self {
        Self { color, width, dash: Some((on, off)) }
    }
}

/// Gradient between two points with stops in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub stops: Vec<(f64, Rgba)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

// ============================================================================
// SURFACE TRAIT
// ============================================================================

/// Immediate-mode 2D target. `set_alpha` multiplies every colour drawn until
/// the matching `restore`.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f64);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke);
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, align: TextAlign, color: Rgba);
}

// ============================================================================
// CAIRO IMPLEMENTATION
// ============================================================================

pub struct CairoSurface<'a> {
    cr: &'a cairo::Context,
    alpha: f64,
    stack: Vec<f64>,
}

impl<'a> CairoSurface<'a> {
    pub fn new(cr: &'a cairo::Context) -> Self {
        Self { cr, alpha: 1.0, stack: Vec::new() }
    }

    fn source(&self, c: Rgba) {
        let c = c.fade(self.alpha);
        self.cr.set_source_rgba(c.r, c.g, c.b, c.a);
    }

    fn check(result: Result<(), cairo::Error>, what: &str) {
        if let Err(e) = result {
            log::warn!("cairo {} failed: {}", what, e);
        }
    }
}

impl Surface for CairoSurface<'_> {
    fn save(&mut self) {
        self.stack.push(self.alpha);
        Self::check(self.cr.save(), "save");
    }

    fn restore(&mut self) {
        self.alpha = self.stack.pop().unwrap_or(1.0);
        Self::check(self.cr.restore(), "restore");
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.source(color);
        self.cr.rectangle(rect.x, rect.y, rect.w, rect.h);
        Self::check(self.cr.fill(), "fill");
    }

    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        let pattern = cairo::LinearGradient::new(gradient.from.0, gradient.from.1, gradient.to.0, gradient.to.1);
        for (offset, c) in &gradient.stops {
            let c = c.fade(self.alpha);
            pattern.add_color_stop_rgba(*offset, c.r, c.g, c.b, c.a);
        }
        Self::check(self.cr.set_source(&pattern), "set_source");
        self.cr.rectangle(rect.x, rect.y, rect.w, rect.h);
        Self::check(self.cr.fill(), "fill");
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke) {
        self.source(stroke.color);
        self.cr.set_line_width(stroke.width);
        match stroke.dash {
            Some((on, off)) => self.cr.set_dash(&[on, off], 0.0),
            None => self.cr.set_dash(&[], 0.0),
        }
        self.cr.move_to(from.0, from.1);
        self.cr.line_to(to.0, to.1);
        Self::check(self.cr.stroke(), "stroke");
        self.cr.set_dash(&[], 0.0);
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.source(color);
        self.cr.move_to(first.0, first.1);
        for p in rest {
            self.cr.line_to(p.0, p.1);
        }
        self.cr.close_path();
        Self::check(self.cr.fill(), "fill");
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, align: TextAlign, color: Rgba) {
        let weight = if font.bold { cairo::FontWeight::Bold } else { cairo::FontWeight::Normal };
        self.cr.select_font_face(font.family, cairo::FontSlant::Normal, weight);
        self.cr.set_font_size(font.size);

        let x = match align {
            TextAlign::Left => x,
            TextAlign::Center => match self.cr.text_extents(text) {
                Ok(ext) => x - ext.x_advance() / 2.0,
                Err(_) => x,
            },
        };

        self.source(color);
        self.cr.move_to(x, y);
        Self::check(self.cr.show_text(text), "show_text");
    }
}

// ============================================================================
// RECORDING IMPLEMENTATION (tests)
// ============================================================================

#[cfg(test)]
pub mod recording {
    use super::*;

    /// One recorded call. `alpha` is the global alpha in effect.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Rect { rect: Rect, color: Rgba, alpha: f64 },
        Gradient { rect: Rect, stops: Vec<(f64, Rgba)>, alpha: f64 },
        Line { from: (f64, f64), to: (f64, f64), stroke: Stroke, alpha: f64 },
        Polygon { points: Vec<(f64, f64)>, color: Rgba, alpha: f64 },
        Text { text: String, x: f64, y: f64, size: f64, bold: bool, color: Rgba, alpha: f64 },
    }

    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
        alpha: f64,
        stack: Vec<f64>,
        pub max_depth: usize,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self { alpha: 1.0, ..Default::default() }
        }

        pub fn texts(&self) -> Vec<(&str, f64, f64, f64)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, x, y, alpha, .. } => Some((text.as_str(), *x, *y, *alpha)),
                    _ => None,
                })
                .collect()
        }

        pub fn polygons(&self) -> Vec<&[(f64, f64)]> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Polygon { points, .. } => Some(points.as_slice()),
                    _ => None,
                })
                .collect()
        }

        pub fn is_balanced(&self) -> bool {
            self.stack.is_empty()
        }
    }

    impl Surface for RecordingSurface {
        fn save(&mut self) {
            self.stack.push(self.alpha);
            self.max_depth = self.max_depth.max(self.stack.len());
        }

        fn restore(&mut self) {
            self.alpha = self.stack.pop().unwrap_or(1.0);
        }

        fn set_alpha(&mut self, alpha: f64) {
            self.alpha = alpha.clamp(0.0, 1.0);
        }

        fn fill_rect(&mut self, rect: Rect, color: Rgba) {
            self.ops.push(DrawOp::Rect { rect, color, alpha: self.alpha });
        }

        fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
            self.ops.push(DrawOp::Gradient { rect, stops: gradient.stops.clone(), alpha: self.alpha });
        }

        fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke) {
            self.ops.push(DrawOp::Line { from, to, stroke: *stroke, alpha: self.alpha });
        }

        fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba) {
            self.ops.push(DrawOp::Polygon { points: points.to_vec(), color, alpha: self.alpha });
        }

        fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, _align: TextAlign, color: Rgba) {
            self.ops.push(DrawOp::Text {
                text: text.to_string(),
                x,
                y,
                size: font.size,
                bold: font.bold,
                color,
                alpha: self.alpha,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_backing_size_scales() {
        let vp = Viewport::new(800.0, 400.0).with_pixel_ratio(2.0);
        assert_eq!(vp.backing_size(), (1600, 800));
        assert_eq!(Viewport::new(10.0, 10.0).with_pixel_ratio(f64::NAN).pixel_ratio, 1.0);
    }

    #[test]
    fn test_zero_size_is_empty() {
        assert!(Viewport::new(0.0, 300.0).is_empty());
        assert!(Viewport::new(300.0, f64::NAN).is_empty());
        assert!(!Viewport::new(1.0, 1.0).is_empty());
    }
}
