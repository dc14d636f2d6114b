// src/rendering/primitives.rs

use crate::utils::color::Rgba;
use gtk4::cairo::{self, RadialGradient};
use std::f64::consts::PI;

fn check(result: Result<(), cairo::Error>) {
    if let Err(e) = result {
        log::warn!("cairo draw failed: {}", e);
    }
}

/// Shaded sphere: highlight offset to the top-left, darker rim.
pub fn draw_sphere(cr: &cairo::Context, x: f64, y: f64, radius: f64, color: Rgba, opacity: f64) {
    if radius <= 0.0 || opacity <= 0.0 {
        return;
    }
    let (r, g, b) = color.rgb();
    let a = (color.a * opacity).clamp(0.0, 1.0);

    let gradient = RadialGradient::new(
        x - radius * 0.3,
        y - radius * 0.3,
        radius * 0.1,
        x,
        y,
        radius,
    );
    gradient.add_color_stop_rgba(0.0, 1.0, 1.0, 1.0, a);
    gradient.add_color_stop_rgba(0.2, (r + 0.2).min(1.0), (g + 0.2).min(1.0), (b + 0.2).min(1.0), a);
    gradient.add_color_stop_rgba(1.0, r * 0.6, g * 0.6, b * 0.6, a);

    check(cr.set_source(&gradient));
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    check(cr.fill());
}

/// Self-lit sphere with a soft halo, used for the electron and photons.
pub fn draw_glowing_sphere(cr: &cairo::Context, x: f64, y: f64, radius: f64, color: Rgba, opacity: f64) {
    if radius <= 0.0 || opacity <= 0.0 {
        return;
    }
    let (r, g, b) = color.rgb();
    let a = (color.a * opacity).clamp(0.0, 1.0);

    let halo = RadialGradient::new(x, y, radius * 0.5, x, y, radius * 3.0);
    halo.add_color_stop_rgba(0.0, r, g, b, a * 0.6);
    halo.add_color_stop_rgba(1.0, r, g, b, 0.0);
    check(cr.set_source(&halo));
    cr.arc(x, y, radius * 3.0, 0.0, 2.0 * PI);
    check(cr.fill());

    cr.set_source_rgba(r, g, b, a);
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    check(cr.fill());
}

/// Closed polyline through already projected points.
pub fn stroke_loop(cr: &cairo::Context, points: &[(f64, f64)], color: Rgba, width: f64) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    cr.set_source_rgba(color.r, color.g, color.b, color.a);
    cr.set_line_width(width);
    cr.move_to(first.0, first.1);
    for p in rest {
        cr.line_to(p.0, p.1);
    }
    cr.close_path();
    check(cr.stroke());
}

/// Text centred on (x, y).
pub fn draw_centered_text(cr: &cairo::Context, text: &str, x: f64, y: f64, size: f64, color: Rgba) {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(size);
    let (w, h) = match cr.text_extents(text) {
        Ok(ext) => (ext.width(), ext.height()),
        Err(_) => (0.0, 0.0),
    };
    cr.set_source_rgba(color.r, color.g, color.b, color.a);
    cr.move_to(x - w / 2.0, y + h / 2.0);
    check(cr.show_text(text));
}
