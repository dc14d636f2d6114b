// src/rendering/painter.rs
// Projects the retained atom scene through the orbit camera and paints it
// back to front with cairo.

use super::atom_view::{AtomView, ELECTRON, TRAIL_LENGTH};
use super::primitives::{draw_centered_text, draw_glowing_sphere, draw_sphere, stroke_loop};
use super::scene::{Node, OrbitCamera, Projected, Shape};
use crate::utils::color::Rgba;
use gtk4::cairo;
use nalgebra::Point3;
use std::cmp::Ordering;
use std::f64::consts::PI;

const RING_SEGMENTS: usize = 64;
const TRAIL_WIDTH: f64 = 0.4;
const BACKGROUND: (f64, f64, f64) = (0.02, 0.03, 0.07);

// ============================================================================
// PROJECTION HELPERS
// ============================================================================

fn ring_points(cam: &OrbitCamera, node: &Node, radius: f64, w: f64, h: f64) -> Vec<(f64, f64)> {
    (0..RING_SEGMENTS)
        .filter_map(|i| {
            let t = i as f64 / RING_SEGMENTS as f64 * 2.0 * PI;
            let p = node.position + nalgebra::Vector3::new(t.cos() * radius, 0.0, t.sin() * radius);
            cam.project(&p, w, h).map(|s| (s.x, s.y))
        })
        .collect()
}

struct SphereDraw<'a> {
    node: &'a Node,
    at: Projected,
    radius: f64,
}

// ============================================================================
// MAIN SCENE DRAWING
// ============================================================================

pub fn draw_atom_scene(cr: &cairo::Context, view: &AtomView, width: f64, height: f64) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let cam = view.camera();

    cr.set_source_rgb(BACKGROUND.0, BACKGROUND.1, BACKGROUND.2);
    if let Err(e) = cr.paint() {
        log::warn!("cairo paint failed: {}", e);
    }

    // Rings first: they are faint and lie in the orbit plane
    let mut spheres: Vec<SphereDraw> = Vec::new();
    for (_, node) in view.scene().iter() {
        match node.shape {
            Shape::Ring { radius } => {
                let pts = ring_points(cam, node, radius * node.scale, width, height);
                if pts.len() == RING_SEGMENTS {
                    stroke_loop(cr, &pts, node.color.fade(node.opacity), 1.0);
                }
                if let Some(label) = &node.label {
                    let anchor = node.position + nalgebra::Vector3::new(radius, 0.0, 0.0);
                    if let Some(p) = cam.project(&anchor, width, height) {
                        draw_centered_text(cr, label, p.x, p.y, 10.0, Rgba::WHITE.with_alpha(0.5));
                    }
                }
            }
            Shape::Sphere { radius } => {
                if let Some(at) = cam.project(&node.position, width, height) {
                    spheres.push(SphereDraw { node, at, radius: radius * node.scale * at.scale });
                }
            }
        }
    }

    draw_trail(cr, cam, view.trail().copied().collect::<Vec<_>>().as_slice(), width, height);

    // Painter's algorithm: far to near
    spheres.sort_by(|a, b| b.at.depth.partial_cmp(&a.at.depth).unwrap_or(Ordering::Equal));
    for s in spheres {
        if s.node.emissive {
            draw_glowing_sphere(cr, s.at.x, s.at.y, s.radius, s.node.color, s.node.opacity);
        } else {
            draw_sphere(cr, s.at.x, s.at.y, s.radius, s.node.color, s.node.opacity);
        }
    }
}

/// Ribbon whose width and alpha fall off towards the oldest point.
fn draw_trail(cr: &cairo::Context, cam: &OrbitCamera, trail: &[Point3<f64>], width: f64, height: f64) {
    let projected: Vec<Projected> = trail.iter().filter_map(|p| cam.project(p, width, height)).collect();
    cr.set_line_cap(cairo::LineCap::Round);
    for (i, pair) in projected.windows(2).enumerate() {
        let t = (i + 1) as f64 / TRAIL_LENGTH as f64;
        let c = ELECTRON.with_alpha(t * 0.8);
        cr.set_source_rgba(c.r, c.g, c.b, c.a);
        cr.set_line_width((TRAIL_WIDTH * pair[1].scale * t).max(0.5));
        cr.move_to(pair[0].x, pair[0].y);
        cr.line_to(pair[1].x, pair[1].y);
        if let Err(e) = cr.stroke() {
            log::warn!("cairo stroke failed: {}", e);
        }
    }
}
