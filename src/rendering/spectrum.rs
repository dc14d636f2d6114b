// src/rendering/spectrum.rs
//
// Paints one frame of the diffraction pattern: background, grid, optical
// axis, theoretical lines above the divider, measured lines below it.

use super::surface::{Font, LinearGradient, Rect, Stroke, Surface, TextAlign, Viewport};
use crate::config::SpectrumStyle;
use crate::model::spectral::{shortest_wavelength, ExperimentalDataPoint, SpectralLine};
use crate::physics::diffraction::{
    angle_offset, assign_label_tiers, is_drawable, label_y, mirrored_positions,
    sorted_by_wavelength, visibility, ScreenScale,
};
use crate::state::ExperimentParameters;
use crate::utils::color::Rgba;

// ============================================================================
// PALETTE
// ============================================================================

const GRID_RGB: (u8, u8, u8) = (100, 115, 140);
const AXIS_RGB: (u8, u8, u8) = (99, 102, 241);
const DIVIDER_RGB: (u8, u8, u8) = (148, 163, 184);
const CORE_COLOR: Rgba = Rgba::rgba8(255, 255, 255, 0.7);
const MARKER_STEM: Rgba = Rgba::rgb8(0xFB, 0xBF, 0x24);
const MARKER_LABEL: Rgba = Rgba::rgb8(0xD9, 0x77, 0x06);
const CAPTION_LIGHT: Rgba = Rgba::rgb8(209, 213, 219);
const CAPTION_DARK: Rgba = Rgba::rgb8(107, 114, 128);
const CAPTION_EXPERIMENTAL: Rgba = Rgba::rgb8(202, 138, 4);

const GLOW_HALF_WIDTH: f64 = 40.0;
const BEAM_WIDTH: f64 = 4.0;
const HALO_POLLUTION_LIMIT: f64 = 60.0;
const HALO_ACTIVE_WIDTH: f64 = 20.0;

// ============================================================================
// INPUTS / OUTPUTS
// ============================================================================

/// Catalog data for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub lines: &'a [SpectralLine],
    pub experimental: &'a [ExperimentalDataPoint],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnLine {
    pub id: &'static str,
    pub offset: f64,
    pub visibility: f64,
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnMarker {
    pub id: String,
    pub offset: f64,
    pub tier: u8,
}

/// What actually made it onto the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    pub lines: Vec<DrawnLine>,
    pub markers: Vec<DrawnMarker>,
}

// ============================================================================
// FRAME
// ============================================================================

pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    params: &ExperimentParameters,
    inputs: &FrameInputs,
    viewport: &Viewport,
    style: &SpectrumStyle,
) -> FrameSummary {
    let mut summary = FrameSummary::default();
    if viewport.is_empty() {
        return summary;
    }

    let params = params.sanitized();
    let p = params.light_pollution / 100.0;
    let scale = ScreenScale::for_width(viewport.width);

    draw_backdrop(surface, viewport, style, p);

    // Theoretical lines
    let sorted = sorted_by_wavelength(inputs.lines);
    let placed: Vec<(&SpectralLine, Option<f64>)> = sorted
        .iter()
        .map(|l| (*l, angle_offset(l.wavelength_nm, params.distance, &scale)))
        .collect();
    let tiers = assign_label_tiers(&placed);
    let violet_id = shortest_wavelength(inputs.lines).map(|l| l.id);

    for ((line, offset), tier) in placed.iter().zip(tiers) {
        let Some(offset) = *offset else {
            continue;
        };
        let v = visibility(line, params.light_pollution, params.active_transition, violet_id == Some(line.id));
        if !is_drawable(v) {
            continue;
        }
        draw_line(surface, line, offset, v, tier, &params, viewport, style);
        summary.lines.push(DrawnLine { id: line.id, offset, visibility: v, tier });
    }

    // Measured lines
    if params.show_experimental {
        for (i, point) in inputs.experimental.iter().enumerate() {
            // Reported once at import, see `MeasurementSet::unreachable`
            let Some(offset) = angle_offset(point.wavelength_nm, params.distance, &scale) else {
                continue;
            };
            let tier = (i % 2) as u8;
            draw_marker(surface, point, offset, tier, viewport, style);
            summary.markers.push(DrawnMarker { id: point.id.to_string(), offset, tier });
        }
    }

    draw_captions(surface, &params, viewport, style);
    summary
}

fn draw_backdrop<S: Surface + ?Sized>(surface: &mut S, vp: &Viewport, style: &SpectrumStyle, p: f64) {
    let bg = |base: f64, span: f64| (base + span * p).floor() as u8;
    surface.fill_rect(
        Rect::new(0.0, 0.0, vp.width, vp.height),
        Rgba::rgb8(bg(11.0, 189.0), bg(15.0, 188.0), bg(25.0, 185.0)),
    );

    let cx = vp.center_x();
    let mid = vp.mid_y();

    // Grid
    let spacing = if style.grid_spacing > 0.0 { style.grid_spacing } else { 50.0 };
    let grid = Stroke::solid(Rgba::rgba8(GRID_RGB.0, GRID_RGB.1, GRID_RGB.2, 0.15 + 0.1 * (1.0 - p)), 1.0);
    let mut x_off = 0.0;
    while x_off < cx {
        for x in [cx - x_off, cx + x_off] {
            surface.stroke_line((x, 0.0), (x, vp.height), &grid);
        }
        x_off += spacing;
    }

    // Optical axis and divider
    let axis = Stroke::solid(Rgba::rgba8(AXIS_RGB.0, AXIS_RGB.1, AXIS_RGB.2, 0.4 - 0.2 * p), 2.0);
    surface.stroke_line((cx, 0.0), (cx, vp.height), &axis);
    let divider =
        Stroke::dashed(Rgba::rgba8(DIVIDER_RGB.0, DIVIDER_RGB.1, DIVIDER_RGB.2, 0.5 - 0.3 * p), 2.0, 5.0, 5.0);
    surface.stroke_line((0.0, mid), (vp.width, mid), &divider);

    // Zero-order glow
    if style.glow {
        let glow = LinearGradient {
            from: (cx - GLOW_HALF_WIDTH, 0.0),
            to: (cx + GLOW_HALF_WIDTH, 0.0),
            stops: vec![
                (0.0, Rgba::WHITE.with_alpha(0.0)),
                (0.5, Rgba::WHITE.with_alpha(0.1 + 0.1 * (1.0 - p))),
                (1.0, Rgba::WHITE.with_alpha(0.0)),
            ],
        };
        surface.fill_rect_gradient(Rect::new(cx - GLOW_HALF_WIDTH, 0.0, 2.0 * GLOW_HALF_WIDTH, vp.height), &glow);
    }
}

/// Horizontal transparent -> colour -> transparent band centred on `x`.
fn band(x: f64, half_width: f64, color: Rgba) -> LinearGradient {
    LinearGradient {
        from: (x - half_width, 0.0),
        to: (x + half_width, 0.0),
        stops: vec![(0.0, color.with_alpha(0.0)), (0.5, color), (1.0, color.with_alpha(0.0))],
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_line<S: Surface + ?Sized>(
    surface: &mut S,
    line: &SpectralLine,
    offset: f64,
    v: f64,
    tier: u8,
    params: &ExperimentParameters,
    vp: &Viewport,
    style: &SpectrumStyle,
) {
    let ly = label_y(tier);
    let beam_top = ly + 10.0;
    let beam_h = vp.mid_y() - beam_top;
    let label = format!("{} nm", line.wavelength_nm);
    let font = Font { family: &style.label_font, size: 10.0, bold: false };

    let halo_width = if params.active_transition.is_some() {
        HALO_ACTIVE_WIDTH
    } else {
        (15.0 - params.light_pollution * 0.2).max(0.0)
    };
    let halo = style.glow
        && (params.light_pollution < HALO_POLLUTION_LIMIT || params.active_transition.is_some())
        && halo_width > 0.0;

    for x in mirrored_positions(vp.center_x(), offset) {
        surface.save();
        surface.set_alpha(v);

        if beam_h > 0.0 {
            if halo {
                surface.fill_rect_gradient(
                    Rect::new(x - halo_width, beam_top, 2.0 * halo_width, beam_h),
                    &band(x, halo_width, line.color.with_alpha(0.35)),
                );
            }
            surface.fill_rect_gradient(
                Rect::new(x - BEAM_WIDTH / 2.0, beam_top, BEAM_WIDTH, beam_h),
                &band(x, BEAM_WIDTH / 2.0, line.color),
            );
            surface.fill_rect(Rect::new(x - 0.5, beam_top, 1.0, beam_h), CORE_COLOR);
        }

        surface.set_alpha(v.max(0.4));
        surface.fill_text(&label, x, ly, &font, TextAlign::Center, line.color);

        surface.set_alpha((v * 0.5).max(0.2));
        surface.stroke_line((x, ly + 2.0), (x, ly + 8.0), &Stroke::solid(line.color, 1.0));

        surface.restore();
    }
}

fn draw_marker<S: Surface + ?Sized>(
    surface: &mut S,
    point: &ExperimentalDataPoint,
    offset: f64,
    tier: u8,
    vp: &Viewport,
    style: &SpectrumStyle,
) {
    let mid = vp.mid_y();
    let pad = 25.0 + 15.0 * tier as f64;
    let stem = Stroke::dashed(MARKER_STEM, 1.5, 2.0, 4.0);
    let font = Font { family: &style.marker_font, size: 11.0, bold: true };
    let label = format!("{}", point.wavelength_nm);

    for x in mirrored_positions(vp.center_x(), offset) {
        surface.save();
        surface.set_alpha(1.0);
        surface.stroke_line((x, vp.height - pad), (x, mid + 10.0), &stem);
        surface.fill_polygon(&[(x, mid + 4.0), (x - 3.0, mid + 10.0), (x + 3.0, mid + 10.0)], MARKER_STEM);
        surface.fill_text(&label, x, vp.height - pad + 10.0, &font, TextAlign::Center, MARKER_LABEL);
        surface.restore();
    }
}

fn draw_captions<S: Surface + ?Sized>(
    surface: &mut S,
    params: &ExperimentParameters,
    vp: &Viewport,
    style: &SpectrumStyle,
) {
    let font = Font { family: &style.marker_font, size: 11.0, bold: true };
    let tone = if params.light_pollution > 50.0 { CAPTION_DARK } else { CAPTION_LIGHT };
    surface.fill_text("▲ Theoretical", 8.0, 16.0, &font, TextAlign::Left, tone);
    if params.show_experimental {
        surface.fill_text("▼ Experimental", 8.0, vp.height - 8.0, &font, TextAlign::Left, CAPTION_EXPERIMENTAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::spectral::{BalmerTransition, LineCatalog, BALMER_LINES};
    use crate::rendering::surface::recording::{DrawOp, RecordingSurface};

    const VP: Viewport = Viewport { width: 800.0, height: 400.0, pixel_ratio: 1.0 };

    fn render(params: &ExperimentParameters) -> (RecordingSurface, FrameSummary) {
        let experimental = LineCatalog::AtomicBalmer.experimental();
        let inputs = FrameInputs { lines: &BALMER_LINES, experimental: &experimental };
        let mut s = RecordingSurface::new();
        let summary = render_frame(&mut s, params, &inputs, &VP, &SpectrumStyle::default());
        (s, summary)
    }

    fn label_alpha(s: &RecordingSurface, text: &str) -> Vec<f64> {
        s.texts().into_iter().filter(|t| t.0 == text).map(|t| t.3).collect()
    }

    #[test]
    fn test_default_frame_draws_four_mirrored_lines() {
        let (s, summary) = render(&ExperimentParameters::default());
        let ids: Vec<_> = summary.lines.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["h-alpha", "h-beta", "h-gamma", "h-delta"]);
        for (drawn, line) in summary.lines.iter().zip(BALMER_LINES.iter()) {
            assert_eq!(drawn.visibility, line.base_opacity);
        }
        // two labels per line, symmetric around the centre
        let alpha = s.texts().into_iter().filter(|t| t.0 == "656.28 nm").collect::<Vec<_>>();
        assert_eq!(alpha.len(), 2);
        assert!((400.0 - alpha[0].1 - (alpha[1].1 - 400.0)).abs() < 1e-9);
        assert!(summary.markers.is_empty());
        assert!(s.polygons().is_empty());
        assert!(s.is_balanced());
    }

    #[test]
    fn test_focus_on_n3_dims_the_rest() {
        let params = ExperimentParameters { active_transition: Some(BalmerTransition::N3), ..Default::default() };
        let (s, summary) = render(&params);
        for drawn in &summary.lines {
            let line = BALMER_LINES.iter().find(|l| l.id == drawn.id).unwrap();
            if drawn.id == "h-alpha" {
                assert_eq!(drawn.visibility, 1.0);
            } else {
                assert!((drawn.visibility - line.base_opacity * 0.1).abs() < 1e-12);
            }
        }
        assert_eq!(label_alpha(&s, "656.28 nm"), vec![1.0, 1.0]);
        // dimmed labels never drop below 0.4
        assert_eq!(label_alpha(&s, "486.13 nm"), vec![0.4, 0.4]);
    }

    #[test]
    fn test_connector_ticks_and_beams_follow_label_tiers() {
        let params = ExperimentParameters { active_transition: Some(BalmerTransition::N3), ..Default::default() };
        let (s, summary) = render(&params);
        assert_eq!(summary.lines.len(), 4);

        for drawn in &summary.lines {
            let line = BALMER_LINES.iter().find(|l| l.id == drawn.id).unwrap();
            let ly = label_y(drawn.tier);

            let ticks: Vec<f64> = s
                .ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Line { from, to, stroke, alpha }
                        if stroke.color == line.color && from.1 == ly + 2.0 && to.1 == ly + 8.0 =>
                    {
                        Some(*alpha)
                    }
                    _ => None,
                })
                .collect();
            let expected = if drawn.id == "h-alpha" { 0.5 } else { 0.2 };
            assert_eq!(ticks, vec![expected, expected], "{}", drawn.id);

            let beams: Vec<Rect> = s
                .ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Gradient { rect, stops, .. } if rect.w == BEAM_WIDTH && stops[1].1 == line.color => {
                        Some(*rect)
                    }
                    _ => None,
                })
                .collect();
            assert_eq!(beams.len(), 2, "{}", drawn.id);
            for rect in beams {
                assert_eq!(rect.y, ly + 10.0);
                assert_eq!(rect.y + rect.h, VP.mid_y());
            }
        }

        let delta = summary.lines.iter().find(|l| l.id == "h-delta").unwrap();
        assert_eq!(delta.tier, 2);
        assert_eq!(label_y(delta.tier) + 10.0, 70.0);
        let gamma = summary.lines.iter().find(|l| l.id == "h-gamma").unwrap();
        assert_eq!(label_y(gamma.tier) + 10.0, 55.0);
    }

    #[test]
    fn test_experimental_overlay_below_divider() {
        let params = ExperimentParameters { show_experimental: true, ..Default::default() };
        let (s, summary) = render(&params);
        assert_eq!(summary.markers.len(), 4);
        assert_eq!(summary.markers.iter().map(|m| m.tier).collect::<Vec<_>>(), vec![0, 1, 0, 1]);

        let arrows = s.polygons();
        assert_eq!(arrows.len(), 8);
        for tri in arrows {
            assert!(tri.iter().all(|&(_, y)| y > VP.mid_y()));
        }
        for op in &s.ops {
            if let DrawOp::Polygon { alpha, .. } = op {
                assert_eq!(*alpha, 1.0);
            }
        }
        assert_eq!(label_alpha(&s, "677.9").len(), 2);
        assert_eq!(label_alpha(&s, "▼ Experimental").len(), 1);
    }

    #[test]
    fn test_markers_ignore_pollution_and_focus() {
        let params = ExperimentParameters {
            show_experimental: true,
            light_pollution: 100.0,
            active_transition: Some(BalmerTransition::N6),
            ..Default::default()
        };
        let (_, summary) = render(&params);
        assert_eq!(summary.markers.len(), 4);
    }

    #[test]
    fn test_violet_gone_at_heavy_pollution() {
        let params = ExperimentParameters { light_pollution: 70.0, ..Default::default() };
        let (_, summary) = render(&params);
        assert!(summary.lines.iter().all(|l| l.id != "h-delta"));
        assert_eq!(summary.lines.len(), 3);
    }

    #[test]
    fn test_background_tracks_pollution() {
        let dark = ExperimentParameters::default();
        let (s, _) = render(&dark);
        match &s.ops[0] {
            DrawOp::Rect { color, .. } => assert_eq!(*color, Rgba::rgb8(11, 15, 25)),
            other => panic!("expected background, got {:?}", other),
        }
        let light = ExperimentParameters { light_pollution: 100.0, ..Default::default() };
        let (s, _) = render(&light);
        match &s.ops[0] {
            DrawOp::Rect { color, .. } => assert_eq!(*color, Rgba::rgb8(200, 203, 210)),
            other => panic!("expected background, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_size_draws_nothing() {
        let inputs = FrameInputs { lines: &BALMER_LINES, experimental: &[] };
        let mut s = RecordingSurface::new();
        let vp = Viewport::new(0.0, 400.0);
        let summary = render_frame(&mut s, &ExperimentParameters::default(), &inputs, &vp, &SpectrumStyle::default());
        assert!(s.ops.is_empty());
        assert_eq!(summary, FrameSummary::default());
    }

    #[test]
    fn test_out_of_range_params_are_sanitized() {
        let raw = ExperimentParameters { distance: 500.0, ..Default::default() };
        let (_, wild) = render(&raw);
        let clamped = ExperimentParameters { distance: 60.0, ..Default::default() };
        let (_, max) = render(&clamped);
        assert_eq!(wild, max);
    }

    #[test]
    fn test_molecular_catalog_staggers_labels() {
        let lines = LineCatalog::MolecularElectronic.lines();
        let inputs = FrameInputs { lines, experimental: &[] };
        let mut s = RecordingSurface::new();
        let summary = render_frame(&mut s, &ExperimentParameters::default(), &inputs, &VP, &SpectrumStyle::default());
        assert!(!summary.lines.is_empty());
        assert!(summary.lines.iter().any(|l| l.tier > 0));
    }
}
