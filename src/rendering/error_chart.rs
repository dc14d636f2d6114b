// src/rendering/error_chart.rs

use crate::model::constants::HIGH_ERROR_THRESHOLD;
use crate::physics::rydberg::{error_curve, RydbergEstimate};
use gtk4::cairo;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use plotters_cairo::CairoBackend;

const CURVE_STEP_PCT: f64 = 1.0;
const PANEL_BG: RGBColor = RGBColor(17, 24, 39);
const AXIS_FG: RGBColor = RGBColor(156, 163, 175);
const CURVE: RGBColor = RGBColor(99, 102, 241);
const THRESHOLD: RGBColor = RGBColor(239, 68, 68);
const CURRENT: RGBColor = RGBColor(251, 191, 36);

/// Relative error against light pollution, with the threshold and the
/// current setting marked. Works on any plotters backend.
pub fn draw_error_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    light_pollution: f64,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let curve = error_curve(CURVE_STEP_PCT);
    let y_max = curve.iter().map(|(_, e)| *e).fold(HIGH_ERROR_THRESHOLD, f64::max) + 0.5;
    let y_min = (curve.iter().map(|(_, e)| *e).fold(f64::INFINITY, f64::min) - 0.5).max(0.0);

    let mut chart = ChartBuilder::on(root)
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(36)
        .build_cartesian_2d(0.0..100.0, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_labels(4)
        .x_desc("Light pollution (%)")
        .y_desc("Error (%)")
        .axis_style(AXIS_FG)
        .label_style(("sans-serif", 11).into_font().color(&AXIS_FG))
        .axis_desc_style(("sans-serif", 11).into_font().color(&AXIS_FG))
        .light_line_style(AXIS_FG.mix(0.1))
        .draw()?;

    chart.draw_series(LineSeries::new(
        [(0.0, HIGH_ERROR_THRESHOLD), (100.0, HIGH_ERROR_THRESHOLD)],
        THRESHOLD.mix(0.6).stroke_width(1),
    ))?;
    chart.draw_series(LineSeries::new(curve, CURVE.stroke_width(2)))?;

    let p = light_pollution.clamp(0.0, 100.0);
    let current = RydbergEstimate::from_pollution(p).relative_error;
    chart.draw_series(std::iter::once(Circle::new((p, current), 4, CURRENT.filled())))?;

    Ok(())
}

/// Screen entry point for a GTK draw func.
pub fn paint_error_chart(cr: &cairo::Context, width: i32, height: i32, light_pollution: f64) {
    if width <= 0 || height <= 0 {
        return;
    }
    let backend = match CairoBackend::new(cr, (width as u32, height as u32)) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("Chart backend unavailable: {}", e);
            return;
        }
    };
    let root = backend.into_drawing_area();
    if let Err(e) = root.fill(&PANEL_BG) {
        log::warn!("Chart fill failed: {}", e);
        return;
    }
    if let Err(e) = draw_error_chart(&root, light_pollution) {
        log::warn!("Chart draw failed: {}", e);
    }
}
