use super::painter;
use super::spectrum::{render_frame, FrameInputs, FrameSummary};
use super::surface::{CairoSurface, Viewport};
use crate::config::ExportFormat;
use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::{cairo, glib, DrawingArea};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Longest step fed to the animation, so a stalled frame clock does not
/// teleport the electron.
const MAX_FRAME_DT: f64 = 0.1;

// --- Shared Paint Path (screen + export) ---
pub fn paint_spectrum(cr: &cairo::Context, state: &AppState, viewport: &Viewport) -> FrameSummary {
    let experimental = state.experimental_points();
    let inputs = FrameInputs { lines: state.lines(), experimental: &experimental };
    let mut surface = CairoSurface::new(cr);
    render_frame(&mut surface, &state.params, &inputs, viewport, &state.config.style)
}

// --- Screen Rendering Entry Points ---
pub fn setup_spectrum_drawing(drawing_area: &DrawingArea, state: Rc<RefCell<AppState>>) {
    drawing_area.set_draw_func(move |_, cr: &cairo::Context, width, height| {
        let state = state.borrow();
        // GTK already scales the context for HiDPI; work in logical pixels
        let viewport = Viewport::new(width as f64, height as f64);
        paint_spectrum(cr, &state, &viewport);
    });
}

pub fn setup_atom_drawing(drawing_area: &DrawingArea, state: Rc<RefCell<AppState>>) {
    let draw_state = state.clone();
    drawing_area.set_draw_func(move |_, cr: &cairo::Context, width, height| {
        let state = draw_state.borrow();
        painter::draw_atom_scene(cr, &state.atom, width as f64, height as f64);
    });

    let last_frame: Rc<Cell<Option<i64>>> = Rc::new(Cell::new(None));
    drawing_area.add_tick_callback(move |widget, clock| {
        let now = clock.frame_time(); // microseconds
        let dt = match last_frame.replace(Some(now)) {
            Some(prev) => ((now - prev) as f64 / 1_000_000.0).min(MAX_FRAME_DT),
            None => 0.0,
        };
        if dt > 0.0 {
            state.borrow_mut().atom.tick(dt);
        }
        widget.queue_draw();
        glib::ControlFlow::Continue
    });
}

// --- File Export Entry Point ---
pub fn export_spectrum(
    state: &AppState,
    path: &str,
    width: f64,
    height: f64,
    format: ExportFormat,
) -> Result<(), String> {
    let viewport = Viewport::new(width, height).with_pixel_ratio(state.config.style.export_pixel_ratio);
    if viewport.is_empty() {
        return Err("Nothing to export: the spectrum view has no size".to_string());
    }

    match format {
        ExportFormat::Pdf => {
            let surface = cairo::PdfSurface::new(width, height, path).map_err(|e| e.to_string())?;
            let cr = cairo::Context::new(&surface).map_err(|e| e.to_string())?;
            paint_spectrum(&cr, state, &viewport);
            surface.finish();
        }
        ExportFormat::Png => {
            let (bw, bh) = viewport.backing_size();
            let surface =
                cairo::ImageSurface::create(cairo::Format::ARgb32, bw, bh).map_err(|e| e.to_string())?;
            let cr = cairo::Context::new(&surface).map_err(|e| e.to_string())?;
            cr.scale(viewport.pixel_ratio, viewport.pixel_ratio);
            paint_spectrum(&cr, state, &viewport);
            drop(cr);

            let mut file = std::fs::File::create(path).map_err(|e| e.to_string())?;
            surface.write_to_png(&mut file).map_err(|e| e.to_string())?;
        }
    }
    log::info!("Spectrum exported to {} ({}x{})", path, width as i32, height as i32);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_export_uses_pixel_ratio() {
        let state = AppState::new();
        let path = std::env::temp_dir().join(format!("balmer-export-{}.png", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        export_spectrum(&state, &path_str, 300.0, 150.0, ExportFormat::Png).unwrap();

        let mut file = std::fs::File::open(&path).unwrap();
        let img = cairo::ImageSurface::create_from_png(&mut file).unwrap();
        assert_eq!((img.width(), img.height()), (600, 300));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_export_is_an_error() {
        let state = AppState::new();
        assert!(export_spectrum(&state, "/tmp/never.png", 0.0, 10.0, ExportFormat::Png).is_err());
    }
}
