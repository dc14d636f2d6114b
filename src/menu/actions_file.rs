use crate::config::ExportFormat;
use crate::io;
use crate::rendering::export_spectrum;
use crate::state::AppState;
use crate::ui::{self, show_preferences_window, Ui};
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, FileChooserAction, FileChooserNative, FileFilter, ResponseType};
use std::cell::RefCell;
use std::rc::Rc;

/// Export size when the spectrum view has not been laid out yet.
const FALLBACK_EXPORT_SIZE: (f64, f64) = (1200.0, 400.0);

pub fn setup(app: &Application, window: &ApplicationWindow, state: Rc<RefCell<AppState>>, ui: Ui) {
    // --- IMPORT MEASUREMENTS ACTION ---
    let import_action = gtk4::gio::SimpleAction::new("import", None);
    let win_weak = window.downgrade();
    let state_weak = Rc::downgrade(&state);
    let ui_i = ui.clone();

    import_action.connect_activate(move |_, _| {
        let win = match win_weak.upgrade() { Some(w) => w, None => return };

        let dialog = FileChooserNative::new(
            Some("Import Measurements"),
            Some(&win),
            FileChooserAction::Open,
            Some("Import"),
            Some("Cancel"),
        );

        let filter_any = FileFilter::new();
        filter_any.set_name(Some("Measurement tables (txt, csv, xlsx, ods)"));
        for pattern in io::MEASUREMENT_PATTERNS {
            filter_any.add_pattern(pattern);
        }
        dialog.add_filter(&filter_any);

        let state_weak_inner = state_weak.clone();
        let ui_inner = ui_i.clone();

        dialog.connect_response(move |d, response| {
            if response == ResponseType::Accept {
                if let Some(path) = d.file().and_then(|f| f.path()) {
                    let path_str = path.to_string_lossy().to_string();
                    if let Some(st) = state_weak_inner.upgrade() {
                        match io::load_measurements(&path_str) {
                            Ok(set) => ui::apply_measurements(&st, &ui_inner, set),
                            Err(e) => log::error!("Could not import {}: {}", path_str, e),
                        }
                    }
                }
            }
            d.destroy();
        });
        dialog.show();
    });
    app.add_action(&import_action);

    // --- EXPORT SPECTRUM ACTION ---
    let export_action = gtk4::gio::SimpleAction::new("export", None);
    let win_weak_e = window.downgrade();
    let state_weak_e = Rc::downgrade(&state);
    let spectrum_weak = ui.spectrum.downgrade();

    export_action.connect_activate(move |_, _| {
        let win = match win_weak_e.upgrade() { Some(w) => w, None => return };
        let st_rc = match state_weak_e.upgrade() { Some(s) => s, None => return };
        let state_weak_inner = state_weak_e.clone();

        let size = match spectrum_weak.upgrade() {
            Some(da) if da.width() > 0 && da.height() > 0 => (da.width() as f64, da.height() as f64),
            _ => FALLBACK_EXPORT_SIZE,
        };

        let dialog = FileChooserNative::new(
            Some("Export Spectrum"),
            Some(&win),
            FileChooserAction::Save,
            Some("Export"),
            Some("Cancel"),
        );

        let filter_png = FileFilter::new();
        filter_png.set_name(Some("PNG Image (*.png)"));
        filter_png.add_pattern("*.png");
        dialog.add_filter(&filter_png);
        let filter_pdf = FileFilter::new();
        filter_pdf.set_name(Some("PDF Document (*.pdf)"));
        filter_pdf.add_pattern("*.pdf");
        dialog.add_filter(&filter_pdf);

        let format = st_rc.borrow().config.default_export_format;
        match format {
            ExportFormat::Png => {
                dialog.set_filter(&filter_png);
                dialog.set_current_name("balmer-spectrum.png");
            }
            ExportFormat::Pdf => {
                dialog.set_filter(&filter_pdf);
                dialog.set_current_name("balmer-spectrum.pdf");
            }
        }

        dialog.connect_response(move |d, response| {
            if response == ResponseType::Accept {
                if let Some(path) = d.file().and_then(|f| f.path()) {
                    let path_str = path.to_string_lossy().to_string();
                    if let Some(st) = state_weak_inner.upgrade() {
                        let s = st.borrow();
                        let fmt = ExportFormat::from_path(&path_str);
                        if let Err(e) = export_spectrum(&s, &path_str, size.0, size.1, fmt) {
                            log::error!("Export failed: {}", e);
                        }
                    }
                }
            }
            d.destroy();
        });
        dialog.show();
    });
    app.add_action(&export_action);

    // --- PREFERENCES ACTION ---
    let pref_action = gtk4::gio::SimpleAction::new("preferences", None);
    let win_weak_p = window.downgrade();
    let state_p = state.clone();

    pref_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak_p.upgrade() {
            show_preferences_window(&win, state_p.clone(), ui.clone());
        }
    });
    app.add_action(&pref_action);

    // --- QUIT ACTION ---
    let quit_action = gtk4::gio::SimpleAction::new("quit", None);
    let win_weak_q = window.downgrade();

    quit_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak_q.upgrade() {
            win.close();
        }
    });
    app.add_action(&quit_action);
}
