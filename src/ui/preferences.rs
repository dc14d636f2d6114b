// src/ui/preferences.rs
// Preferences window. Every change is applied live and written to settings.json.

use crate::config::{
    Config, ExportFormat, DROP_DELAY_RANGE, DROP_SPEED_RANGE, GRID_SPACING_RANGE, PHOTON_LIFETIME_RANGE,
    PHOTON_SPEED_RANGE, PIXEL_RATIO_RANGE,
};
use crate::state::AppState;
use crate::ui::Ui;
use gtk4::{self as gtk, prelude::*};
use std::cell::RefCell;
use std::rc::Rc;

/// Applies `edit` to the live config, persists it and redraws.
fn update(state: &Rc<RefCell<AppState>>, ui: &Ui, edit: impl FnOnce(&mut Config)) {
    {
        let mut st = state.borrow_mut();
        let mut cfg = st.config.clone();
        edit(&mut cfg);
        st.apply_config(cfg);
        st.save_config();
    }
    ui.spectrum.queue_draw();
}

fn page() -> gtk::Box {
    let vbox = gtk::Box::new(gtk::Orientation::Vertical, 12);
    vbox.set_margin_top(20);
    vbox.set_margin_bottom(20);
    vbox.set_margin_start(20);
    vbox.set_margin_end(20);
    vbox
}

fn spin_row(
    vbox: &gtk::Box,
    label: &str,
    (min, max, step): (f64, f64, f64),
    value: f64,
    digits: u32,
) -> gtk::SpinButton {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    let l = gtk::Label::new(Some(label));
    l.set_halign(gtk::Align::Start);
    l.set_hexpand(true);
    let spin = gtk::SpinButton::with_range(min, max, step);
    spin.set_digits(digits);
    spin.set_value(value);
    row.append(&l);
    row.append(&spin);
    vbox.append(&row);
    spin
}

fn entry_row(vbox: &gtk::Box, label: &str, value: &str) -> gtk::Entry {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    let l = gtk::Label::new(Some(label));
    l.set_halign(gtk::Align::Start);
    l.set_hexpand(true);
    let entry = gtk::Entry::new();
    entry.set_text(value);
    row.append(&l);
    row.append(&entry);
    vbox.append(&row);
    entry
}

pub fn show_preferences_window(parent: &gtk::ApplicationWindow, state: Rc<RefCell<AppState>>, ui: Ui) {
    let window = gtk::Window::builder()
        .title("Preferences")
        .transient_for(parent)
        .modal(true)
        .default_width(460)
        .resizable(false)
        .build();

    let cfg = state.borrow().config.clone();
    let main_vbox = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let notebook = gtk::Notebook::new();
    notebook.set_vexpand(true);

    notebook.append_page(
        &build_spectrum_tab(&cfg, state.clone(), ui.clone()),
        Some(&gtk::Label::new(Some("Spectrum"))),
    );
    notebook.append_page(
        &build_animation_tab(&cfg, state.clone(), ui.clone()),
        Some(&gtk::Label::new(Some("Animation"))),
    );
    main_vbox.append(&notebook);

    // Footer
    let footer = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    footer.set_margin_top(10);
    footer.set_margin_bottom(10);
    footer.set_margin_end(10);
    footer.set_halign(gtk::Align::End);

    let btn_defaults = gtk::Button::with_label("Restore Defaults");
    let win_d = window.clone();
    btn_defaults.connect_clicked(move |_| {
        update(&state, &ui, |cfg| *cfg = Config::default());
        log::info!("Preferences restored to defaults");
        win_d.close();
    });
    footer.append(&btn_defaults);

    let btn_close = gtk::Button::with_label("Close");
    let win_clone = window.clone();
    btn_close.connect_clicked(move |_| win_clone.close());
    footer.append(&btn_close);
    main_vbox.append(&footer);

    window.set_child(Some(&main_vbox));
    window.present();
}

// ============================================================================
// TAB 1: SPECTRUM
// ============================================================================

fn build_spectrum_tab(cfg: &Config, state: Rc<RefCell<AppState>>, ui: Ui) -> gtk::Box {
    let vbox = page();

    let grid = spin_row(&vbox, "Grid spacing (px)", (GRID_SPACING_RANGE.0, GRID_SPACING_RANGE.1, 5.0), cfg.style.grid_spacing, 0);
    let (s, u) = (state.clone(), ui.clone());
    grid.connect_value_changed(move |sp| update(&s, &u, |c| c.style.grid_spacing = sp.value()));

    let glow = gtk::CheckButton::with_label("Glow around lines and zero order");
    glow.set_active(cfg.style.glow);
    let (s, u) = (state.clone(), ui.clone());
    glow.connect_toggled(move |c| update(&s, &u, |cfg| cfg.style.glow = c.is_active()));
    vbox.append(&glow);

    vbox.append(&gtk::Separator::new(gtk::Orientation::Horizontal));

    let label_font = entry_row(&vbox, "Line label font", &cfg.style.label_font);
    let (s, u) = (state.clone(), ui.clone());
    label_font.connect_activate(move |e| {
        let family = e.text().to_string();
        update(&s, &u, |c| c.style.label_font = family);
    });

    let marker_font = entry_row(&vbox, "Measurement font", &cfg.style.marker_font);
    let (s, u) = (state.clone(), ui.clone());
    marker_font.connect_activate(move |e| {
        let family = e.text().to_string();
        update(&s, &u, |c| c.style.marker_font = family);
    });

    vbox.append(&gtk::Separator::new(gtk::Orientation::Horizontal));

    let ratio = spin_row(&vbox, "PNG export scale", (PIXEL_RATIO_RANGE.0, PIXEL_RATIO_RANGE.1, 0.5), cfg.style.export_pixel_ratio, 1);
    let (s, u) = (state.clone(), ui.clone());
    ratio.connect_value_changed(move |sp| update(&s, &u, |c| c.style.export_pixel_ratio = sp.value()));

    let row = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    let l = gtk::Label::new(Some("Default export format"));
    l.set_halign(gtk::Align::Start);
    l.set_hexpand(true);
    let format = gtk::DropDown::from_strings(&["PNG", "PDF"]);
    format.set_selected(match cfg.default_export_format {
        ExportFormat::Png => 0,
        ExportFormat::Pdf => 1,
    });
    format.connect_selected_notify(move |dd| {
        let fmt = if dd.selected() == 1 { ExportFormat::Pdf } else { ExportFormat::Png };
        update(&state, &ui, |c| c.default_export_format = fmt);
    });
    row.append(&l);
    row.append(&format);
    vbox.append(&row);

    vbox
}

// ============================================================================
// TAB 2: ANIMATION
// ============================================================================

fn build_animation_tab(cfg: &Config, state: Rc<RefCell<AppState>>, ui: Ui) -> gtk::Box {
    let vbox = page();
    let a = cfg.animation;

    let delay = spin_row(&vbox, "Hold before drop (s)", (DROP_DELAY_RANGE.0, DROP_DELAY_RANGE.1, 0.1), a.drop_delay, 1);
    let (s, u) = (state.clone(), ui.clone());
    delay.connect_value_changed(move |sp| update(&s, &u, |c| c.animation.drop_delay = sp.value()));

    let speed = spin_row(&vbox, "Drop speed (levels/s)", (DROP_SPEED_RANGE.0, DROP_SPEED_RANGE.1, 0.5), a.drop_speed, 1);
    let (s, u) = (state.clone(), ui.clone());
    speed.connect_value_changed(move |sp| update(&s, &u, |c| c.animation.drop_speed = sp.value()));

    let photon = spin_row(&vbox, "Photon speed (units/s)", (PHOTON_SPEED_RANGE.0, PHOTON_SPEED_RANGE.1, 0.5), a.photon_speed, 1);
    let (s, u) = (state.clone(), ui.clone());
    photon.connect_value_changed(move |sp| update(&s, &u, |c| c.animation.photon_speed = sp.value()));

    let life = spin_row(&vbox, "Photon lifetime (s)", (PHOTON_LIFETIME_RANGE.0, PHOTON_LIFETIME_RANGE.1, 0.1), a.photon_lifetime, 1);
    life.connect_value_changed(move |sp| update(&state, &ui, |c| c.animation.photon_lifetime = sp.value()));

    let note = gtk::Label::new(Some("Applies from the next transition."));
    note.add_css_class("dim-label");
    note.set_halign(gtk::Align::Start);
    vbox.append(&note);

    vbox
}
