use gtk4::prelude::*;
use gtk4::Box as GtkBox;
use gtk4::{Application, ApplicationWindow, DrawingArea, Frame, Orientation, Paned, ScrolledWindow, TextView};
use gtk4::{Revealer, RevealerTransitionType};
use std::cell::RefCell;
use std::rc::Rc;

pub mod config;
pub mod io;
pub mod menu;
pub mod model;
pub mod panels;
pub mod physics;
pub mod rendering;
pub mod state;
pub mod ui;
pub mod utils;

use state::AppState;
use ui::{setup_interactions, Ui};

fn main() {
    let app = Application::builder()
        .application_id("org.mavensgroup.balmer-lab")
        .build();

    app.connect_activate(build_ui);
    app.run();
}

fn build_ui(app: &Application) {
    let window = ApplicationWindow::builder()
        .application(app)
        .title("Balmer Lab - Hydrogen Spectroscopy")
        .default_width(1280)
        .default_height(860)
        .build();

    // Console first, so config loading below already lands in it
    let console_view = TextView::builder()
        .editable(false).cursor_visible(false).monospace(true)
        .left_margin(10).right_margin(10).top_margin(10).bottom_margin(10)
        .build();
    if let Err(e) = utils::logger::init(&console_view) {
        eprintln!("Logger already set: {}", e);
    }

    let mut initial_state = AppState::new();
    initial_state.load_config();
    let state = Rc::new(RefCell::new(initial_state));

    // 1. TOP LEVEL: Vertical Box (Menu on top, Main Content below)
    let root_vbox = GtkBox::new(Orientation::Vertical, 0);
    window.set_child(Some(&root_vbox));

    // 2. MAIN CONTENT: Horizontal Box (Sidebar | Right Panel)
    let main_hbox = GtkBox::new(Orientation::Horizontal, 0);
    main_hbox.set_vexpand(true);

    // --- Right Panel (Atom view / Spectrum + Legend / Console) ---
    let right_vbox = GtkBox::new(Orientation::Vertical, 0);
    right_vbox.set_hexpand(true);

    let atom_area = DrawingArea::new();
    atom_area.set_vexpand(true);
    atom_area.set_content_height(300);

    let spectrum_area = DrawingArea::new();
    spectrum_area.set_vexpand(true);
    spectrum_area.set_content_height(260);

    let spectrum_box = GtkBox::new(Orientation::Vertical, 0);
    spectrum_box.append(&spectrum_area);
    let legend = panels::legend::build();
    spectrum_box.append(&legend.root);

    let views = Paned::new(Orientation::Vertical);
    views.set_start_child(Some(&atom_area));
    views.set_end_child(Some(&spectrum_box));
    views.set_vexpand(true);

    let info_frame = Frame::new(None);
    let scroll_win = ScrolledWindow::builder()
        .min_content_height(140)
        .child(&console_view)
        .build();
    info_frame.set_child(Some(&scroll_win));

    right_vbox.append(&views);
    right_vbox.append(&info_frame);

    // --- Left Panel (Sidebar) ---
    let transitions = panels::transitions::build();
    let data = panels::data_panel::build(state.clone());
    let (sidebar_widget, controls) =
        panels::sidebar::build(&state.borrow(), &transitions.root, &data.root);

    let sidebar_revealer = Revealer::builder()
        .transition_type(RevealerTransitionType::SlideRight)
        .child(&sidebar_widget)
        .reveal_child(true)
        .build();

    main_hbox.append(&sidebar_revealer);
    main_hbox.append(&right_vbox);

    let ui = Ui {
        spectrum: spectrum_area.clone(),
        atom: atom_area.clone(),
        controls,
        transitions,
        data,
        legend,
    };

    // 3. Menu Bar
    let menu_bar = menu::build_menu_and_actions(app, &window, state.clone(), ui.clone(), &sidebar_revealer);

    root_vbox.append(&menu_bar);
    root_vbox.append(&main_hbox);

    // --- Setup Logic ---
    ui.controls.connect(state.clone(), ui.clone());
    ui.transitions.connect(state.clone(), ui.clone());
    setup_interactions(&window, state.clone(), ui.clone());

    rendering::setup_spectrum_drawing(&spectrum_area, state.clone());
    rendering::setup_atom_drawing(&atom_area, state.clone());

    ui.refresh(&state);
    log::info!("Ready. Press 3-6 to excite the electron, Ctrl+X for measured lines.");

    window.present();
}
