use gtk4::prelude::*;
use gtk4::{AboutDialog, Application, ApplicationWindow, License};

const CONTROLS_TEXT: &str = "\
Controls
  Grating distance     30-60 cm, moves the first orders outwards
  Light pollution      0-100 %, washes out contrast and the violet line
  Show experimental    overlays the measured lines below the divider
  Spectrum source      atomic Balmer lines or molecular H2 bands

Transitions
  3 / 4 / 5 / 6        excite to n and watch the drop to n=2
  0 or Esc             show all lines again

Atom view
  Drag                 orbit the camera
  Scroll               zoom (5-20 units)

Shortcuts
  Ctrl+O  import measurements     Ctrl+E  export spectrum
  Ctrl+P  preferences             Ctrl+Q  quit
  Ctrl+R  reset camera            Ctrl+X  toggle experimental data
  F9      toggle sidebar";

pub fn setup(app: &Application, window: &ApplicationWindow) {
    // --- ABOUT ACTION ---
    let about_action = gtk4::gio::SimpleAction::new("help_about", None);
    let win_weak = window.downgrade();

    about_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak.upgrade() {
            let dialog = AboutDialog::builder()
                .transient_for(&win)
                .modal(true)
                .program_name("Balmer Lab")
                .version(env!("CARGO_PKG_VERSION"))
                .comments("Diffraction-grating simulation of the hydrogen Balmer series, with a Bohr-model view and Rydberg constant analysis.")
                .authors(vec!["Mavens Group".to_string()])
                .license_type(License::MitX11)
                .logo_icon_name("applications-science")
                .build();

            dialog.present();
        }
    });
    app.add_action(&about_action);

    // --- CONTROLS & SHORTCUTS ACTION ---
    let help_action = gtk4::gio::SimpleAction::new("help_controls", None);
    let win_weak_h = window.downgrade();

    help_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak_h.upgrade() {
            let text = gtk4::Label::new(Some(CONTROLS_TEXT));
            text.add_css_class("monospace");
            text.set_margin_top(16);
            text.set_margin_bottom(16);
            text.set_margin_start(16);
            text.set_margin_end(16);
            text.set_xalign(0.0);

            let dialog = gtk4::Window::builder()
                .title("Controls & Shortcuts")
                .transient_for(&win)
                .modal(true)
                .resizable(false)
                .child(&text)
                .build();
            dialog.present();
        }
    });
    app.add_action(&help_action);
}
