// src/menu/actions_view.rs

use crate::state::AppState;
use crate::ui::{self, Ui};
use gtk4::prelude::*;
use gtk4::{Application, Revealer};
use std::cell::RefCell;
use std::rc::Rc;

pub fn setup(app: &Application, state: Rc<RefCell<AppState>>, ui: Ui, sidebar: &Revealer) {
    // 1. Reset Camera
    let act_reset = gtk4::gio::SimpleAction::new("view_reset", None);
    let s_reset = state.clone();
    let u_reset = ui.clone();
    act_reset.connect_activate(move |_, _| {
        ui::reset_camera(&s_reset, &u_reset);
        log::info!("Camera reset");
    });
    app.add_action(&act_reset);

    // 2. Toggle Experimental Data
    let act_exp = gtk4::gio::SimpleAction::new("toggle_experimental", None);
    act_exp.connect_activate(move |_, _| ui::toggle_experimental(&state, &ui));
    app.add_action(&act_exp);

    // 3. Toggle Sidebar
    let toggle_action = gtk4::gio::SimpleAction::new("toggle_sidebar", None);
    let rev_weak = sidebar.downgrade();
    toggle_action.connect_activate(move |_, _| {
        if let Some(rev) = rev_weak.upgrade() {
            rev.set_reveal_child(!rev.reveals_child());
        }
    });
    app.add_action(&toggle_action);
}
