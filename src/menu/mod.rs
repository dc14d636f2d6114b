// src/menu/mod.rs

use crate::state::AppState;
use crate::ui::Ui;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, Revealer};
use std::cell::RefCell;
use std::rc::Rc;

pub mod actions_file;
pub mod actions_help;
pub mod actions_view;

pub fn build_menu_and_actions(
  app: &Application,
  window: &ApplicationWindow,
  state: Rc<RefCell<AppState>>,
  ui: Ui,
  sidebar: &Revealer,
) -> gtk4::Box {
  // Register Actions
  actions_file::setup(app, window, state.clone(), ui.clone());
  actions_view::setup(app, state, ui, sidebar);
  actions_help::setup(app, window);

  // Keyboard Shortcuts
  app.set_accels_for_action("app.import", &["<Primary>o"]);
  app.set_accels_for_action("app.export", &["<Primary>e"]);
  app.set_accels_for_action("app.preferences", &["<Primary>p"]);
  app.set_accels_for_action("app.quit", &["<Primary>q"]);
  app.set_accels_for_action("app.view_reset", &["<Primary>r"]);
  app.set_accels_for_action("app.toggle_experimental", &["<Primary>x"]);
  app.set_accels_for_action("app.toggle_sidebar", &["F9"]);

  // --- BUILD MENU BAR ---
  let menu_bar = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
  let root_model = gtk4::gio::Menu::new();

  // --- FILE MENU ---
  let file_menu = gtk4::gio::Menu::new();
  file_menu.append(Some("Import Measurements..."), Some("app.import"));
  file_menu.append(Some("Export Spectrum..."), Some("app.export"));
  file_menu.append(Some("Preferences..."), Some("app.preferences"));
  file_menu.append(Some("Quit"), Some("app.quit"));
  root_model.append_submenu(Some("File"), &file_menu);

  // --- VIEW MENU ---
  let view_menu = gtk4::gio::Menu::new();
  view_menu.append(Some("Reset Camera"), Some("app.view_reset"));
  view_menu.append(Some("Toggle Experimental Data"), Some("app.toggle_experimental"));
  view_menu.append(Some("Toggle Sidebar"), Some("app.toggle_sidebar"));
  root_model.append_submenu(Some("View"), &view_menu);

  // --- HELP MENU ---
  let help_menu = gtk4::gio::Menu::new();
  help_menu.append(Some("Controls & Shortcuts"), Some("app.help_controls"));
  help_menu.append(Some("About"), Some("app.help_about"));
  root_model.append_submenu(Some("Help"), &help_menu);

  let popover_bar = gtk4::PopoverMenuBar::from_model(Some(&root_model));
  menu_bar.append(&popover_bar);

  menu_bar
}
