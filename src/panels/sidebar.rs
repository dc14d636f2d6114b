// src/panels/sidebar.rs

use gdk4 as gdk;
use gtk4::prelude::*;
use gtk4::{
  Adjustment, Align, Box as GtkBox, CssProvider, DropDown, Expander, Label, Orientation,
  PolicyType, Scale, ScrolledWindow, Switch, STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use crate::model::constants::{
  DISTANCE_RANGE_CM, DISTANCE_STEP_CM, POLLUTION_RANGE_PCT, POLLUTION_STEP_PCT,
};
use crate::model::spectral::LineCatalog;
use crate::state::{AppState, ExperimentParameters};
use crate::ui::{self, Ui};
use std::cell::RefCell;
use std::rc::Rc;

const CSS: &str = "
  scale.thin-slider slider {
    min-width: 6px;
    min-height: 18px;
    margin-top: -7px;
    margin-bottom: -7px;
    border-radius: 2px;
    background-color: #555555;
    box-shadow: none;
    outline: none;
  }
  scale.thin-slider slider:hover { background-color: #6366f1; }
  button.transition-active { background: #4f46e5; color: #ffffff; }
  label.error-high { color: #f87171; font-weight: bold; }
  label.error-ok { color: #4ade80; }
  label.dimmed { opacity: 0.3; }
  label.result-value { font-family: monospace; font-size: 14pt; }
";

/// The input widgets, kept so keyboard and menu changes can be mirrored back.
#[derive(Clone)]
pub struct SidebarControls {
  pub distance: Scale,
  pub pollution: Scale,
  pub experimental: Switch,
  pub catalog: DropDown,
}

fn install_css() {
  let provider = CssProvider::new();
  provider.load_from_data(CSS);
  if let Some(display) = gdk::Display::default() {
    gtk4::style_context_add_provider_for_display(
      &display,
      &provider,
      STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
  }
}

fn create_slider(label: &str, (min, max): (f64, f64), step: f64, val: f64, digits: i32) -> (GtkBox, Scale) {
  let b = GtkBox::new(Orientation::Vertical, 2);
  b.append(&Label::builder().label(label).halign(Align::Start).build());

  let adj = Adjustment::new(val, min, max, step, step * 10.0, 0.0);
  let scale = Scale::new(Orientation::Horizontal, Some(&adj));
  scale.add_css_class("thin-slider");
  scale.set_digits(digits);
  scale.set_draw_value(true);
  scale.set_value_pos(gtk4::PositionType::Right);
  b.append(&scale);
  (b, scale)
}

fn section(title: &str, child: &GtkBox) -> Expander {
  let expander = Expander::new(Some(title));
  expander.set_expanded(true);
  child.set_margin_top(10);
  child.set_margin_bottom(10);
  child.set_margin_start(5);
  expander.set_child(Some(child));
  expander
}

/// Builds the sidebar around the transition and results panels.
pub fn build(state: &AppState, transitions: &GtkBox, results: &GtkBox) -> (ScrolledWindow, SidebarControls) {
  install_css();

  let scroll = ScrolledWindow::builder()
    .hscrollbar_policy(PolicyType::Never)
    .vscrollbar_policy(PolicyType::Automatic)
    .min_content_width(280)
    .build();

  let root_vbox = GtkBox::new(Orientation::Vertical, 10);
  root_vbox.set_margin_start(10);
  root_vbox.set_margin_end(10);
  root_vbox.set_margin_top(10);
  root_vbox.set_margin_bottom(10);
  scroll.set_child(Some(&root_vbox));

  // ============================================================
  // SECTION 1: EXPERIMENT CONTROLS
  // ============================================================
  let controls_box = GtkBox::new(Orientation::Vertical, 15);
  let params = &state.params;

  let (dist_box, distance) =
    create_slider("Grating distance (cm)", DISTANCE_RANGE_CM, DISTANCE_STEP_CM, params.distance, 1);
  controls_box.append(&dist_box);

  let (poll_box, pollution) = create_slider(
    "Light pollution (%)",
    POLLUTION_RANGE_PCT,
    POLLUTION_STEP_PCT,
    params.light_pollution,
    0,
  );
  controls_box.append(&poll_box);

  let exp_row = GtkBox::new(Orientation::Horizontal, 10);
  let exp_label = Label::builder().label("Show experimental data").halign(Align::Start).hexpand(true).build();
  let experimental = Switch::builder().active(params.show_experimental).valign(Align::Center).build();
  exp_row.append(&exp_label);
  exp_row.append(&experimental);
  controls_box.append(&exp_row);

  let source_box = GtkBox::new(Orientation::Vertical, 2);
  source_box.append(&Label::builder().label("Spectrum source").halign(Align::Start).build());
  let titles: Vec<&str> = LineCatalog::ALL.iter().map(|c| c.title()).collect();
  let catalog = DropDown::from_strings(&titles);
  catalog.set_selected(catalog_index(state.catalog));
  source_box.append(&catalog);
  controls_box.append(&source_box);

  root_vbox.append(&section("Experiment", &controls_box));

  // ============================================================
  // SECTION 2: TRANSITIONS
  // ============================================================
  root_vbox.append(&section("Electron Transitions", transitions));

  // ============================================================
  // SECTION 3: RESULTS
  // ============================================================
  root_vbox.append(&section("Results", results));

  (scroll, SidebarControls { distance, pollution, experimental, catalog })
}

fn catalog_index(catalog: LineCatalog) -> u32 {
  LineCatalog::ALL.iter().position(|c| *c == catalog).unwrap_or(0) as u32
}

impl SidebarControls {
  pub fn connect(&self, state: Rc<RefCell<AppState>>, ui: Ui) {
    let s = state.clone();
    let u = ui.clone();
    self.distance.connect_value_changed(move |sc| {
      if let Some(v) = snapped(sc, DISTANCE_STEP_CM) {
        ui::set_distance(&s, &u, v);
      }
    });

    let s = state.clone();
    let u = ui.clone();
    self.pollution.connect_value_changed(move |sc| {
      if let Some(v) = snapped(sc, POLLUTION_STEP_PCT) {
        ui::set_pollution(&s, &u, v);
      }
    });

    let s = state.clone();
    let u = ui.clone();
    self.experimental.connect_active_notify(move |sw| {
      ui::set_show_experimental(&s, &u, sw.is_active());
    });

    self.catalog.connect_selected_notify(move |dd| {
      if let Some(c) = LineCatalog::ALL.get(dd.selected() as usize) {
        ui::set_catalog(&state, &ui, *c);
      }
    });
  }

  /// Mirrors state changes made elsewhere (keys, menu) into the widgets.
  pub fn sync(&self, params: &ExperimentParameters, catalog: LineCatalog) {
    if self.distance.value() != params.distance {
      self.distance.set_value(params.distance);
    }
    if self.pollution.value() != params.light_pollution {
      self.pollution.set_value(params.light_pollution);
    }
    if self.experimental.is_active() != params.show_experimental {
      self.experimental.set_active(params.show_experimental);
    }
    let idx = catalog_index(catalog);
    if self.catalog.selected() != idx {
      self.catalog.set_selected(idx);
    }
  }
}

/// Snaps the slider to its step. Returns `None` while the snap re-enters.
fn snapped(sc: &Scale, step: f64) -> Option<f64> {
  let raw = sc.value();
  let snapped = (raw / step).round() * step;
  if (raw - snapped).abs() > 0.0001 {
    sc.set_value(snapped);
    return None;
  }
  Some(snapped)
}
