// src/panels/data_panel.rs
// Live Rydberg estimate, relative error and the error-vs-pollution chart.

use crate::model::constants::RYDBERG_THEORETICAL;
use crate::physics::rydberg::{Assessment, RydbergEstimate};
use crate::rendering::error_chart;
use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, DrawingArea, Grid, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct DataPanel {
  pub root: GtkBox,
  r_exp: Label,
  error: Label,
  message: Label,
  chart: DrawingArea,
}

fn caption(text: &str) -> Label {
  let label = Label::builder().label(text).halign(Align::Start).build();
  label.add_css_class("dim-label");
  label
}

fn value() -> Label {
  let label = Label::builder().halign(Align::End).hexpand(true).build();
  label.add_css_class("result-value");
  label
}

pub fn format_rydberg(r: f64) -> String {
  format!("{:.4e} m⁻¹", r)
}

pub fn build(state: Rc<RefCell<AppState>>) -> DataPanel {
  let root = GtkBox::new(Orientation::Vertical, 8);

  let grid = Grid::builder().row_spacing(4).column_spacing(12).build();
  let r_exp = value();
  let error = value();
  let theory = value();
  theory.set_text(&format_rydberg(RYDBERG_THEORETICAL));

  grid.attach(&caption("R (experimental)"), 0, 0, 1, 1);
  grid.attach(&r_exp, 1, 0, 1, 1);
  grid.attach(&caption("Relative error"), 0, 1, 1, 1);
  grid.attach(&error, 1, 1, 1, 1);
  grid.attach(&caption("R (theoretical)"), 0, 2, 1, 1);
  grid.attach(&theory, 1, 2, 1, 1);
  root.append(&grid);

  let message = Label::new(None);
  message.set_wrap(true);
  message.set_xalign(0.0);
  root.append(&message);

  let chart = DrawingArea::new();
  chart.set_content_height(170);
  chart.set_hexpand(true);
  chart.set_draw_func(move |_, cr, w, h| {
    let pollution = state.borrow().params.light_pollution;
    error_chart::paint_error_chart(cr, w, h, pollution);
  });
  root.append(&chart);

  DataPanel { root, r_exp, error, message, chart }
}

impl DataPanel {
  pub fn sync(&self, estimate: &RydbergEstimate) {
    self.r_exp.set_text(&format_rydberg(estimate.experimental));
    self.error.set_text(&format!("{:.2} %", estimate.relative_error));

    let assessment = estimate.assessment();
    self.message.set_text(assessment.message());
    let (on, off) = match assessment {
      Assessment::HighError => ("error-high", "error-ok"),
      Assessment::Optimal => ("error-ok", "error-high"),
    };
    self.error.add_css_class(on);
    self.error.remove_css_class(off);
    self.message.add_css_class(on);
    self.message.remove_css_class(off);

    self.chart.queue_draw();
  }
}
