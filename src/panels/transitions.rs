// src/panels/transitions.rs

use crate::model::spectral::BalmerTransition;
use crate::state::AppState;
use crate::ui::{self, Ui};
use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, Grid, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct TransitionButtons {
  pub root: GtkBox,
  buttons: Vec<(BalmerTransition, Button)>,
  reset: Button,
}

fn button_for(t: BalmerTransition) -> Button {
  let line = t.line();
  let label = Label::new(None);
  label.set_markup(&format!(
    "<span foreground=\"{}\">●</span> {}  <small>{}</small>",
    line.color.to_hex(),
    t.label(),
    line.name
  ));
  let button = Button::new();
  button.set_child(Some(&label));
  button.set_tooltip_text(Some(&format!("{} nm, key {}", line.wavelength_nm, t.level())));
  button
}

pub fn build() -> TransitionButtons {
  let root = GtkBox::new(Orientation::Vertical, 8);

  let hint = Label::new(Some("Excite the electron and watch it fall back to n=2."));
  hint.set_wrap(true);
  hint.set_xalign(0.0);
  hint.add_css_class("dim-label");
  root.append(&hint);

  let grid = Grid::builder().row_spacing(6).column_spacing(6).column_homogeneous(true).build();
  let mut buttons = Vec::new();
  for (i, t) in BalmerTransition::ALL.into_iter().enumerate() {
    let b = button_for(t);
    grid.attach(&b, (i % 2) as i32, (i / 2) as i32, 1, 1);
    buttons.push((t, b));
  }
  root.append(&grid);

  let reset = Button::with_label("Reset (show all lines)");
  root.append(&reset);

  TransitionButtons { root, buttons, reset }
}

impl TransitionButtons {
  pub fn connect(&self, state: Rc<RefCell<AppState>>, ui: Ui) {
    for (t, button) in &self.buttons {
      let t = *t;
      let s = state.clone();
      let u = ui.clone();
      button.connect_clicked(move |_| ui::select_transition(&s, &u, Some(t)));
    }
    self.reset.connect_clicked(move |_| ui::select_transition(&state, &ui, None));
  }

  pub fn sync(&self, active: Option<BalmerTransition>) {
    for (t, button) in &self.buttons {
      if active == Some(*t) {
        button.add_css_class("transition-active");
      } else {
        button.remove_css_class("transition-active");
      }
    }
    self.reset.set_sensitive(active.is_some());
  }
}
