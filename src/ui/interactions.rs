// src/ui/interactions.rs

use crate::model::spectral::BalmerTransition;
use crate::state::AppState;
use crate::ui::{self, Ui};
use gdk4 as gdk;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, EventControllerKey, EventControllerScroll, EventControllerScrollFlags, GestureDrag};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
  Select(BalmerTransition),
  Clear,
}

/// Number keys 3-6 focus a transition, 0 and Escape clear it.
/// Chords with Ctrl or Alt are left to the menu accelerators.
pub fn key_command(key: gdk::Key, modifiers: gdk::ModifierType) -> Option<KeyCommand> {
  if modifiers.intersects(gdk::ModifierType::CONTROL_MASK | gdk::ModifierType::ALT_MASK) {
    return None;
  }
  let level = match key {
    gdk::Key::_3 | gdk::Key::KP_3 => 3,
    gdk::Key::_4 | gdk::Key::KP_4 => 4,
    gdk::Key::_5 | gdk::Key::KP_5 => 5,
    gdk::Key::_6 | gdk::Key::KP_6 => 6,
    gdk::Key::_0 | gdk::Key::KP_0 | gdk::Key::Escape => return Some(KeyCommand::Clear),
    _ => return None,
  };
  BalmerTransition::from_level(level).map(KeyCommand::Select)
}

pub fn setup_interactions(window: &ApplicationWindow, state: Rc<RefCell<AppState>>, ui: Ui) {
  // 1. KEYBOARD
  let key_controller = EventControllerKey::new();
  let s = state.clone();
  let u = ui.clone();
  key_controller.connect_key_pressed(move |_, keyval, _keycode, modifiers| {
    match key_command(keyval, modifiers) {
      Some(KeyCommand::Select(t)) => ui::select_transition(&s, &u, Some(t)),
      Some(KeyCommand::Clear) => ui::select_transition(&s, &u, None),
      None => return glib::Propagation::Proceed,
    }
    glib::Propagation::Stop
  });
  window.add_controller(key_controller);

  // 2. MOUSE DRAG (orbit)
  let drag = GestureDrag::new();
  let last = Rc::new(Cell::new((0.0, 0.0)));

  let l = last.clone();
  drag.connect_drag_begin(move |_, _, _| l.set((0.0, 0.0)));

  let s = state.clone();
  let da = ui.atom.clone();
  drag.connect_drag_update(move |_, x, y| {
    // Offsets are cumulative from the drag start
    let (px, py) = last.get();
    last.set((x, y));
    s.borrow_mut().atom.camera_mut().rotate(x - px, y - py);
    da.queue_draw();
  });
  ui.atom.add_controller(drag);

  // 3. SCROLL (zoom)
  let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
  let da = ui.atom.clone();
  scroll.connect_scroll(move |_, _, dy| {
    state.borrow_mut().atom.camera_mut().zoom(dy.signum());
    da.queue_draw();
    glib::Propagation::Stop
  });
  ui.atom.add_controller(scroll);
}
