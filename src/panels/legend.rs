// src/panels/legend.rs

use crate::model::spectral::{BalmerTransition, SpectralLine};
use gtk4::prelude::*;
use gtk4::{Box as GtkBox, FlowBox, Label, SelectionMode};

/// Row of colour chips under the spectrum, one per catalog line.
#[derive(Clone)]
pub struct Legend {
  pub root: FlowBox,
}

pub fn build() -> Legend {
  let root = FlowBox::builder()
    .selection_mode(SelectionMode::None)
    .max_children_per_line(8)
    .column_spacing(12)
    .margin_start(10)
    .margin_end(10)
    .margin_top(4)
    .margin_bottom(4)
    .build();
  Legend { root }
}

/// Lines outside the focused transition are shown dimmed.
pub fn is_emphasized(line: &SpectralLine, active: Option<BalmerTransition>) -> bool {
  match active {
    Some(t) => line.upper_level == Some(t.level()),
    None => true,
  }
}

impl Legend {
  pub fn sync(&self, lines: &[SpectralLine], active: Option<BalmerTransition>) {
    while let Some(child) = self.root.first_child() {
      self.root.remove(&child);
    }
    for line in lines {
      let chip = GtkBox::new(gtk4::Orientation::Horizontal, 4);
      let label = Label::new(None);
      label.set_markup(&format!(
        "<span foreground=\"{}\">■</span> {} <small>{} nm</small>",
        line.color.to_hex(),
        line.name,
        line.wavelength_nm
      ));
      if !is_emphasized(line, active) {
        label.add_css_class("dimmed");
      }
      chip.append(&label);
      self.root.insert(&chip, -1);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::spectral::{BALMER_LINES, H2_ROTATIONAL_LINES};

  #[test]
  fn test_emphasis_follows_focus() {
    assert!(BALMER_LINES.iter().all(|l| is_emphasized(l, None)));
    let focused: Vec<_> = BALMER_LINES
      .iter()
      .filter(|l| is_emphasized(l, Some(BalmerTransition::N5)))
      .map(|l| l.id)
      .collect();
    assert_eq!(focused, vec!["h-gamma"]);
    assert!(!is_emphasized(&H2_ROTATIONAL_LINES[0], Some(BalmerTransition::N3)));
  }
}
