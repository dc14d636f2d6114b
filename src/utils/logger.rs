// src/utils/logger.rs
// Routes the `log` facade into the console pane at the bottom of the window.

use gtk4::prelude::*;
use gtk4::{glib, TextView};
use log::{Level, Metadata, Record, SetLoggerError};
use std::sync::OnceLock;

static CONSOLE: OnceLock<glib::SendWeakRef<TextView>> = OnceLock::new();
static LOGGER: ConsoleLogger = ConsoleLogger;

/// (tag, foreground, bold)
const TAGS: [(&str, &str, bool); 4] = [
  ("error", "#f87171", true),
  ("warn", "#fbbf24", false),
  ("info", "#38bdf8", false),
  ("debug", "#94a3b8", false),
];

struct ConsoleLogger;

pub fn init(view: &TextView) -> Result<(), SetLoggerError> {
  let tag_table = view.buffer().tag_table();
  for (name, color, bold) in TAGS {
    if tag_table.lookup(name).is_none() {
      let tag = gtk4::TextTag::new(Some(name));
      tag.set_property("foreground", color);
      if bold {
        tag.set_property("weight", 700);
      }
      tag_table.add(&tag);
    }
  }

  let _ = CONSOLE.set(view.downgrade().into());
  log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Debug))
}

/// Console line and tag name for a record.
fn format_line(level: Level, message: &str) -> (String, &'static str) {
  let (marker, tag) = match level {
    Level::Error => ("✖", "error"),
    Level::Warn => ("▲", "warn"),
    Level::Info => ("●", "info"),
    Level::Debug | Level::Trace => ("·", "debug"),
  };
  (format!("{} {}\n", marker, message), tag)
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= Level::Debug
  }

  fn log(&self, record: &Record) {
    if !self.enabled(record.metadata()) {
      return;
    }
    let (line, tag) = format_line(record.level(), &record.args().to_string());

    // Records may come from inside a borrow of the buffer; append on the next idle
    glib::MainContext::default().spawn_local(async move {
      let Some(view) = CONSOLE.get().and_then(|weak| weak.upgrade()) else {
        return;
      };
      let buffer = view.buffer();
      let mut end = buffer.end_iter();
      buffer.insert_with_tags_by_name(&mut end, &line, &[tag]);

      let mark = buffer.create_mark(None, &buffer.end_iter(), false);
      view.scroll_to_mark(&mark, 0.0, true, 0.0, 1.0);
      buffer.delete_mark(&mark);
    });
  }

  fn flush(&self) {}
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_levels_map_to_known_tags() {
    for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
      let (line, tag) = format_line(level, "x");
      assert!(line.ends_with("x\n"));
      assert!(TAGS.iter().any(|(name, _, _)| *name == tag));
    }
    assert_eq!(format_line(Level::Error, "boom").1, "error");
  }
}
