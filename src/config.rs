// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
  Png,
  Pdf,
}

impl ExportFormat {
  pub fn from_path(path: &str) -> Self {
    if path.to_lowercase().ends_with(".pdf") {
      ExportFormat::Pdf
    } else {
      ExportFormat::Png
    }
  }
}

// --- Ranges ---
// Shared with the preference spin buttons; hand-edited files are clamped to them.

pub const GRID_SPACING_RANGE: (f64, f64) = (10.0, 200.0);
pub const PIXEL_RATIO_RANGE: (f64, f64) = (1.0, 4.0);
pub const DROP_DELAY_RANGE: (f64, f64) = (0.0, 3.0);
pub const DROP_SPEED_RANGE: (f64, f64) = (0.5, 10.0);
pub const PHOTON_SPEED_RANGE: (f64, f64) = (1.0, 20.0);
pub const PHOTON_LIFETIME_RANGE: (f64, f64) = (0.5, 5.0);

fn clamp_or(value: f64, (lo, hi): (f64, f64), fallback: f64) -> f64 {
  if value.is_finite() {
    value.clamp(lo, hi)
  } else {
    fallback
  }
}

// --- SpectrumStyle ---
// Look of the diffraction canvas. Physics constants are not configurable.

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumStyle {
  /// Spacing (px) of the vertical reference grid.
  pub grid_spacing: f64,
  /// Halo around the theoretical beams.
  pub glow: bool,
  pub label_font: String,
  pub marker_font: String,
  /// Backing resolution multiplier for PNG export.
  pub export_pixel_ratio: f64,
}

impl Default for SpectrumStyle {
  fn default() -> Self {
    Self {
      grid_spacing: 50.0,
      glow: true,
      label_font: "Sans".to_string(),
      marker_font: "Monospace".to_string(),
      export_pixel_ratio: 2.0,
    }
  }
}

impl SpectrumStyle {
  pub fn sanitized(&self) -> Self {
    let d = Self::default();
    let font = |f: &str, fallback: String| if f.trim().is_empty() { fallback } else { f.to_string() };
    Self {
      grid_spacing: clamp_or(self.grid_spacing, GRID_SPACING_RANGE, d.grid_spacing),
      glow: self.glow,
      label_font: font(&self.label_font, d.label_font),
      marker_font: font(&self.marker_font, d.marker_font),
      export_pixel_ratio: clamp_or(self.export_pixel_ratio, PIXEL_RATIO_RANGE, d.export_pixel_ratio),
    }
  }
}

// --- AnimationSettings ---

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
  /// Seconds the electron rests on the upper level before dropping.
  pub drop_delay: f64,
  /// Levels per second.
  pub drop_speed: f64,
  /// Scene units per second.
  pub photon_speed: f64,
  /// Seconds until a photon has faded out.
  pub photon_lifetime: f64,
}

impl Default for AnimationSettings {
  fn default() -> Self {
    Self {
      drop_delay: 0.5,
      drop_speed: 4.0,
      photon_speed: 5.0,
      photon_lifetime: 2.0,
    }
  }
}

impl AnimationSettings {
  pub fn sanitized(&self) -> Self {
    let d = Self::default();
    Self {
      drop_delay: clamp_or(self.drop_delay, DROP_DELAY_RANGE, d.drop_delay),
      drop_speed: clamp_or(self.drop_speed, DROP_SPEED_RANGE, d.drop_speed),
      photon_speed: clamp_or(self.photon_speed, PHOTON_SPEED_RANGE, d.photon_speed),
      photon_lifetime: clamp_or(self.photon_lifetime, PHOTON_LIFETIME_RANGE, d.photon_lifetime),
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub style: SpectrumStyle,

  #[serde(default)]
  pub animation: AnimationSettings,

  #[serde(default = "default_export_format")]
  pub default_export_format: ExportFormat,
}

fn default_export_format() -> ExportFormat {
  ExportFormat::Png
}

impl Default for Config {
  fn default() -> Self {
    Self {
      style: SpectrumStyle::default(),
      animation: AnimationSettings::default(),
      default_export_format: default_export_format(),
    }
  }
}

impl Config {
  /// Copy with every numeric setting pulled back into its preference range.
  pub fn sanitized(&self) -> Self {
    Self {
      style: self.style.sanitized(),
      animation: self.animation.sanitized(),
      default_export_format: self.default_export_format,
    }
  }

  /// Loads config from standard OS location (e.g., ~/.config/balmer-lab/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  pub fn load_from(path: &PathBuf) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader::<_, Config>(reader) {
            Ok(cfg) => {
              let clean = cfg.sanitized();
              if clean != cfg {
                log::warn!("Out-of-range values in {:?} were clamped", path);
              }
              (clean, format!("Config loaded from {:?}", path))
            }
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> Result<String, String> {
    self.save_to(&Self::get_path())
  }

  pub fn save_to(&self, path: &PathBuf) -> Result<String, String> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| format!("Could not create config dir: {}", e))?;
    }

    let file = File::create(path).map_err(|e| format!("Could not create config file: {}", e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, self).map_err(|e| format!("Failed to save config: {}", e))?;
    Ok(format!("Config saved to {:?}", path))
  }

  fn get_path() -> PathBuf {
    // Must match the application id in main.rs
    if let Some(proj) = ProjectDirs::from("org", "mavensgroup", "balmer-lab") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
