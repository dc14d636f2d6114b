// src/state.rs

use crate::config::Config;
use crate::io::measurements::MeasurementSet;
use crate::model::constants::{
  DEFAULT_DISTANCE_CM, DEFAULT_POLLUTION_PCT, DISTANCE_RANGE_CM, POLLUTION_RANGE_PCT,
  RYDBERG_THEORETICAL,
};
use crate::model::spectral::{BalmerTransition, ExperimentalDataPoint, LineCatalog, SpectralLine};
use crate::physics::rydberg::RydbergEstimate;
use crate::rendering::atom_view::AtomView;
use crate::utils::report;

// ============================================================================
// EXPERIMENT PARAMETERS
// ============================================================================

/// The knobs of the experiment. Setters keep every field inside its domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentParameters {
  /// Grating to screen, cm.
  pub distance: f64,
  /// Percent.
  pub light_pollution: f64,
  pub show_experimental: bool,
  /// `None` shows every line.
  pub active_transition: Option<BalmerTransition>,
  /// m^-1, reference only.
  pub rydberg_constant: f64,
}

impl Default for ExperimentParameters {
  fn default() -> Self {
    Self {
      distance: DEFAULT_DISTANCE_CM,
      light_pollution: DEFAULT_POLLUTION_PCT,
      show_experimental: false,
      active_transition: None,
      rydberg_constant: RYDBERG_THEORETICAL,
    }
  }
}

fn clamp_or(value: f64, (lo, hi): (f64, f64), fallback: f64) -> f64 {
  if value.is_finite() {
    value.clamp(lo, hi)
  } else {
    fallback
  }
}

impl ExperimentParameters {
  pub fn set_distance(&mut self, cm: f64) {
    self.distance = clamp_or(cm, DISTANCE_RANGE_CM, DEFAULT_DISTANCE_CM);
  }

  pub fn set_light_pollution(&mut self, pct: f64) {
    self.light_pollution = clamp_or(pct, POLLUTION_RANGE_PCT, DEFAULT_POLLUTION_PCT);
  }

  /// Copy with every numeric field forced back into its domain.
  pub fn sanitized(&self) -> Self {
    let mut p = *self;
    p.set_distance(self.distance);
    p.set_light_pollution(self.light_pollution);
    p
  }
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct AppState {
  pub params: ExperimentParameters,
  pub catalog: LineCatalog,
  /// Student measurements imported this session, replacing the built-in set.
  pub imported: Option<MeasurementSet>,
  pub config: Config,
  pub atom: AtomView,
}

impl AppState {
  pub fn new() -> Self {
    let config = Config::default();
    Self {
      params: ExperimentParameters::default(),
      catalog: LineCatalog::default(),
      imported: None,
      atom: AtomView::new(config.animation),
      config,
    }
  }

  pub fn load_config(&mut self) {
    let (config, msg) = Config::load();
    log::info!("{}", msg);
    self.apply_config(config);
  }

  pub fn apply_config(&mut self, config: Config) {
    let config = config.sanitized();
    self.atom.set_animation_settings(config.animation);
    self.config = config;
  }

  pub fn save_config(&self) {
    match self.config.save() {
      Ok(msg) => log::debug!("{}", msg),
      Err(e) => log::error!("{}", e),
    }
  }

  pub fn lines(&self) -> &'static [SpectralLine] {
    self.catalog.lines()
  }

  /// Imported measurements when present, otherwise the catalog's own.
  pub fn experimental_points(&self) -> Vec<ExperimentalDataPoint> {
    match &self.imported {
      Some(set) => set.points.clone(),
      None => self.catalog.experimental(),
    }
  }

  /// Focuses (or clears) a transition and restarts the atom animation.
  pub fn set_transition(&mut self, transition: Option<BalmerTransition>) {
    self.params.active_transition = transition;
    self.atom.set_transition(transition);
    match transition {
      Some(t) => log::info!("Transition {} ({})", t.label(), t.line().name),
      None => log::info!("Transition focus cleared"),
    }
  }

  pub fn rydberg(&self) -> RydbergEstimate {
    RydbergEstimate::from_pollution(self.params.light_pollution)
  }

  pub fn measurement_report(&self) -> String {
    report::measurement_summary(self.lines(), &self.experimental_points())
  }
}

impl Default for AppState {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let p = ExperimentParameters::default();
    assert_eq!(p.distance, 41.0);
    assert_eq!(p.light_pollution, 0.0);
    assert!(!p.show_experimental);
    assert_eq!(p.active_transition, None);
    assert_eq!(p.rydberg_constant, RYDBERG_THEORETICAL);
  }

  #[test]
  fn test_setters_clamp() {
    let mut p = ExperimentParameters::default();
    p.set_distance(120.0);
    p.set_light_pollution(-4.0);
    assert_eq!(p.distance, 60.0);
    assert_eq!(p.light_pollution, 0.0);
    p.set_distance(f64::NAN);
    assert_eq!(p.distance, DEFAULT_DISTANCE_CM);
  }

  #[test]
  fn test_sanitized_repairs_raw_fields() {
    let p = ExperimentParameters { distance: 5.0, light_pollution: 400.0, ..Default::default() };
    let s = p.sanitized();
    assert_eq!(s.distance, 30.0);
    assert_eq!(s.light_pollution, 100.0);
  }

  #[test]
  fn test_transition_drives_atom() {
    let mut st = AppState::new();
    st.set_transition(Some(BalmerTransition::N4));
    assert_eq!(st.params.active_transition, Some(BalmerTransition::N4));
    assert_eq!(st.atom.animation().current_level(), 4.0);
    st.set_transition(None);
    assert_eq!(st.params.active_transition, None);
    assert_eq!(st.atom.animation().target_level(), 2.0);
  }

  #[test]
  fn test_imported_points_override_builtin() {
    let mut st = AppState::new();
    assert_eq!(st.experimental_points().len(), 4);
    st.imported = Some(MeasurementSet {
      name: "lab".to_string(),
      points: vec![ExperimentalDataPoint {
        id: "m1".into(),
        wavelength_nm: 650.0,
        upper_level: Some(3),
      }],
    });
    assert_eq!(st.experimental_points().len(), 1);
  }

  #[test]
  fn test_apply_config_clamps_animation() {
    let mut st = AppState::new();
    let mut cfg = Config::default();
    cfg.animation.drop_speed = -4.0;
    cfg.style.grid_spacing = 1e-9;
    st.apply_config(cfg);
    assert_eq!(st.config.animation.drop_speed, 0.5);
    assert_eq!(st.config.style.grid_spacing, 10.0);
    assert_eq!(st.atom.animation().settings().drop_speed, 0.5);
  }
}
