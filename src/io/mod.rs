// src/io/mod.rs
pub mod measurements;

pub use measurements::{load as load_measurements, MeasurementSet};

/// File-chooser patterns for measurement tables.
pub const MEASUREMENT_PATTERNS: [&str; 7] = ["*.txt", "*.csv", "*.dat", "*.xlsx", "*.xls", "*.xlsm", "*.ods"];
