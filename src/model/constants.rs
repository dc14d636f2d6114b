// src/model/constants.rs
// Physical constants of the grating experiment. Never mutated.

/// Grating period g in meters.
pub const GRATING_PERIOD: f64 = 1.731e-6;

/// Theoretical Rydberg constant for hydrogen, m^-1.
pub const RYDBERG_THEORETICAL: f64 = 1.097373e7;

/// Measured R under ideal dark-room conditions (~4.94% error), m^-1.
pub const R_EXP_DARK: f64 = 1.0431e7;

/// Measured R under worst-case light pollution (~6.56% error), m^-1.
pub const R_EXP_LIGHT: f64 = 1.0253e7;

/// Relative error (percent) above which a measurement is flagged.
pub const HIGH_ERROR_THRESHOLD: f64 = 5.5;

/// Physical half-width (meters) mapped onto half of the canvas width.
pub const SCREEN_HALF_SPAN_M: f64 = 0.45;

/// Lower level of every Balmer transition.
pub const BALMER_LOWER_LEVEL: u8 = 2;

pub const DISTANCE_RANGE_CM: (f64, f64) = (30.0, 60.0);
pub const DISTANCE_STEP_CM: f64 = 0.5;
pub const POLLUTION_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const POLLUTION_STEP_PCT: f64 = 1.0;

pub const DEFAULT_DISTANCE_CM: f64 = 41.0;
pub const DEFAULT_POLLUTION_PCT: f64 = 0.0;
