// src/physics/rydberg.rs

use crate::model::constants::{
    BALMER_LOWER_LEVEL, HIGH_ERROR_THRESHOLD, RYDBERG_THEORETICAL, R_EXP_DARK, R_EXP_LIGHT,
};

/// Interpolated experimental Rydberg constant and its relative error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RydbergEstimate {
    /// m^-1
    pub experimental: f64,
    /// Percent, relative to `RYDBERG_THEORETICAL`.
    pub relative_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Optimal,
    HighError,
}

impl Assessment {
    pub fn message(self) -> &'static str {
        match self {
            Assessment::Optimal => "Optimal conditions. Error within the accepted experimental margin.",
            Assessment::HighError => {
                "High light pollution reduces contrast, making the faint lines hard to measure precisely."
            }
        }
    }
}

impl RydbergEstimate {
    /// Linear blend between the dark-sky and light-polluted reference values.
    pub fn from_pollution(light_pollution: f64) -> Self {
        let ratio = light_pollution.clamp(0.0, 100.0) / 100.0;
        let experimental = R_EXP_DARK + (R_EXP_LIGHT - R_EXP_DARK) * ratio;
        Self { experimental, relative_error: relative_error(experimental) }
    }

    pub fn is_high_error(&self) -> bool {
        self.relative_error > HIGH_ERROR_THRESHOLD
    }

    pub fn assessment(&self) -> Assessment {
        if self.is_high_error() {
            Assessment::HighError
        } else {
            Assessment::Optimal
        }
    }
}

/// |R - R_theo| / R_theo in percent.
pub fn relative_error(r: f64) -> f64 {
    ((r - RYDBERG_THEORETICAL) / RYDBERG_THEORETICAL).abs() * 100.0
}

/// Rydberg constant implied by one measured Balmer line:
/// 1/λ = R (1/2² - 1/n²).
pub fn rydberg_from_line(wavelength_nm: f64, upper_level: u8) -> Option<f64> {
    if upper_level <= BALMER_LOWER_LEVEL || wavelength_nm.is_nan() || wavelength_nm <= 0.0 {
        return None;
    }
    let lower = BALMER_LOWER_LEVEL as f64;
    let n = upper_level as f64;
    let term = 1.0 / (lower * lower) - 1.0 / (n * n);
    Some(1.0 / (wavelength_nm * 1e-9 * term))
}

/// Error curve sampled over the pollution slider, for the panel chart.
pub fn error_curve(step_pct: f64) -> Vec<(f64, f64)> {
    let step = if step_pct > 0.0 { step_pct } else { 1.0 };
    let mut points = Vec::new();
    let mut p = 0.0;
    while p < 100.0 {
        points.push((p, RydbergEstimate::from_pollution(p).relative_error));
        p += step;
    }
    points.push((100.0, RydbergEstimate::from_pollution(100.0).relative_error));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        assert_eq!(RydbergEstimate::from_pollution(0.0).experimental, R_EXP_DARK);
        assert_eq!(RydbergEstimate::from_pollution(100.0).experimental, R_EXP_LIGHT);
    }

    #[test]
    fn test_monotonic_non_increasing() {
        let mut last = f64::INFINITY;
        for p in 0..=100 {
            let r = RydbergEstimate::from_pollution(p as f64).experimental;
            assert!(r <= last);
            last = r;
        }
    }

    #[test]
    fn test_reference_errors_and_flag() {
        let dark = RydbergEstimate::from_pollution(0.0);
        let light = RydbergEstimate::from_pollution(100.0);
        assert!((dark.relative_error - 4.94).abs() < 0.02, "{}", dark.relative_error);
        assert!((light.relative_error - 6.56).abs() < 0.02, "{}", light.relative_error);
        assert!(!dark.is_high_error());
        assert!(light.is_high_error());
        assert_eq!(light.assessment(), Assessment::HighError);
        assert_eq!(dark.assessment(), Assessment::Optimal);
    }

    #[test]
    fn test_theoretical_lines_recover_rydberg() {
        // H-α at 656.28 nm -> R within 0.1% of theory
        let r = rydberg_from_line(656.28, 3).unwrap();
        assert!(relative_error(r) < 0.1);
        assert!(rydberg_from_line(656.28, 2).is_none());
        assert!(rydberg_from_line(0.0, 3).is_none());
    }

    #[test]
    fn test_error_curve_covers_range() {
        let curve = error_curve(5.0);
        assert_eq!(curve.first().map(|p| p.0), Some(0.0));
        assert_eq!(curve.last().map(|p| p.0), Some(100.0));
        assert_eq!(curve.len(), 21);
    }
}
