// src/physics/diffraction.rs
//
// Grating model: wavelength + screen distance -> horizontal pixel offset,
// plus the opacity and label-stagger rules of the pattern.
//
// sin θ = λ / g,  x = d · tan θ

use crate::model::constants::{GRATING_PERIOD, SCREEN_HALF_SPAN_M};
use crate::model::spectral::{BalmerTransition, SpectralLine};
use std::cmp::Ordering;

/// Below this a line (and its label) is not drawn at all.
pub const MIN_VISIBLE_OPACITY: f64 = 0.01;

/// Fraction of the base opacity removed at 100% light pollution.
const POLLUTION_DIMMING: f64 = 0.8;

/// Multiplier for lines outside the focused transition.
const UNFOCUSED_FACTOR: f64 = 0.1;

/// Pollution (%) at which the violet line has lost all contrast.
const VIOLET_CUTOFF_PCT: f64 = 50.0;

/// Label centres closer than this share a collision group.
pub const LABEL_COLLISION_PX: f64 = 40.0;

pub const LABEL_BASE_Y: f64 = 30.0;
pub const LABEL_TIER_STEP: f64 = 15.0;

// ============================================================================
// POSITION
// ============================================================================

/// Meters -> pixels for a given canvas width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenScale {
    pub pixels_per_meter: f64,
}

impl ScreenScale {
    /// ±0.45 m of physical displacement spans the full canvas width.
    pub fn for_width(width: f64) -> Self {
        Self { pixels_per_meter: (width / 2.0) / SCREEN_HALF_SPAN_M }
    }
}

/// First-order diffraction angle in radians, `None` if λ/g leaves asin's domain.
pub fn diffraction_angle(wavelength_nm: f64) -> Option<f64> {
    if !wavelength_nm.is_finite() || wavelength_nm <= 0.0 {
        return None;
    }
    let ratio = wavelength_nm * 1e-9 / GRATING_PERIOD;
    if ratio >= 1.0 {
        // θ = 90° or no real solution; tan would blow up either way
        return None;
    }
    Some(ratio.asin())
}

/// Horizontal distance (pixels) of the first order from the optical axis.
pub fn angle_offset(wavelength_nm: f64, distance_cm: f64, scale: &ScreenScale) -> Option<f64> {
    let theta = diffraction_angle(wavelength_nm)?;
    let d = distance_cm / 100.0;
    let x = d * theta.tan() * scale.pixels_per_meter;
    x.is_finite().then_some(x)
}

/// Both diffracted orders, left then right.
pub fn mirrored_positions(center_x: f64, offset: f64) -> [f64; 2] {
    [center_x - offset, center_x + offset]
}

// ============================================================================
// VISIBILITY
// ============================================================================

/// Effective alpha of a theoretical line.
///
/// `is_violet` marks the catalog's shortest-wavelength line, which fades
/// faster under pollution unless it is the focused transition.
pub fn visibility(
    line: &SpectralLine,
    light_pollution: f64,
    active: Option<BalmerTransition>,
    is_violet: bool,
) -> f64 {
    let p = light_pollution.clamp(0.0, 100.0);
    let mut v = line.base_opacity * (1.0 - (p / 100.0) * POLLUTION_DIMMING);

    let focused = match active {
        Some(t) if line.upper_level == Some(t.level()) => {
            v = 1.0;
            true
        }
        Some(_) => {
            v *= UNFOCUSED_FACTOR;
            false
        }
        None => false,
    };

    if is_violet && !focused {
        v *= (1.0 - p / VIOLET_CUTOFF_PCT).max(0.0);
    }

    v.clamp(0.0, 1.0)
}

pub fn is_drawable(visibility: f64) -> bool {
    visibility > MIN_VISIBLE_OPACITY
}

// ============================================================================
// LABEL STAGGER
// ============================================================================

/// Baseline of a label on the given tier.
pub fn label_y(tier: u8) -> f64 {
    LABEL_BASE_Y + tier as f64 * LABEL_TIER_STEP
}

/// Sorts lines by descending wavelength (the draw order of the pattern).
pub fn sorted_by_wavelength(lines: &[SpectralLine]) -> Vec<&SpectralLine> {
    let mut sorted: Vec<&SpectralLine> = lines.iter().collect();
    sorted.sort_by(|a, b| b.wavelength_nm.partial_cmp(&a.wavelength_nm).unwrap_or(Ordering::Equal));
    sorted
}

/// Assigns a label tier to each `(line, offset)` pair, in the order given.
///
/// Lines with a fixed tier keep it. Others take the lowest tier not used by
/// an already placed label within `LABEL_COLLISION_PX`. Unrenderable lines
/// (offset `None`) get tier 0 and do not block anyone.
pub fn assign_label_tiers(placed: &[(&SpectralLine, Option<f64>)]) -> Vec<u8> {
    let mut tiers: Vec<u8> = Vec::with_capacity(placed.len());
    let mut taken: Vec<(f64, u8)> = Vec::new();

    for (line, offset) in placed {
        let Some(x) = offset else {
            tiers.push(0);
            continue;
        };

        let tier = match line.label_tier {
            Some(t) => t,
            None => {
                let mut t = 0u8;
                while taken
                    .iter()
                    .any(|&(other_x, other_t)| other_t == t && (other_x - x).abs() < LABEL_COLLISION_PX)
                {
                    t = t.saturating_add(1);
                    if t == u8::MAX {
                        break;
                    }
                }
                t
            }
        };

        taken.push((*x, tier));
        tiers.push(tier);
    }

    tiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::spectral::{BALMER_LINES, H2_ELECTRONIC_LINES};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_offsets_finite_and_growing_with_distance() {
        let scale = ScreenScale::for_width(900.0);
        for line in &BALMER_LINES {
            let mut last = 0.0;
            let mut d = 30.0;
            while d <= 60.0 {
                let off = angle_offset(line.wavelength_nm, d, &scale).unwrap();
                assert!(off.is_finite() && off > 0.0);
                assert!(off > last, "{} at {} cm", line.id, d);
                let [l, r] = mirrored_positions(450.0, off);
                assert!(approx(450.0 - l, r - 450.0));
                last = off;
                d += 0.5;
            }
        }
    }

    #[test]
    fn test_h_alpha_offset_at_default_distance() {
        // λ/g = 0.379133 -> tan θ = 0.409723 -> x = 0.16799 m at 41 cm
        let scale = ScreenScale::for_width(900.0); // 1000 px/m
        let off = angle_offset(656.28, 41.0, &scale).unwrap();
        assert!((off - 167.99).abs() < 0.05, "got {}", off);
    }

    #[test]
    fn test_domain_guard() {
        let scale = ScreenScale::for_width(800.0);
        assert!(angle_offset(1800.0, 41.0, &scale).is_none());
        assert!(angle_offset(2000.0, 41.0, &scale).is_none());
        assert!(angle_offset(-5.0, 41.0, &scale).is_none());
        assert!(angle_offset(f64::NAN, 41.0, &scale).is_none());
        assert!(angle_offset(1700.0, 41.0, &scale).is_some());
    }

    #[test]
    fn test_visibility_no_pollution_no_focus_is_base() {
        for line in &BALMER_LINES {
            let violet = line.id == "h-delta";
            assert_eq!(visibility(line, 0.0, None, violet), line.base_opacity);
        }
    }

    #[test]
    fn test_focused_line_always_full() {
        for t in BalmerTransition::ALL {
            let line = t.line();
            let violet = line.id == "h-delta";
            for p in [0.0, 25.0, 50.0, 75.0, 100.0] {
                assert_eq!(visibility(line, p, Some(t), violet), 1.0);
            }
        }
    }

    #[test]
    fn test_unfocused_lines_dimmed() {
        let active = Some(BalmerTransition::N3);
        for line in &BALMER_LINES[1..3] {
            for p in [0.0, 30.0, 100.0] {
                let expected = line.base_opacity * (1.0 - 0.8 * p / 100.0) * 0.1;
                assert!(approx(visibility(line, p, active, false), expected));
            }
        }
    }

    #[test]
    fn test_violet_fades_out_by_half_pollution() {
        let delta = &BALMER_LINES[3];
        assert!(!is_drawable(visibility(delta, 50.0, None, true)));
        assert!(!is_drawable(visibility(delta, 80.0, None, true)));
        let at_25 = visibility(delta, 25.0, None, true);
        assert!(approx(at_25, 0.7 * 0.8 * 0.5));
        // focusing the violet line skips the extra penalty
        assert_eq!(visibility(delta, 80.0, Some(BalmerTransition::N6), true), 1.0);
    }

    #[test]
    fn test_visibility_clamps_out_of_range_pollution() {
        let alpha = &BALMER_LINES[0];
        assert_eq!(visibility(alpha, -20.0, None, false), 1.0);
        assert!(approx(visibility(alpha, 250.0, None, false), 0.2));
    }

    #[test]
    fn test_balmer_tiers_are_static() {
        let scale = ScreenScale::for_width(800.0);
        let sorted = sorted_by_wavelength(&BALMER_LINES);
        let placed: Vec<_> = sorted
            .iter()
            .map(|l| (*l, angle_offset(l.wavelength_nm, 41.0, &scale)))
            .collect();
        assert_eq!(assign_label_tiers(&placed), vec![0, 0, 1, 2]);
        assert_eq!(label_y(2), 60.0);
    }

    #[test]
    fn test_greedy_tiers_never_share_a_band() {
        let scale = ScreenScale::for_width(800.0);
        let sorted = sorted_by_wavelength(&H2_ELECTRONIC_LINES);
        let placed: Vec<_> = sorted
            .iter()
            .map(|l| (*l, angle_offset(l.wavelength_nm, 41.0, &scale)))
            .collect();
        let tiers = assign_label_tiers(&placed);

        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                let (xi, xj) = (placed[i].1.unwrap(), placed[j].1.unwrap());
                if (xi - xj).abs() < LABEL_COLLISION_PX {
                    assert_ne!(tiers[i], tiers[j], "{} / {}", placed[i].0.id, placed[j].0.id);
                }
            }
        }
    }
}
