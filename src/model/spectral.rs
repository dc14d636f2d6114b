// src/model/spectral.rs
// Static line catalogs: atomic Balmer series, the student's measured lines,
// and the molecular hydrogen band tables.

use crate::utils::color::Rgba;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub struct SpectralLine {
    pub id: &'static str,
    pub name: &'static str,
    /// Nanometers, always > 0.
    pub wavelength_nm: f64,
    pub color: Rgba,
    pub base_opacity: f64,
    /// Principal quantum number of the upper level (Balmer lines only).
    pub upper_level: Option<u8>,
    /// Fixed label tier. Lines without one are staggered at render time.
    pub label_tier: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentalDataPoint {
    pub id: Cow<'static, str>,
    pub wavelength_nm: f64,
    pub upper_level: Option<u8>,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Electronic transition n -> 2 the user can focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalmerTransition {
    N3,
    N4,
    N5,
    N6,
}

impl BalmerTransition {
    pub const ALL: [BalmerTransition; 4] = [Self::N3, Self::N4, Self::N5, Self::N6];

    pub fn from_level(n: u8) -> Option<Self> {
        match n {
            3 => Some(Self::N3),
            4 => Some(Self::N4),
            5 => Some(Self::N5),
            6 => Some(Self::N6),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::N3 => 3,
            Self::N4 => 4,
            Self::N5 => 5,
            Self::N6 => 6,
        }
    }

    /// The catalog line this transition emits.
    pub fn line(self) -> &'static SpectralLine {
        match self {
            Self::N3 => &BALMER_LINES[0],
            Self::N4 => &BALMER_LINES[1],
            Self::N5 => &BALMER_LINES[2],
            Self::N6 => &BALMER_LINES[3],
        }
    }

    pub fn label(self) -> String {
        format!("n={} → n=2", self.level())
    }

    /// Emitted photon colour, keyed by the starting level. Anything above 5 is violet.
    pub fn photon_color(level: u8) -> Rgba {
        match level {
            3 => Rgba::rgb8(0xFF, 0x22, 0x00),
            4 => Rgba::rgb8(0x00, 0xFF, 0xFF),
            5 => Rgba::rgb8(0x44, 0x44, 0xFF),
            _ => Rgba::rgb8(0x7A, 0x00, 0xFF),
        }
    }
}

// ============================================================================
// CATALOG SELECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineCatalog {
    #[default]
    AtomicBalmer,
    MolecularElectronic,
    MolecularVibrational,
    MolecularRotational,
}

impl LineCatalog {
    pub const ALL: [LineCatalog; 4] = [
        Self::AtomicBalmer,
        Self::MolecularElectronic,
        Self::MolecularVibrational,
        Self::MolecularRotational,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::AtomicBalmer => "Atomic H (Balmer)",
            Self::MolecularElectronic => "H₂ Electronic",
            Self::MolecularVibrational => "H₂ Vibrational",
            Self::MolecularRotational => "H₂ Rotational",
        }
    }

    pub fn lines(self) -> &'static [SpectralLine] {
        match self {
            Self::AtomicBalmer => &BALMER_LINES,
            Self::MolecularElectronic => &H2_ELECTRONIC_LINES,
            Self::MolecularVibrational => &H2_VIBRATIONAL_LINES,
            Self::MolecularRotational => &H2_ROTATIONAL_LINES,
        }
    }

    /// Built-in measurements; only the Balmer lines were measured.
    pub fn experimental(self) -> Vec<ExperimentalDataPoint> {
        match self {
            Self::AtomicBalmer => BALMER_EXPERIMENTAL.to_vec(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// TABLES
// ============================================================================

const fn line(
    id: &'static str,
    name: &'static str,
    wavelength_nm: f64,
    color: Rgba,
    base_opacity: f64,
) -> SpectralLine {
    SpectralLine { id, name, wavelength_nm, color, base_opacity, upper_level: None, label_tier: None }
}

const fn balmer(
    id: &'static str,
    name: &'static str,
    wavelength_nm: f64,
    color: Rgba,
    base_opacity: f64,
    upper: u8,
    tier: u8,
) -> SpectralLine {
    SpectralLine {
        id,
        name,
        wavelength_nm,
        color,
        base_opacity,
        upper_level: Some(upper),
        label_tier: Some(tier),
    }
}

const fn measured(id: &'static str, wavelength_nm: f64, upper: u8) -> ExperimentalDataPoint {
    ExperimentalDataPoint { id: Cow::Borrowed(id), wavelength_nm, upper_level: Some(upper) }
}

// H-γ and H-δ land a few pixels apart, so their labels sit one and two tiers down.
pub const BALMER_LINES: [SpectralLine; 4] = [
    balmer("h-alpha", "H-α", 656.28, Rgba::rgb8(0xFF, 0x22, 0x00), 1.0, 3, 0),
    balmer("h-beta", "H-β", 486.13, Rgba::rgb8(0x00, 0xFF, 0xFF), 0.9, 4, 0),
    balmer("h-gamma", "H-γ", 434.05, Rgba::rgb8(0x44, 0x44, 0xFF), 0.85, 5, 1),
    balmer("h-delta", "H-δ", 410.17, Rgba::rgb8(0x7A, 0x00, 0xFF), 0.7, 6, 2),
];

/// Student data. H-γ carries a large (~10%) misreading.
pub const BALMER_EXPERIMENTAL: [ExperimentalDataPoint; 4] = [
    measured("exp-alpha", 677.9, 3),
    measured("exp-beta", 495.6, 4),
    measured("exp-gamma", 482.6, 5),
    measured("exp-delta", 429.5, 6),
];

pub const H2_ELECTRONIC_LINES: [SpectralLine; 14] = [
    line("h2-e1", "H2 Elect. 1", 601.8, Rgba::rgb8(0xFF, 0x33, 0x33), 0.8),
    line("h2-e2", "H2 Elect. 2", 609.5, Rgba::rgb8(0xFF, 0x44, 0x33), 0.7),
    line("h2-e3", "H2 Elect. 3", 615.2, Rgba::rgb8(0xFF, 0x55, 0x33), 0.6),
    line("h2-e4", "H2 Elect. 4", 622.4, Rgba::rgb8(0xFF, 0x66, 0x33), 0.5),
    line("h2-e5", "H2 Elect. 5", 580.0, Rgba::rgb8(0xFF, 0xCC, 0x00), 0.4),
    line("h2-e6", "H2 Elect. 6", 585.5, Rgba::rgb8(0xFF, 0xDD, 0x00), 0.45),
    line("h2-e7", "H2 Elect. 7", 490.0, Rgba::rgb8(0x00, 0xFF, 0xFF), 0.3),
    line("h2-e8", "H2 Elect. 8", 495.5, Rgba::rgb8(0x00, 0xEE, 0xFF), 0.35),
    line("h2-e9", "H2 Elect. 9", 460.0, Rgba::rgb8(0x00, 0x88, 0xFF), 0.5),
    line("h2-e10", "H2 Elect. 10", 465.0, Rgba::rgb8(0x00, 0x77, 0xFF), 0.55),
    line("h2-e11", "H2 Elect. 11", 420.0, Rgba::rgb8(0x88, 0x00, 0xFF), 0.6),
    line("h2-e12", "H2 Elect. 12", 425.0, Rgba::rgb8(0x77, 0x00, 0xFF), 0.65),
    line("h2-e13", "H2 Band Head 1", 650.0, Rgba::rgb8(0xFF, 0x00, 0x00), 0.9),
    line("h2-e14", "H2 Band Head 2", 486.1, Rgba::rgb8(0x00, 0xFF, 0xFF), 0.2),
];

// Anharmonic progression: spacing shrinks towards the short-wavelength end.
pub const H2_VIBRATIONAL_LINES: [SpectralLine; 7] = [
    line("h2-v1", "v(1-0)", 750.0, Rgba::rgb8(0xCC, 0x00, 0x00), 0.9),
    line("h2-v2", "v(2-0)", 680.0, Rgba::rgb8(0xDD, 0x22, 0x00), 0.85),
    line("h2-v3", "v(3-0)", 620.0, Rgba::rgb8(0xEE, 0x44, 0x00), 0.8),
    line("h2-v4", "v(4-0)", 570.0, Rgba::rgb8(0xFF, 0x66, 0x00), 0.75),
    line("h2-v5", "v(5-0)", 530.0, Rgba::rgb8(0xFF, 0x88, 0x00), 0.7),
    line("h2-v6", "v(6-0)", 500.0, Rgba::rgb8(0xFF, 0xAA, 0x00), 0.65),
    line("h2-v7", "v(7-0)", 480.0, Rgba::rgb8(0xFF, 0xCC, 0x00), 0.6),
];

// Rigid rotor lines are equidistant in energy, mapped onto 400-700 nm for display.
pub const H2_ROTATIONAL_LINES: [SpectralLine; 8] = [
    line("h2-r0", "J(0-1)", 400.0, Rgba::rgb8(0x33, 0x33, 0x33), 0.5),
    line("h2-r1", "J(1-2)", 420.0, Rgba::rgb8(0x44, 0x44, 0x44), 0.55),
    line("h2-r2", "J(2-3)", 445.0, Rgba::rgb8(0x55, 0x55, 0x55), 0.6),
    line("h2-r3", "J(3-4)", 475.0, Rgba::rgb8(0x66, 0x66, 0x66), 0.65),
    line("h2-r4", "J(4-5)", 510.0, Rgba::rgb8(0x77, 0x77, 0x77), 0.7),
    line("h2-r5", "J(5-6)", 550.0, Rgba::rgb8(0x88, 0x88, 0x88), 0.75),
    line("h2-r6", "J(6-7)", 600.0, Rgba::rgb8(0x99, 0x99, 0x99), 0.8),
    line("h2-r7", "J(7-8)", 660.0, Rgba::rgb8(0xAA, 0xAA, 0xAA), 0.85),
];

/// Line with the shortest wavelength in a catalog (the dim violet one).
pub fn shortest_wavelength(lines: &[SpectralLine]) -> Option<&SpectralLine> {
    lines.iter().min_by(|a, b| a.wavelength_nm.total_cmp(&b.wavelength_nm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balmer_levels_match_transitions() {
        for t in BalmerTransition::ALL {
            assert_eq!(t.line().upper_level, Some(t.level()));
            assert_eq!(BalmerTransition::from_level(t.level()), Some(t));
        }
        assert_eq!(BalmerTransition::from_level(2), None);
        assert_eq!(BalmerTransition::from_level(7), None);
    }

    #[test]
    fn test_violet_is_h_delta() {
        assert_eq!(shortest_wavelength(&BALMER_LINES).map(|l| l.id), Some("h-delta"));
    }

    #[test]
    fn test_only_balmer_has_measurements() {
        assert_eq!(LineCatalog::AtomicBalmer.experimental().len(), 4);
        for c in &LineCatalog::ALL[1..] {
            assert!(c.experimental().is_empty());
            assert!(c.lines().iter().all(|l| l.upper_level.is_none()));
        }
    }

    #[test]
    fn test_catalog_values_are_physical() {
        for c in LineCatalog::ALL {
            for l in c.lines() {
                assert!(l.wavelength_nm > 0.0, "{}", l.id);
                assert!((0.0..=1.0).contains(&l.base_opacity), "{}", l.id);
            }
        }
    }
}
