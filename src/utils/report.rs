// src/utils/report.rs

use crate::model::spectral::{ExperimentalDataPoint, SpectralLine};
use crate::physics::rydberg::{relative_error, rydberg_from_line};

/// Theoretical partner of a measurement: same upper level if known,
/// otherwise the closest wavelength.
fn matching_line<'a>(lines: &'a [SpectralLine], point: &ExperimentalDataPoint) -> Option<&'a SpectralLine> {
    if let Some(n) = point.upper_level {
        if let Some(l) = lines.iter().find(|l| l.upper_level == Some(n)) {
            return Some(l);
        }
    }
    lines.iter().min_by(|a, b| {
        (a.wavelength_nm - point.wavelength_nm)
            .abs()
            .total_cmp(&(b.wavelength_nm - point.wavelength_nm).abs())
    })
}

/// Text for the console when the measured lines are shown or imported.
pub fn measurement_summary(lines: &[SpectralLine], points: &[ExperimentalDataPoint]) -> String {
    if points.is_empty() {
        return "No measurements for this spectrum source.".to_string();
    }

    let mut out = String::new();
    out.push_str("Measurement report\n");
    out.push_str("--------------------------------------------------------------\n");
    out.push_str(&format!(
        "{:<12} {:>9} {:>9} {:>9} {:>14}\n",
        "Point", "λ (nm)", "Theory", "Dev (%)", "R (m^-1)"
    ));
    out.push_str("--------------------------------------------------------------\n");

    let mut implied = Vec::new();
    for point in points {
        let theory = matching_line(lines, point);
        let (theory_str, dev_str) = match theory {
            Some(l) => (
                format!("{:.2}", l.wavelength_nm),
                format!("{:+.2}", (point.wavelength_nm - l.wavelength_nm) / l.wavelength_nm * 100.0),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        let upper = point.upper_level.or_else(|| theory.and_then(|l| l.upper_level));
        let r = upper.and_then(|n| rydberg_from_line(point.wavelength_nm, n));
        if let Some(r) = r {
            implied.push(r);
        }

        out.push_str(&format!(
            "{:<12} {:>9.2} {:>9} {:>9} {:>14}\n",
            point.id,
            point.wavelength_nm,
            theory_str,
            dev_str,
            r.map(|r| format!("{:.4e}", r)).unwrap_or_else(|| "-".to_string())
        ));
    }

    if !implied.is_empty() {
        let mean = implied.iter().sum::<f64>() / implied.len() as f64;
        out.push_str("--------------------------------------------------------------\n");
        out.push_str(&format!(
            "Mean R = {:.4e} m^-1 ({:.2}% from theory, {} lines)\n",
            mean,
            relative_error(mean),
            implied.len()
        ));
    }

    out
}
