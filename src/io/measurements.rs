// src/io/measurements.rs
//
// Student measurement tables: `id wavelength [n]` per row, from plain text,
// CSV or a spreadsheet's first sheet.

use crate::model::spectral::ExperimentalDataPoint;
use crate::physics::diffraction::diffraction_angle;
use calamine::{open_workbook_auto, Data, Reader};
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementSet {
    pub name: String,
    pub points: Vec<ExperimentalDataPoint>,
}

impl MeasurementSet {
    /// Points the grating cannot send into a first order at any distance.
    pub fn unreachable(&self) -> impl Iterator<Item = &ExperimentalDataPoint> {
        self.points.iter().filter(|p| diffraction_angle(p.wavelength_nm).is_none())
    }
}

const SPREADSHEET_EXTS: [&str; 4] = [".xlsx", ".xls", ".xlsm", ".ods"];

pub fn load(path: &str) -> io::Result<MeasurementSet> {
    let p = path.to_lowercase();
    if SPREADSHEET_EXTS.iter().any(|ext| p.ends_with(ext)) {
        parse_spreadsheet(path)
    } else {
        parse_text(path)
    }
}

fn set_name(path: &str) -> String {
    Path::new(path).file_stem().unwrap_or_default().to_string_lossy().to_string()
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// One table row. Rows whose wavelength is not a positive number are dropped,
/// which also skips header lines.
fn row_to_point(index: usize, cells: &[String]) -> Option<ExperimentalDataPoint> {
    // A bare number in the first column means there is no id column
    let (id, rest) = match cells.first()?.parse::<f64>() {
        Ok(_) => (format!("m{}", index + 1), cells),
        Err(_) => (cells[0].clone(), &cells[1..]),
    };

    let wavelength_nm = rest.first()?.parse::<f64>().ok()?;
    if !wavelength_nm.is_finite() || wavelength_nm <= 0.0 {
        return None;
    }
    let upper_level = rest
        .get(1)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.fract() == 0.0 && *n > 2.0 && *n < 256.0)
        .map(|n| n as u8);

    Some(ExperimentalDataPoint { id: id.into(), wavelength_nm, upper_level })
}

fn finish(name: String, points: Vec<ExperimentalDataPoint>) -> io::Result<MeasurementSet> {
    if points.is_empty() {
        return Err(invalid("No valid measurements found"));
    }
    Ok(MeasurementSet { name, points })
}

pub fn parse_text(path: &str) -> io::Result<MeasurementSet> {
    let file = File::open(path)?;
    let reader = io::BufReader::new(file);
    parse_lines(set_name(path), reader)
}

fn parse_lines<R: BufRead>(name: String, reader: R) -> io::Result<MeasurementSet> {
    let mut points = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('*') {
            continue;
        }

        let cells: Vec<String> = trimmed
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_matches('"').to_string())
            .collect();

        if let Some(point) = row_to_point(points.len(), &cells) {
            points.push(point);
        }
    }

    finish(name, points)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    }
}

pub fn parse_spreadsheet(path: &str) -> io::Result<MeasurementSet> {
    let mut workbook = open_workbook_auto(path).map_err(|e| invalid(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| invalid("Workbook has no sheets"))?
        .map_err(|e| invalid(e.to_string()))?;

    let mut points = Vec::new();
    for row in range.rows() {
        let cells: Vec<String> = row.iter().filter_map(cell_text).collect();
        if let Some(point) = row_to_point(points.len(), &cells) {
            points.push(point);
        }
    }

    finish(set_name(path), points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> io::Result<MeasurementSet> {
        parse_lines("t".to_string(), io::Cursor::new(text))
    }

    #[test]
    fn test_mixed_separators_and_header() {
        let set = parse_str(
            "# bench 2, grating 600/mm\nid,wavelength,n\nred, 661.0, 3\nblue;489.5;4\ncyan 470.2\n",
        )
        .unwrap();
        assert_eq!(set.points.len(), 3);
        assert_eq!(set.points[0].id, "red");
        assert_eq!(set.points[0].upper_level, Some(3));
        assert_eq!(set.points[1].wavelength_nm, 489.5);
        assert_eq!(set.points[2].upper_level, None);
    }

    #[test]
    fn test_bare_wavelength_column_gets_ids() {
        let set = parse_str("656.9\n486.0 4\n").unwrap();
        assert_eq!(set.points[0].id, "m1");
        assert_eq!(set.points[1].id, "m2");
        assert_eq!(set.points[1].upper_level, Some(4));
    }

    #[test]
    fn test_bad_rows_skipped_and_empty_is_error() {
        let set = parse_str("a -4\nb 0\nc nan\nd 434\n").unwrap();
        assert_eq!(set.points.len(), 1);
        assert!(parse_str("# nothing here\n").is_err());
    }

    #[test]
    fn test_level_must_be_above_two() {
        let set = parse_str("x 650 2\ny 650 3.5\n").unwrap();
        assert!(set.points.iter().all(|p| p.upper_level.is_none()));
    }

    #[test]
    fn test_text_file_round_trip_via_load() {
        let path = std::env::temp_dir().join(format!("balmer-meas-{}.csv", std::process::id()));
        std::fs::write(&path, "h-a,677.9,3\nh-b,495.6,4\n").unwrap();
        let set = load(&path.to_string_lossy()).unwrap();
        assert_eq!(set.name, format!("balmer-meas-{}", std::process::id()));
        assert_eq!(set.points.len(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_spreadsheet_is_error() {
        assert!(load("/nonexistent/measurements.xlsx").is_err());
    }

    #[test]
    fn test_unreachable_points_are_listed() {
        let set = parse_str("ir 1800 3\nred 656.3 3\n").unwrap();
        let ids: Vec<&str> = set.unreachable().map(|p| &*p.id).collect();
        assert_eq!(ids, vec!["ir"]);
    }
}
