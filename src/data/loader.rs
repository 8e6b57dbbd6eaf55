use std::path::Path;

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{LeafRow, SoilRow, ThresholdRecord};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// File-level loading failures. Row-level problems (missing field,
/// non-numeric value) are not errors: such rows are dropped at load time
/// and never reach filtering or aggregation.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("expected a top-level JSON array of records")]
    JsonShape,
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load leaf nutrient rows from a `.csv` or `.json` export.
///
/// CSV layout: header row with columns
/// `element, field, year, month, value, normalizedValue`.
/// JSON layout: array of records with the same keys (numbers may be JSON
/// numbers or strings).
pub fn load_leaf_file(path: &Path) -> Result<Vec<LeafRow>, LoadError> {
    load_records(path, LEAF_COLUMNS, leaf_from)
}

/// Load soil nutrient rows from a `.csv` or `.json` export.
///
/// Required columns: `Element, Field, Year, Month, Day, Value,
/// ValuePerAcre`. `Average of High` / `Average of Low` are optional and
/// default to 0 when absent or blank.
pub fn load_soil_file(path: &Path) -> Result<Vec<SoilRow>, LoadError> {
    load_records(path, SOIL_COLUMNS, soil_from)
}

/// Load the threshold reference table
/// (`Element_Full, High Threshold Value, Low Threshold Value`).
pub fn load_threshold_file(path: &Path) -> Result<Vec<ThresholdRecord>, LoadError> {
    load_records(path, THRESHOLD_COLUMNS, threshold_from)
}

// ---------------------------------------------------------------------------
// Per-variant record builders
// ---------------------------------------------------------------------------

const LEAF_COLUMNS: &[&str] = &["element", "field", "year", "month", "value", "normalizedValue"];
const SOIL_COLUMNS: &[&str] = &["Element", "Field", "Year", "Month", "Day", "Value", "ValuePerAcre"];
const THRESHOLD_COLUMNS: &[&str] =
    &["Element_Full", "High Threshold Value", "Low Threshold Value"];

/// Field accessor shared by the CSV and JSON paths: column name → raw cell.
type Getter<'a> = &'a dyn Fn(&str) -> Option<String>;

fn leaf_from(get: Getter) -> Option<LeafRow> {
    Some(LeafRow {
        element: non_empty(get("element")?)?,
        field: non_empty(get("field")?)?,
        year: get("year")?.trim().parse().ok()?,
        month: get("month")?.trim().parse().ok()?,
        value: parse_finite(&get("value")?)?,
        normalized_value: parse_finite(&get("normalizedValue")?)?,
    })
}

fn soil_from(get: Getter) -> Option<SoilRow> {
    Some(SoilRow {
        element: non_empty(get("Element")?)?,
        field: non_empty(get("Field")?)?,
        year: get("Year")?.trim().parse().ok()?,
        month: get("Month")?.trim().parse().ok()?,
        day: get("Day")?.trim().parse().ok()?,
        value: parse_finite(&get("Value")?)?,
        value_per_acre: parse_finite(&get("ValuePerAcre")?)?,
        avg_high: get("Average of High")
            .and_then(|s| parse_finite(&s))
            .unwrap_or(0.0),
        avg_low: get("Average of Low")
            .and_then(|s| parse_finite(&s))
            .unwrap_or(0.0),
    })
}

fn threshold_from(get: Getter) -> Option<ThresholdRecord> {
    Some(ThresholdRecord {
        element_full: non_empty(get("Element_Full")?)?,
        // An unparsable side stays None; it is excluded from the summary
        // mean instead of polluting it with a fabricated zero.
        high: get("High Threshold Value").and_then(|s| parse_finite(&s)),
        low: get("Low Threshold Value").and_then(|s| parse_finite(&s)),
    })
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Format dispatch
// ---------------------------------------------------------------------------

fn load_records<T>(
    path: &Path,
    required: &[&str],
    build: fn(Getter) -> Option<T>,
) -> Result<Vec<T>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (rows, dropped) = match ext.as_str() {
        "csv" => csv_records(csv::Reader::from_path(path)?, required, build)?,
        "json" => json_records(&std::fs::read_to_string(path)?, build)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    if dropped > 0 {
        log::debug!("{}: dropped {dropped} malformed rows", path.display());
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV records
// ---------------------------------------------------------------------------

fn csv_records<R: std::io::Read, T>(
    mut reader: csv::Reader<R>,
    required: &[&str],
    build: fn(Getter) -> Option<T>,
) -> Result<(Vec<T>, usize), LoadError> {
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    for col in required {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn((*col).to_string()));
        }
    }

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for result in reader.records() {
        let Ok(record) = result else {
            dropped += 1;
            continue;
        };
        let get = |name: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| record.get(i))
                .map(str::to_string)
        };
        match build(&get) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }
    Ok((rows, dropped))
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

fn json_records<T>(
    text: &str,
    build: fn(Getter) -> Option<T>,
) -> Result<(Vec<T>, usize), LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(LoadError::JsonShape)?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for rec in records {
        let Some(obj) = rec.as_object() else {
            dropped += 1;
            continue;
        };
        let get = |name: &str| -> Option<String> { obj.get(name).and_then(json_cell) };
        match build(&get) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }
    Ok((rows, dropped))
}

fn json_cell(v: &JsonValue) -> Option<String> {
    match v {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_drops_malformed_rows_silently() {
        let csv_text = "\
element,field,year,month,value,normalizedValue
N-NITROGEN,North,2024,1,10,5
N-NITROGEN,North,2024,1,not-a-number,5
,North,2024,2,20,10
K-POTASSIUM,South,2024,abc,20,10
K-POTASSIUM,South,2024,3,30,15
";
        let reader = csv::Reader::from_reader(csv_text.as_bytes());
        let (rows, dropped) = csv_records(reader, LEAF_COLUMNS, leaf_from).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(dropped, 3);
        assert_eq!(rows[0].element, "N-NITROGEN");
        assert_eq!(rows[1].month, 3);
    }

    #[test]
    fn csv_rejects_missing_required_column() {
        let csv_text = "element,field,year,month,value\nN,North,2024,1,10\n";
        let reader = csv::Reader::from_reader(csv_text.as_bytes());
        let err = csv_records(reader, LEAF_COLUMNS, leaf_from).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "normalizedValue"));
    }

    #[test]
    fn soil_reference_columns_default_to_zero() {
        let csv_text = "\
Element,Field,Year,Month,Day,Value,ValuePerAcre,Average of High,Average of Low
Al,West,2024,5,1,1.5,0.7,12,3
Al,West,2024,5,2,2.5,0.9,,
";
        let reader = csv::Reader::from_reader(csv_text.as_bytes());
        let (rows, dropped) = csv_records(reader, SOIL_COLUMNS, soil_from).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(rows[0].avg_high, 12.0);
        assert_eq!(rows[1].avg_high, 0.0);
        assert_eq!(rows[1].avg_low, 0.0);
    }

    #[test]
    fn threshold_sides_stay_none_when_unparsable() {
        let csv_text = "\
Element_Full,High Threshold Value,Low Threshold Value
N-NITROGEN,40,10
K-POTASSIUM,n/a,20
";
        let reader = csv::Reader::from_reader(csv_text.as_bytes());
        let (records, dropped) = csv_records(reader, THRESHOLD_COLUMNS, threshold_from).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(records[0].high, Some(40.0));
        assert_eq!(records[1].high, None);
        assert_eq!(records[1].low, Some(20.0));
    }

    #[test]
    fn json_accepts_numbers_and_numeric_strings() {
        let text = r#"[
            {"element": "N-NITROGEN", "field": "North", "year": 2024, "month": 1, "value": "10", "normalizedValue": 5},
            {"element": "N-NITROGEN", "field": "North", "year": 2024, "month": 1, "value": {"bad": true}, "normalizedValue": 5}
        ]"#;
        let (rows, dropped) = json_records(text, leaf_from).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(dropped, 1);
        assert_eq!(rows[0].value, 10.0);
    }

    #[test]
    fn json_requires_top_level_array() {
        let err = json_records("{}", leaf_from).unwrap_err();
        assert!(matches!(err, LoadError::JsonShape));
    }
}
