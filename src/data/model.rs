use std::fmt;

// ---------------------------------------------------------------------------
// Filter field descriptors
// ---------------------------------------------------------------------------

/// How the unique values of a filter field are ordered in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    /// Ascending by numeric value (year, month).
    Numeric,
    /// Plain string comparison (element, field, date keys).
    Lexicographic,
}

/// One filterable column of a dataset variant.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    /// Internal name, used as the key in a `FilterSpec`.
    pub name: &'static str,
    /// Human-readable label for the filter widget header.
    pub label: &'static str,
    pub sort: SortPolicy,
}

/// A validated measurement record that exposes filterable columns.
pub trait Record {
    /// Filter fields of this variant, in display order.
    fn filter_fields() -> &'static [FilterField];

    /// Stringified value of the named filter field, `None` for unknown names.
    fn filter_value(&self, field: &str) -> Option<String>;

    /// Sortable time key: zero-padded so lexicographic order is
    /// chronological order.
    fn group_key(&self) -> String;
}

// ---------------------------------------------------------------------------
// LeafRow – one leaf nutrient measurement
// ---------------------------------------------------------------------------

pub const LEAF_FILTER_FIELDS: &[FilterField] = &[
    FilterField { name: "element", label: "Element", sort: SortPolicy::Lexicographic },
    FilterField { name: "field", label: "Field", sort: SortPolicy::Lexicographic },
    FilterField { name: "year", label: "Year", sort: SortPolicy::Numeric },
    FilterField { name: "month", label: "Month", sort: SortPolicy::Numeric },
];

/// One row of a leaf nutrient export. Element labels in this file are the
/// full labels (`N-NITROGEN`) that the threshold table is keyed by.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafRow {
    pub element: String,
    pub field: String,
    pub year: i32,
    /// 1–12.
    pub month: u32,
    pub value: f64,
    pub normalized_value: f64,
}

impl Record for LeafRow {
    fn filter_fields() -> &'static [FilterField] {
        LEAF_FILTER_FIELDS
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "element" => Some(self.element.clone()),
            "field" => Some(self.field.clone()),
            "year" => Some(self.year.to_string()),
            "month" => Some(self.month.to_string()),
            _ => None,
        }
    }

    fn group_key(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// SoilRow – one soil nutrient measurement
// ---------------------------------------------------------------------------

pub const SOIL_FILTER_FIELDS: &[FilterField] = &[
    FilterField { name: "element", label: "Element", sort: SortPolicy::Lexicographic },
    FilterField { name: "field", label: "Field", sort: SortPolicy::Lexicographic },
    FilterField { name: "sampleDate", label: "Date", sort: SortPolicy::Lexicographic },
];

/// One row of a soil nutrient export. Element labels here are abbreviations
/// (`Al`, `NO3`); see [`element_full_name`] for the display/threshold label.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilRow {
    pub element: String,
    pub field: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub value: f64,
    pub value_per_acre: f64,
    /// Per-day averaged high reference, 0.0 when the column is absent.
    pub avg_high: f64,
    /// Per-day averaged low reference, 0.0 when the column is absent.
    pub avg_low: f64,
}

impl Record for SoilRow {
    fn filter_fields() -> &'static [FilterField] {
        SOIL_FILTER_FIELDS
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "element" => Some(self.element.clone()),
            "field" => Some(self.field.clone()),
            "sampleDate" => Some(self.group_key()),
            _ => None,
        }
    }

    fn group_key(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the loaded variant
// ---------------------------------------------------------------------------

/// The full loaded row set of one dataset variant.
#[derive(Debug, Clone)]
pub enum Dataset {
    Leaf(Vec<LeafRow>),
    Soil(Vec<SoilRow>),
}

impl Dataset {
    /// Number of admitted rows.
    pub fn len(&self) -> usize {
        match self {
            Dataset::Leaf(rows) => rows.len(),
            Dataset::Soil(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Dataset::Leaf(_) => "Leaf Nutrient",
            Dataset::Soil(_) => "Soil Nutrient",
        }
    }

    pub fn filter_fields(&self) -> &'static [FilterField] {
        match self {
            Dataset::Leaf(_) => LeafRow::filter_fields(),
            Dataset::Soil(_) => SoilRow::filter_fields(),
        }
    }
}

// ---------------------------------------------------------------------------
// ThresholdRecord – reference high/low values per element
// ---------------------------------------------------------------------------

/// One row of the threshold reference table, keyed by the full element label.
/// A side is `None` when its cell did not parse; 0.0 is never substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRecord {
    pub element_full: String,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl fmt::Display for ThresholdRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(v: Option<f64>) -> String {
            v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
        }
        write!(
            f,
            "{} [{} .. {}]",
            self.element_full,
            side(self.low),
            side(self.high)
        )
    }
}

// ---------------------------------------------------------------------------
// Element label bridge: abbreviation → full label
// ---------------------------------------------------------------------------

/// Abbreviated soil element codes mapped to the full labels used by the
/// threshold table and the element selector.
const ELEMENT_FULL_NAMES: &[(&str, &str)] = &[
    ("Al", "AL–ALUMINUM"),
    ("B", "B–BORON"),
    ("Ca", "CA–CALCIUM"),
    ("Cl", "CL–CHLORIDE"),
    ("Co", "CO–COBALT"),
    ("Cu", "CU–COPPER"),
    ("Fe", "FE–IRON"),
    ("I", "I–IODINE"),
    ("K", "K–POTASSIUM"),
    ("Mg", "MG–MAGNESIUM"),
    ("Mn", "MN–MANGANESE"),
    ("Mo", "MO–MOLYBDENUM"),
    ("Na", "NA–SODIUM"),
    ("NH4", "NH4–AMMONIUM"),
    ("NO3", "NO3–NITRATE"),
    ("P", "P–PHOSPHOROUS"),
    ("PH", "PH"),
    ("S", "S–SULFUR"),
    ("Se", "SE–SELENIUM"),
    ("Si", "SI–SILICON"),
    ("Zn", "ZN–ZINC"),
];

/// Full label for an abbreviated element code, if known.
pub fn element_full_name(abbrev: &str) -> Option<&'static str> {
    ELEMENT_FULL_NAMES
        .iter()
        .find(|(a, _)| *a == abbrev)
        .map(|(_, full)| *full)
}

/// Display/threshold label for an element value: the bridged full label for
/// abbreviations, the value itself when it is already a full label.
pub fn full_label(element: &str) -> String {
    element_full_name(element)
        .map(str::to_string)
        .unwrap_or_else(|| element.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_group_key_zero_pads_month() {
        let row = LeafRow {
            element: "N-NITROGEN".into(),
            field: "North".into(),
            year: 2024,
            month: 3,
            value: 1.0,
            normalized_value: 2.0,
        };
        assert_eq!(row.group_key(), "2024-03");
    }

    #[test]
    fn soil_group_key_zero_pads_month_and_day() {
        let row = SoilRow {
            element: "Al".into(),
            field: "West".into(),
            year: 2023,
            month: 9,
            day: 4,
            value: 1.0,
            value_per_acre: 0.5,
            avg_high: 0.0,
            avg_low: 0.0,
        };
        assert_eq!(row.group_key(), "2023-09-04");
    }

    #[test]
    fn group_keys_sort_chronologically() {
        let mut keys = vec![
            "2024-10".to_string(),
            "2024-02".to_string(),
            "2023-12".to_string(),
        ];
        keys.sort();
        assert_eq!(keys, ["2023-12", "2024-02", "2024-10"]);
    }

    #[test]
    fn element_bridge_maps_abbreviations() {
        assert_eq!(element_full_name("NO3"), Some("NO3–NITRATE"));
        assert_eq!(element_full_name("Xx"), None);
        assert_eq!(full_label("Zn"), "ZN–ZINC");
        assert_eq!(full_label("N-NITROGEN"), "N-NITROGEN");
    }

    #[test]
    fn filter_value_stringifies_numeric_fields() {
        let row = LeafRow {
            element: "K-POTASSIUM".into(),
            field: "South".into(),
            year: 2022,
            month: 11,
            value: 3.0,
            normalized_value: 1.5,
        };
        assert_eq!(row.filter_value("year").as_deref(), Some("2022"));
        assert_eq!(row.filter_value("month").as_deref(), Some("11"));
        assert_eq!(row.filter_value("nope"), None);
    }
}
