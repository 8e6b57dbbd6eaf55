use std::collections::{BTreeMap, BTreeSet};

use super::model::{FilterField, Record, SortPolicy};

// ---------------------------------------------------------------------------
// Filter specification: which values are accepted per field
// ---------------------------------------------------------------------------

/// Per-field selection state: maps field name → set of accepted values.
/// An absent field or an empty set means "no restriction" (accept every
/// value), never "accept nothing". Fields combine conjunctively; values
/// within one field combine disjunctively.
pub type FilterSpec = BTreeMap<String, BTreeSet<String>>;

/// Marker a multi-select widget may mix into a selection to mean
/// "every value of this field". Normalized away by [`normalize_selection`]
/// before a selection reaches [`apply_filters`].
pub const SELECT_ALL: &str = "";

/// Replace the [`SELECT_ALL`] marker with the full unique-value set.
/// Selections without the marker pass through unchanged.
pub fn normalize_selection(selected: &BTreeSet<String>, all_values: &[String]) -> BTreeSet<String> {
    if selected.iter().any(|v| v == SELECT_ALL) {
        all_values.iter().cloned().collect()
    } else {
        selected.clone()
    }
}

// ---------------------------------------------------------------------------
// Unique-value extraction
// ---------------------------------------------------------------------------

/// Distinct, non-empty values of `field` across all rows, stringified and
/// ordered by the field's sort policy. The result is what the filter widget
/// displays, so it must be stable across recomputation.
pub fn unique_values<R: Record>(rows: &[R], field: &FilterField) -> Vec<String> {
    let distinct: BTreeSet<String> = rows
        .iter()
        .filter_map(|r| r.filter_value(field.name))
        .filter(|v| !v.is_empty())
        .collect();

    let mut values: Vec<String> = distinct.into_iter().collect();
    if field.sort == SortPolicy::Numeric {
        values.sort_by(|a, b| {
            let na = a.parse::<f64>().unwrap_or(f64::INFINITY);
            let nb = b.parse::<f64>().unwrap_or(f64::INFINITY);
            na.total_cmp(&nb)
        });
    }
    values
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return the rows passing every field constraint in `spec`.
///
/// A row passes a field constraint when:
/// * the accepted set for that field is empty → passes (no restriction)
/// * the row's stringified value is in the accepted set → passes
pub fn apply_filters<'a, R: Record>(rows: &'a [R], spec: &FilterSpec) -> Vec<&'a R> {
    rows.iter()
        .filter(|row| {
            spec.iter().all(|(field, accepted)| {
                if accepted.is_empty() {
                    return true;
                }
                match row.filter_value(field) {
                    Some(value) => accepted.contains(&value),
                    None => false,
                }
            })
        })
        .collect()
}
