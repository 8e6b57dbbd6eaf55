use std::collections::BTreeSet;

use super::aggregate::{AggregatedPoint, AVG_HIGH, AVG_LOW};
use super::model::ThresholdRecord;

// ---------------------------------------------------------------------------
// Threshold summary
// ---------------------------------------------------------------------------

/// Averaged high/low reference values for the current view. `None` on a
/// side suppresses that reference line; 0.0 is never used to mean
/// "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThresholdSummary {
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl ThresholdSummary {
    pub fn is_empty(&self) -> bool {
        self.high.is_none() && self.low.is_none()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Contract A: selection-driven (leaf variant)
// ---------------------------------------------------------------------------

/// Average the high and, independently, the low reference values of the
/// records whose full label is in `selected`. An empty selection yields an
/// empty summary: thresholds only appear once at least one element is
/// explicitly chosen. Unparsable sides are excluded from their mean.
pub fn summarize_by_selection(
    records: &[ThresholdRecord],
    selected: &BTreeSet<String>,
) -> ThresholdSummary {
    if selected.is_empty() {
        return ThresholdSummary::default();
    }
    let matching: Vec<&ThresholdRecord> = records
        .iter()
        .filter(|r| selected.contains(&r.element_full))
        .collect();

    ThresholdSummary {
        high: mean(matching.iter().filter_map(|r| r.high)),
        low: mean(matching.iter().filter_map(|r| r.low)),
    }
}

// ---------------------------------------------------------------------------
// Contract B: series-driven (soil variant)
// ---------------------------------------------------------------------------

/// Average the already-per-bucket-averaged high/low fields across the
/// aggregated series. Each point weighs equally regardless of its row
/// count, matching the source semantics. An empty series yields an empty
/// summary.
pub fn summarize_by_series(points: &[AggregatedPoint]) -> ThresholdSummary {
    ThresholdSummary {
        high: mean(points.iter().filter_map(|p| p.mean(AVG_HIGH))),
        low: mean(points.iter().filter_map(|p| p.mean(AVG_LOW))),
    }
}
