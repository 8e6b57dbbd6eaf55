use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Tracked series names
// ---------------------------------------------------------------------------

/// Series names shared by the aggregator, the threshold summarizer and the
/// renderer. The threshold lines are anchored to [`ORIGINAL_VALUE`].
pub const ORIGINAL_VALUE: &str = "Original Value";
pub const PER_ACRE_VALUE: &str = "Per Acre Value";
pub const AVG_HIGH: &str = "Avg High";
pub const AVG_LOW: &str = "Avg Low";

/// One numeric column to average per time bucket.
pub struct TrackedField<R> {
    pub name: &'static str,
    pub get: fn(&R) -> f64,
}

impl<R> TrackedField<R> {
    pub const fn new(name: &'static str, get: fn(&R) -> f64) -> Self {
        TrackedField { name, get }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Finalized means for one group key.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPoint {
    /// Zero-padded time key; the x-axis label.
    pub key: String,
    /// Number of rows in this bucket.
    pub count: usize,
    /// Mean per tracked field.
    pub fields: BTreeMap<&'static str, f64>,
}

impl AggregatedPoint {
    /// Mean of the named tracked field, `None` if it was not tracked.
    pub fn mean(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }
}

/// Running sums for one group key, finalized into an [`AggregatedPoint`]
/// once every row is assigned. Only created when at least one row maps to
/// the key, so the final division never sees a zero count.
struct Bucket {
    count: usize,
    sums: Vec<f64>,
}

/// Bucket `rows` by their time key and average every tracked field per
/// bucket. The output is sorted by key string; keys are zero-padded, so
/// this is chronological order. Deterministic and independent of the
/// input row order; an empty subset yields an empty series.
pub fn aggregate<R>(
    rows: &[&R],
    key_fn: impl Fn(&R) -> String,
    tracked: &[TrackedField<R>],
) -> Vec<AggregatedPoint> {
    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

    for row in rows {
        let bucket = buckets.entry(key_fn(row)).or_insert_with(|| Bucket {
            count: 0,
            sums: vec![0.0; tracked.len()],
        });
        bucket.count += 1;
        for (sum, field) in bucket.sums.iter_mut().zip(tracked) {
            *sum += (field.get)(row);
        }
    }

    // BTreeMap iteration is already ordered by key.
    buckets
        .into_iter()
        .map(|(key, bucket)| {
            let n = bucket.count as f64;
            let fields = tracked
                .iter()
                .zip(&bucket.sums)
                .map(|(field, sum)| (field.name, sum / n))
                .collect();
            AggregatedPoint {
                key,
                count: bucket.count,
                fields,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LeafRow, Record};
    use assert_approx_eq::assert_approx_eq;

    fn leaf(year: i32, month: u32, value: f64, normalized: f64) -> LeafRow {
        LeafRow {
            element: "N-NITROGEN".into(),
            field: "North".into(),
            year,
            month,
            value,
            normalized_value: normalized,
        }
    }

    fn tracked() -> Vec<TrackedField<LeafRow>> {
        vec![
            TrackedField::new(ORIGINAL_VALUE, |r| r.value),
            TrackedField::new(PER_ACRE_VALUE, |r| r.normalized_value),
        ]
    }

    #[test]
    fn averages_per_month_bucket() {
        let rows = vec![
            leaf(2024, 1, 10.0, 1.0),
            leaf(2024, 1, 20.0, 3.0),
            leaf(2024, 2, 30.0, 5.0),
        ];
        let refs: Vec<&LeafRow> = rows.iter().collect();
        let points = aggregate(&refs, LeafRow::group_key, &tracked());

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].key, "2024-01");
        assert_eq!(points[0].count, 2);
        assert_approx_eq!(points[0].mean(ORIGINAL_VALUE).unwrap(), 15.0);
        assert_approx_eq!(points[0].mean(PER_ACRE_VALUE).unwrap(), 2.0);
        assert_eq!(points[1].key, "2024-02");
        assert_approx_eq!(points[1].mean(ORIGINAL_VALUE).unwrap(), 30.0);
    }

    #[test]
    fn output_order_is_independent_of_input_order() {
        let rows = vec![
            leaf(2024, 10, 1.0, 0.0),
            leaf(2023, 12, 2.0, 0.0),
            leaf(2024, 2, 3.0, 0.0),
        ];
        let forward: Vec<&LeafRow> = rows.iter().collect();
        let reversed: Vec<&LeafRow> = rows.iter().rev().collect();

        let a = aggregate(&forward, LeafRow::group_key, &tracked());
        let b = aggregate(&reversed, LeafRow::group_key, &tracked());
        assert_eq!(a, b);

        let keys: Vec<&str> = a.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["2023-12", "2024-02", "2024-10"]);
    }

    #[test]
    fn total_mass_is_conserved() {
        let rows = vec![
            leaf(2024, 1, 10.0, 4.0),
            leaf(2024, 1, 14.0, 6.0),
            leaf(2024, 3, 7.0, 1.0),
            leaf(2024, 3, 9.0, 2.0),
            leaf(2024, 3, 11.0, 3.0),
        ];
        let refs: Vec<&LeafRow> = rows.iter().collect();
        let points = aggregate(&refs, LeafRow::group_key, &tracked());

        let total_count: usize = points.iter().map(|p| p.count).sum();
        assert_eq!(total_count, rows.len());

        let mass: f64 = points
            .iter()
            .map(|p| p.mean(ORIGINAL_VALUE).unwrap() * p.count as f64)
            .sum();
        let expected: f64 = rows.iter().map(|r| r.value).sum();
        assert_approx_eq!(mass, expected, 1e-9);
    }

    #[test]
    fn empty_subset_yields_empty_series() {
        let refs: Vec<&LeafRow> = Vec::new();
        let points = aggregate(&refs, LeafRow::group_key, &tracked());
        assert!(points.is_empty());
    }
}
