use std::collections::BTreeSet;

use assert_approx_eq::assert_approx_eq;

use agroview::data::aggregate::{aggregate, TrackedField, ORIGINAL_VALUE, PER_ACRE_VALUE};
use agroview::data::filter::{apply_filters, FilterSpec};
use agroview::data::loader;
use agroview::data::model::{Dataset, LeafRow, Record, ThresholdRecord};
use agroview::data::threshold::summarize_by_selection;
use agroview::state::AppState;

fn leaf(element: &str, year: i32, month: u32, value: &str) -> LeafRow {
    LeafRow {
        element: element.into(),
        field: "North".into(),
        year,
        month,
        value: value.parse().unwrap(),
        normalized_value: 0.0,
    }
}

fn tracked() -> Vec<TrackedField<LeafRow>> {
    vec![
        TrackedField::new(ORIGINAL_VALUE, |r| r.value),
        TrackedField::new(PER_ACRE_VALUE, |r| r.normalized_value),
    ]
}

#[test]
fn unfiltered_rows_aggregate_to_monthly_means() {
    let rows = vec![
        leaf("N", 2024, 1, "10"),
        leaf("N", 2024, 1, "20"),
        leaf("N", 2024, 2, "30"),
    ];
    let subset = apply_filters(&rows, &FilterSpec::new());
    let points = aggregate(&subset, LeafRow::group_key, &tracked());

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].key, "2024-01");
    assert_approx_eq!(points[0].mean(ORIGINAL_VALUE).unwrap(), 15.0);
    assert_eq!(points[1].key, "2024-02");
    assert_approx_eq!(points[1].mean(ORIGINAL_VALUE).unwrap(), 30.0);
}

#[test]
fn threshold_summary_follows_the_selection() {
    let records = vec![ThresholdRecord {
        element_full: "N-NITROGEN".into(),
        high: Some(40.0),
        low: Some(10.0),
    }];

    let selected: BTreeSet<String> = ["N-NITROGEN".to_string()].into();
    let summary = summarize_by_selection(&records, &selected);
    assert_eq!(summary.high, Some(40.0));
    assert_eq!(summary.low, Some(10.0));

    let none = summarize_by_selection(&records, &BTreeSet::new());
    assert_eq!(none.high, None);
    assert_eq!(none.low, None);
}

#[test]
fn csv_file_to_filtered_series() {
    let csv_text = "\
element,field,year,month,value,normalizedValue
N-NITROGEN,North Block,2024,1,10,1.0
N-NITROGEN,North Block,2024,1,20,2.0
N-NITROGEN,South Block,2024,2,30,3.0
K-POTASSIUM,North Block,2024,1,99,9.9
N-NITROGEN,North Block,2024,bad-month,50,5.0
";
    let path = std::env::temp_dir().join("agroview_engine_test_leaf.csv");
    std::fs::write(&path, csv_text).unwrap();
    let rows = loader::load_leaf_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    // The malformed month row is dropped at load time.
    assert_eq!(rows.len(), 4);

    let mut state = AppState::default();
    state.set_thresholds(vec![ThresholdRecord {
        element_full: "N-NITROGEN".into(),
        high: Some(40.0),
        low: Some(10.0),
    }]);
    state.set_dataset(Dataset::Leaf(rows));

    state.toggle_filter_value("element", "N-NITROGEN");
    assert_eq!(state.filtered_count, 3);
    assert_eq!(state.series.len(), 2);
    assert_approx_eq!(state.series[0].mean(ORIGINAL_VALUE).unwrap(), 15.0);
    assert_approx_eq!(state.series[1].mean(PER_ACRE_VALUE).unwrap(), 3.0);
    assert_eq!(state.threshold_summary.high, Some(40.0));

    // Narrowing further by month is conjunctive.
    state.toggle_filter_value("month", "1");
    assert_eq!(state.filtered_count, 2);
    assert_eq!(state.series.len(), 1);
}

#[test]
fn soil_series_stays_chronological_across_padding_boundaries() {
    let csv_text = "\
Element,Field,Year,Month,Day,Value,ValuePerAcre,Average of High,Average of Low
K,West,2024,10,5,1.0,0.5,30,10
K,West,2024,2,20,2.0,1.0,30,10
K,West,2023,12,1,3.0,1.5,30,10
";
    let path = std::env::temp_dir().join("agroview_engine_test_soil.csv");
    std::fs::write(&path, csv_text).unwrap();
    let rows = loader::load_soil_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut state = AppState::default();
    state.set_dataset(Dataset::Soil(rows));

    let keys: Vec<&str> = state.series.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["2023-12-01", "2024-02-20", "2024-10-05"]);
    assert_approx_eq!(state.threshold_summary.high.unwrap(), 30.0);
    assert_approx_eq!(state.threshold_summary.low.unwrap(), 10.0);
}
