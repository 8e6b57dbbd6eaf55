/// Data layer: typed rows, loading, filtering, aggregation, thresholds.
///
/// Pipeline:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → typed rows (malformed rows dropped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → matching subset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  time-key buckets → per-field means, ordered series
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ threshold  │  selection- or series-driven high/low summary
///   └───────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod threshold;
