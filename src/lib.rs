//! AgroView – interactive dashboard for agronomic measurement data.
//!
//! The [`data`] module is the engine: typed row models, load-time
//! validation, multi-select filtering, time-key aggregation and threshold
//! summarization. [`state`] is the controller that re-derives every output
//! when the filter state or the loaded data changes. [`app`] and [`ui`]
//! are the egui renderer consuming those outputs.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
