use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, HLine, Legend, Plot};

use crate::color::{SeriesColors, HIGH_LINE, LOW_LINE};
use crate::data::aggregate::{ORIGINAL_VALUE, PER_ACRE_VALUE};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Aggregated series plot (central panel)
// ---------------------------------------------------------------------------

const GROUP_WIDTH: f64 = 0.8;

/// Render the grouped bar chart with the threshold reference lines.
pub fn series_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a measurement file to view the chart  (File → Open…)");
        });
        return;
    }

    let colors = SeriesColors::new(&[ORIGINAL_VALUE, PER_ACRE_VALUE]);
    let visible: Vec<&str> = [ORIGINAL_VALUE, PER_ACRE_VALUE]
        .into_iter()
        .filter(|name| state.is_series_visible(name))
        .collect();

    // Group keys become categorical x positions 0, 1, 2, …
    let axis_labels: Vec<String> = state.series.iter().map(|p| p.key.clone()).collect();

    let plot = Plot::new("series_plot")
        .legend(Legend::default())
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 0.05 || idx < 0.0 {
                return String::new();
            }
            axis_labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_axis_label("Average value")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    plot.show(ui, |plot_ui| {
        let n = visible.len() as f64;
        for (series_idx, name) in visible.iter().enumerate() {
            let offset = (series_idx as f64 - (n - 1.0) / 2.0) * (GROUP_WIDTH / n);
            let bars: Vec<Bar> = state
                .series
                .iter()
                .enumerate()
                .map(|(i, point)| {
                    Bar::new(i as f64 + offset, point.mean(name).unwrap_or(0.0))
                        .width(GROUP_WIDTH / n * 0.9)
                        .name(&point.key)
                })
                .collect();

            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(*name)
                    .color(colors.color_for(name)),
            );
        }

        // Reference lines hide together with the Original Value series.
        if state.thresholds_visible() {
            if let Some(high) = state.threshold_summary.high {
                plot_ui.hline(
                    HLine::new(high)
                        .name(format!("Avg High: {high:.2}"))
                        .color(HIGH_LINE)
                        .width(2.0),
                );
            }
            if let Some(low) = state.threshold_summary.low {
                plot_ui.hline(
                    HLine::new(low)
                        .name(format!("Avg Low: {low:.2}"))
                        .color(LOW_LINE)
                        .width(2.0),
                );
            }
        }
    });
}
