use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::{ORIGINAL_VALUE, PER_ACRE_VALUE};
use crate::data::loader;
use crate::data::model::{full_label, Dataset};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (fields, is_soil) = match &state.dataset {
        Some(ds) => (ds.filter_fields(), matches!(ds, Dataset::Soil(_))),
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in fields {
                let values = state.unique.get(field.name).cloned().unwrap_or_default();
                let n_selected = state
                    .filters
                    .get(field.name)
                    .map(|s| s.len())
                    .unwrap_or(0);
                let header_text = if n_selected == 0 {
                    format!("{}  (all)", field.label)
                } else {
                    format!("{}  ({n_selected}/{})", field.label, values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.name)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(field.name);
                            }
                            if ui.small_button("Clear").clicked() {
                                state.clear_filter(field.name);
                            }
                        });

                        for value in &values {
                            let mut checked = state
                                .filters
                                .get(field.name)
                                .is_some_and(|s| s.contains(value));
                            // Soil element codes are abbreviated; show the
                            // bridged full label instead.
                            let label = if is_soil && field.name == "element" {
                                full_label(value)
                            } else {
                                value.clone()
                            };
                            if ui.checkbox(&mut checked, label).changed() {
                                state.toggle_filter_value(field.name, value);
                            }
                        }
                    });
            }

            ui.separator();
            ui.strong("Series");
            for name in [ORIGINAL_VALUE, PER_ACRE_VALUE] {
                let mut visible = state.is_series_visible(name);
                if ui.checkbox(&mut visible, name).changed() {
                    state.toggle_series(name);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open leaf data…").clicked() {
                open_leaf_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open soil data…").clicked() {
                open_soil_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open thresholds…").clicked() {
                open_threshold_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} rows loaded, {} matching",
                ds.variant_name(),
                ds.len(),
                state.filtered_count
            ));
        }
        if !state.thresholds.is_empty() {
            ui.separator();
            ui.label(format!("{} threshold records", state.thresholds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_file(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file()
}

pub fn open_leaf_dialog(state: &mut AppState) {
    let Some(path) = pick_file("Open leaf nutrient data") else {
        return;
    };
    state.loading = true;
    match loader::load_leaf_file(&path).context("loading leaf data") {
        Ok(rows) => {
            log::info!("Loaded {} leaf rows from {}", rows.len(), path.display());
            state.set_dataset(Dataset::Leaf(rows));
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            state.loading = false;
        }
    }
}

pub fn open_soil_dialog(state: &mut AppState) {
    let Some(path) = pick_file("Open soil nutrient data") else {
        return;
    };
    state.loading = true;
    match loader::load_soil_file(&path).context("loading soil data") {
        Ok(rows) => {
            log::info!("Loaded {} soil rows from {}", rows.len(), path.display());
            state.set_dataset(Dataset::Soil(rows));
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            state.loading = false;
        }
    }
}

pub fn open_threshold_dialog(state: &mut AppState) {
    let Some(path) = pick_file("Open threshold reference table") else {
        return;
    };
    match loader::load_threshold_file(&path).context("loading thresholds") {
        Ok(records) => {
            log::info!(
                "Loaded {} threshold records from {}",
                records.len(),
                path.display()
            );
            state.set_thresholds(records);
        }
        Err(e) => {
            log::error!("Failed to load thresholds: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
