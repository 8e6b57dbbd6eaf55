use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Reference-line colors, matching the threshold semantics: high in pink,
/// low in green.
pub const HIGH_LINE: Color32 = Color32::from_rgb(255, 105, 180);
pub const LOW_LINE: Color32 = Color32::from_rgb(34, 139, 34);

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 200.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue % 360.0, 0.6, 0.65);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colors: series name → Color32
// ---------------------------------------------------------------------------

/// Maps the tracked bar series to distinct colours, in declaration order.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    pub fn new(series_names: &[&str]) -> Self {
        let palette = generate_palette(series_names.len());
        let mapping = series_names
            .iter()
            .zip(palette)
            .map(|(name, color)| (name.to_string(), color))
            .collect();
        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, series: &str) -> Color32 {
        self.mapping
            .get(series)
            .copied()
            .unwrap_or(self.default_color)
    }
}
