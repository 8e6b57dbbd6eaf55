//! Writes deterministic sample CSV fixtures (leaf data, soil data,
//! threshold table) into `data/` for manual testing of the dashboard.

use std::path::Path;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (full label, baseline level, high threshold, low threshold)
const ELEMENTS: &[(&str, f64, f64, f64)] = &[
    ("N-NITROGEN", 28.0, 40.0, 10.0),
    ("P-PHOSPHOROUS", 5.5, 8.0, 2.0),
    ("K-POTASSIUM", 18.0, 25.0, 12.0),
    ("CA-CALCIUM", 12.0, 20.0, 6.0),
    ("MG-MAGNESIUM", 3.2, 5.0, 1.5),
];

/// (abbreviated code, baseline level)
const SOIL_ELEMENTS: &[(&str, f64)] = &[
    ("NO3", 14.0),
    ("P", 6.0),
    ("K", 22.0),
    ("Ca", 15.0),
    ("Zn", 1.2),
];

const FIELDS: &[(&str, f64)] = &[("North Block", 12.0), ("South Block", 18.0), ("River Plot", 8.5)];

fn write_leaf(path: &Path, rng: &mut SimpleRng) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["element", "field", "year", "month", "value", "normalizedValue"])?;

    let mut rows = 0;
    for year in [2023, 2024] {
        // Leaf samples are taken during the growing season only.
        for month in 4..=10 {
            for (element, base, ..) in ELEMENTS {
                for (field, acres) in FIELDS {
                    // Mild seasonal swing peaking mid-season.
                    let season = 1.0 + 0.15 * ((month as f64 - 7.0) / 3.0).cos();
                    let value = rng.gauss(base * season, base * 0.08).max(0.0);
                    writer.write_record([
                        element.to_string(),
                        field.to_string(),
                        year.to_string(),
                        month.to_string(),
                        format!("{value:.3}"),
                        format!("{:.4}", value / acres),
                    ])?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_soil(path: &Path, rng: &mut SimpleRng) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Element",
        "Field",
        "Year",
        "Month",
        "Day",
        "Value",
        "ValuePerAcre",
        "Average of High",
        "Average of Low",
    ])?;

    let mut rows = 0;
    for year in [2023, 2024] {
        for (month, day) in [(3, 15), (6, 1), (9, 20)] {
            for (element, base) in SOIL_ELEMENTS {
                for (field, acres) in FIELDS {
                    let value = rng.gauss(*base, base * 0.12).max(0.0);
                    let high = base * 1.5;
                    let low = base * 0.5;
                    writer.write_record([
                        element.to_string(),
                        field.to_string(),
                        year.to_string(),
                        month.to_string(),
                        day.to_string(),
                        format!("{value:.3}"),
                        format!("{:.4}", value / acres),
                        format!("{high:.2}"),
                        format!("{low:.2}"),
                    ])?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_thresholds(path: &Path) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Element_Full", "High Threshold Value", "Low Threshold Value"])?;
    for (element, _, high, low) in ELEMENTS {
        writer.write_record([
            element.to_string(),
            format!("{high:.1}"),
            format!("{low:.1}"),
        ])?;
    }
    writer.flush()?;
    Ok(ELEMENTS.len())
}

fn main() {
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).expect("Failed to create data directory");

    let mut rng = SimpleRng::new(42);

    let leaf_rows = write_leaf(&out_dir.join("leaf_data.csv"), &mut rng)
        .expect("Failed to write leaf data");
    let soil_rows = write_soil(&out_dir.join("soil_data.csv"), &mut rng)
        .expect("Failed to write soil data");
    let threshold_rows =
        write_thresholds(&out_dir.join("thresholds.csv")).expect("Failed to write thresholds");

    println!(
        "Wrote {leaf_rows} leaf rows, {soil_rows} soil rows and {threshold_rows} threshold records to {}",
        out_dir.display()
    );
}
