use chrono::NaiveDate;

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

/// Seasonal demand-like signal, always positive.
fn signal(day: i64) -> f64 {
    let t = day as f64;
    4200.0 + 1800.0 * (t / 30.0).sin() + 900.0 * (t / 7.0).cos()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let out_dir = std::path::Path::new("model_data");
    std::fs::create_dir_all(out_dir).expect("Failed to create model_data directory");

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let n_days: i64 = 120;

    // (file name, predicted-column header, forecast bias, noise, keep 1-in-k days)
    let models: [(&str, &str, f64, f64, i64); 3] = [
        ("results-csv_lstm", "predictions", 120.0, 150.0, 1),
        ("results-csv_arima", "predicted values", -200.0, 300.0, 2),
        ("prophet", "predictions", 50.0, 220.0, 3),
    ];

    for (name, pred_header, bias, noise, keep_every) in models {
        let path = out_dir.join(format!("{name}.csv"));
        let mut writer = csv::Writer::from_path(&path).expect("Failed to create CSV writer");
        writer
            .write_record(["dates", "groundtruth", pred_header])
            .expect("Failed to write header");

        let mut rows = 0usize;
        for day in 0..n_days {
            // Thin out some models so the loader has gaps to interpolate.
            if day % keep_every != 0 {
                continue;
            }
            let date = start + chrono::Duration::days(day);
            let truth = signal(day);
            let predicted = truth + bias + rng.gauss(0.0, noise);

            // Occasionally drop one value to leave an empty cell.
            let truth_cell = if rng.next_f64() < 0.05 {
                String::new()
            } else {
                format!("{truth:.2}")
            };
            let pred_cell = if rng.next_f64() < 0.05 {
                String::new()
            } else {
                format!("{predicted:.2}")
            };

            writer
                .write_record([date.format("%m/%d/%y").to_string(), truth_cell, pred_cell])
                .expect("Failed to write row");
            rows += 1;
        }

        writer.flush().expect("Failed to flush CSV");
        println!("Wrote {rows} rows to {}", path.display());
    }
}
