use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};

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

    /// Pick from `items` with the given relative weights.
    fn weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for &(item, w) in items {
            if target < w {
                return item;
            }
            target -= w;
        }
        items.last().map(|(item, _)| *item).unwrap_or("")
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const LANGUAGES: [(&str, f64); 5] = [
    ("fr", 0.45),
    ("en", 0.25),
    ("ar", 0.12),
    ("es", 0.10),
    ("pt", 0.08),
];

const SERVICES: [(&str, f64); 4] = [
    ("cardiologie", 0.3),
    ("pediatrie", 0.25),
    ("urgences", 0.3),
    ("neurologie", 0.15),
];

const HEADER: [&str; 8] = [
    "date",
    "langue",
    "service",
    "duree_minutes",
    "qualite_score",
    "interactions_patient",
    "interactions_praticien",
    "Note Praticien",
];

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid start date")?;
    let n_rows = 400;

    let output_path = "sample_sessions.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(HEADER)?;

    for _ in 0..n_rows {
        let offset = (rng.next_f64() * 84.0) as u64;
        let date = first_day
            .checked_add_days(Days::new(offset))
            .context("date out of range")?;
        // A few malformed cells exercise the coercion rules.
        let date_cell = if rng.chance(0.02) {
            "unknown".to_string()
        } else {
            date.format("%Y-%m-%d").to_string()
        };
        let duration = if rng.chance(0.05) {
            String::new()
        } else {
            format!("{:.0}", rng.gauss(55.0, 20.0).max(5.0))
        };
        let quality = format!("{:.3}", rng.gauss(0.72, 0.12).clamp(0.0, 1.0));
        let patient = rng.gauss(14.0, 5.0).max(0.0);
        let professional = (patient * 0.8 + rng.gauss(3.0, 3.0)).max(0.0);
        let professional_cell = if rng.chance(0.03) {
            "n/a".to_string()
        } else {
            format!("{professional:.0}")
        };
        let grade = if rng.chance(0.04) {
            // Out of the 0-5 scale.
            "7".to_string()
        } else {
            format!("{:.1}", rng.gauss(3.8, 0.8).clamp(0.0, 5.0))
        };

        writer.write_record([
            date_cell,
            rng.weighted(&LANGUAGES).to_string(),
            rng.weighted(&SERVICES).to_string(),
            duration,
            quality,
            format!("{patient:.0}"),
            professional_cell,
            grade,
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} sessions to {output_path}");
    Ok(())
}
