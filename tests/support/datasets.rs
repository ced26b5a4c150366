use std::fmt::Write as _;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use healthpredict::domain::DiseaseDomain;

pub const DIABETES_COLUMNS: &[&str] = &[
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

pub const HEART_COLUMNS: &[&str] = &[
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

pub const PARKINSONS_COLUMNS: &[&str] = &[
    "MDVP:Fo(Hz)",
    "MDVP:Fhi(Hz)",
    "MDVP:Flo(Hz)",
    "MDVP:Jitter(%)",
    "MDVP:Jitter(Abs)",
    "MDVP:RAP",
    "MDVP:PPQ",
    "Jitter:DDP",
    "MDVP:Shimmer",
    "MDVP:Shimmer(dB)",
    "Shimmer:APQ3",
    "Shimmer:APQ5",
    "MDVP:APQ",
    "Shimmer:DDA",
    "NHR",
    "HNR",
    "RPDE",
    "DFA",
    "spread1",
    "spread2",
    "D2",
    "PPE",
];

/// Shape of a generated CSV.
pub struct Synthetic<'a> {
    pub features: &'a [&'a str],
    pub label: &'a str,
    pub id: Option<&'a str>,
    pub rows: usize,
    pub positive_every: usize,
    pub seed: u64,
}

/// Dataset with the real column names of `domain`.
pub fn domain_dataset(domain: DiseaseDomain, rows: usize) -> Synthetic<'static> {
    let features = match domain {
        DiseaseDomain::Diabetes => DIABETES_COLUMNS,
        DiseaseDomain::Heart => HEART_COLUMNS,
        DiseaseDomain::Parkinsons => PARKINSONS_COLUMNS,
    };
    Synthetic {
        features,
        label: domain.label_column(),
        id: domain.id_column(),
        rows,
        positive_every: 3,
        seed: 17,
    }
}

impl Synthetic<'_> {
    /// Row `i` is positive when `i % positive_every == 0`.
    pub fn is_positive(&self, row: usize) -> bool {
        row % self.positive_every == 0
    }

    /// Header puts the identifier first and the label in the middle of the features.
    pub fn render(&self) -> String {
        let mid = self.features.len() / 2;
        let mut header: Vec<&str> = Vec::new();
        header.extend(self.id);
        header.extend_from_slice(&self.features[..mid]);
        header.push(self.label);
        header.extend_from_slice(&self.features[mid..]);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut out = header.join(",");
        out.push('\n');
        for row in 0..self.rows {
            let positive = self.is_positive(row);
            let values: Vec<String> = (0..self.features.len())
                .map(|j| {
                    let scale = 10f64.powi((j % 3) as i32);
                    let shift = if positive { 1.5 } else { -1.5 };
                    let noise = rng.random_range(-1.0..1.0);
                    format!("{:.4}", 50.0 * j as f64 + (shift + noise) * scale)
                })
                .collect();
            let mut line = String::new();
            if self.id.is_some() {
                write!(line, "subject_{row:03},").unwrap();
            }
            line.push_str(&values[..mid].join(","));
            if mid > 0 {
                line.push(',');
            }
            write!(line, "{}", u8::from(positive)).unwrap();
            if mid < values.len() {
                line.push(',');
                line.push_str(&values[mid..].join(","));
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    pub fn write(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dataset parent dirs");
        }
        std::fs::write(path, self.render()).expect("write synthetic dataset");
    }
}
