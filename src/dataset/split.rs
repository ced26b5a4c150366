use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::loader::DatasetError;

/// Row indices assigned to the training and holdout subsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partition row indices so every class keeps its proportion in both subsets.
///
/// Each class contributes `round(n_class * test_fraction)` holdout rows, clamped
/// so that both subsets receive at least one row of the class. Classes are
/// shuffled one after another in index order from a single seeded RNG, so the
/// same labels and seed always produce the same split.
pub fn stratified_split(
    y: &[usize],
    classes: &[String],
    test_fraction: f64,
    seed: u64,
) -> Result<Split, DatasetError> {
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &class_idx) in y.iter().enumerate() {
        by_class.entry(class_idx).or_default().push(row);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(y.len());
    let mut test = Vec::new();
    for (class_idx, mut rows) in by_class {
        let n = rows.len();
        if n < 2 {
            return Err(DatasetError::ClassTooSmall {
                class_id: classes
                    .get(class_idx)
                    .cloned()
                    .unwrap_or_else(|| class_idx.to_string()),
                count: n,
            });
        }
        let test_n = ((n as f64) * test_fraction).round().clamp(1.0, (n - 1) as f64) as usize;
        rows.shuffle(&mut rng);
        let (held, kept) = rows.split_at(test_n);
        test.extend_from_slice(held);
        train.extend_from_slice(kept);
    }
    train.sort_unstable();
    test.sort_unstable();
    Ok(Split { train, test })
}
