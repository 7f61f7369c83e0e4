// ============================================================
// Layer 4 — Hold-out Splitter
// ============================================================
// Shuffles the rows of a cleaned Dataset and splits them into a
// training part and a held-out part used by `evaluate`.
//
// The shuffle is seeded (`training.seed`), so the same dataset and
// seed always give the same split. Within each part rows keep their
// original relative order.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::dataset::Dataset;

/// Split `ds` into (train, held_out).
///
/// `holdout_fraction` is clamped to [0, 1]; the held-out size is
/// rounded to the nearest row.
pub fn split_holdout(ds: &Dataset, holdout_fraction: f64, seed: u64) -> (Dataset, Dataset) {
    let total    = ds.len();
    let fraction = holdout_fraction.clamp(0.0, 1.0);
    let held_out = ((total as f64) * fraction).round() as usize;

    let mut indices: Vec<usize> = (0..total).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut test_idx  = indices.split_off(total - held_out.min(total));
    let mut train_idx = indices;
    train_idx.sort_unstable();
    test_idx.sort_unstable();

    tracing::debug!(
        "Dataset split: {} training, {} held out",
        train_idx.len(),
        test_idx.len()
    );

    (ds.select_rows(&train_idx), ds.select_rows(&test_idx))
}
