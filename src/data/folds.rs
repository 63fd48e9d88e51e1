// ============================================================
// Layer 4 — Cross-Validation Fold Builder
// ============================================================
// Partitions one flat corpus into k disjoint folds and writes the
// on-disk layout JsonCorpusLoader reads.
//
//   1. Stamp a corpus-wide `ex_id` on every record that lacks one
//      (its position in the input), so ids stay unique ACROSS folds
//      and not just within a split. A stamped id that collides with
//      one the corpus already carries is a DuplicateId error.
//   2. Shuffle record order with the fixed subsampling seed.
//   3. Deal records round-robin into k folds.
//
// Fold k then gets:
//   test  = fold k
//   train = every other fold, in fold order
//   dev   = absent
//
// The union of all test splits is the whole corpus, each record
// exactly once. The unfolded instance ("full") keeps everything in
// train, in input order.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde_json::Value;
use std::path::Path;

use crate::data::loader::write_instance;
use crate::data::normalizer::{normalize, ID_FIELD};
use crate::data::subsample::SUBSAMPLE_SEED;
use crate::domain::error::Result;
use crate::domain::example::{DatasetName, RawRecord, Splits};

/// Give every record without an `ex_id` its input position.
///
/// The stamped corpus must normalise cleanly as one split, so ids
/// that collide (given or stamped) are rejected here rather than
/// when a fold is loaded.
pub fn stamp_ids(records: &[RawRecord]) -> Result<Vec<RawRecord>> {
    let stamped: Vec<RawRecord> = records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let mut record = record.clone();
            record
                .entry(ID_FIELD.to_string())
                .or_insert_with(|| Value::from(position as u64));
            record
        })
        .collect();

    normalize(&stamped)?;
    Ok(stamped)
}

/// Split `items` into `num_folds` disjoint folds of near-equal size.
///
/// # Panics
/// Panics if `num_folds` is 0.
pub fn assign_folds<T: Clone>(items: &[T], num_folds: usize) -> Vec<Vec<T>> {
    assert!(num_folds > 0, "num_folds must be at least 1");

    let mut rng   = StdRng::seed_from_u64(SUBSAMPLE_SEED);
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.shuffle(&mut rng);

    let mut folds = vec![Vec::new(); num_folds];
    for (i, idx) in order.into_iter().enumerate() {
        folds[i % num_folds].push(items[idx].clone());
    }
    folds
}

/// Train/test splits of every fold. `records` should already carry
/// their ids (see `stamp_ids`).
pub fn build_folds(records: &[RawRecord], num_folds: usize) -> Vec<Splits<Vec<RawRecord>>> {
    let folds = assign_folds(records, num_folds);

    (0..num_folds)
        .map(|k| {
            let train: Vec<RawRecord> = folds
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != k)
                .flat_map(|(_, fold)| fold.iter().cloned())
                .collect();
            Splits::new(Some(train), None, Some(folds[k].clone()))
        })
        .collect()
}

/// Write the unfolded instance and every fold of `family` under `root`.
/// Returns the number of records written.
pub fn write_folds(root: &Path, family: &str, records: &[RawRecord], num_folds: usize) -> Result<usize> {
    let stamped = stamp_ids(records)?;
    write_instance(
        root,
        &DatasetName::new(family, None),
        &Splits::new(Some(stamped.clone()), None, None),
    )?;

    for (k, splits) in build_folds(&stamped, num_folds).iter().enumerate() {
        let name = DatasetName::fold(family, k);
        write_instance(root, &name, splits)?;
        tracing::info!(
            "Wrote '{}' (train={}, test={})",
            name,
            splits.train.as_ref().map_or(0, Vec::len),
            splits.test.as_ref().map_or(0, Vec::len),
        );
    }

    Ok(stamped.len())
}
