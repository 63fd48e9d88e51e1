// ============================================================
// Layer 4 — Deterministic Subsampler
// ============================================================
// Optionally truncates a split to a fixed number of examples.
//
// With a limit, a COPY of the split is shuffled with a seed that
// never changes (SUBSAMPLE_SEED) and the first `limit` examples are
// kept. A fresh RNG is created on every call, so the selection
// depends only on the input and the limit, never on what ran before.
//
// Note that any limit reorders the split, even one larger than the
// split itself.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Seed of every subsampling shuffle.
pub const SUBSAMPLE_SEED: u64 = 1;

/// Return `items` unchanged when `limit` is None, otherwise a seeded
/// shuffle of a copy truncated to `limit` elements.
pub fn subsample<T: Clone>(items: &[T], limit: Option<usize>) -> Vec<T> {
    let Some(limit) = limit else {
        return items.to_vec();
    };

    let mut rng      = StdRng::seed_from_u64(SUBSAMPLE_SEED);
    let mut selected = items.to_vec();
    selected.shuffle(&mut rng);
    selected.truncate(limit);

    tracing::debug!("Subsampled {} of {} examples", selected.len(), items.len());
    selected
}
