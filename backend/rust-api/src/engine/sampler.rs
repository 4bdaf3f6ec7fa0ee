use rand::{seq::index, Rng};

use crate::models::AtomicQuestion;

/// Draws `min(k, records.len())` records uniformly at random without
/// replacement. The result order is random; `records` is left untouched.
pub fn sample<R>(records: &[AtomicQuestion], k: usize, rng: &mut R) -> Vec<AtomicQuestion>
where
    R: Rng + ?Sized,
{
    let amount = k.min(records.len());
    if amount == 0 {
        return Vec::new();
    }

    index::sample(rng, records.len(), amount)
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}
