//! Random-number helpers shared by agents and environments

use rand::{Rng, SeedableRng, distr::StandardUniform, rngs::StdRng, seq::IndexedRandom};

/// Seeded generator when `seed` is given, otherwise one seeded from the
/// thread-local generator.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Draw one item with probability proportional to its weight.
///
/// Falls back to a uniform choice when the weights do not sum to a positive
/// number, and to the last item when rounding leaves the threshold unspent.
/// Returns `None` only for an empty slice.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use gridmind::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let outcomes = [("stay", 0.8), ("slip", 0.2)];
/// assert!(weighted_sample(&mut rng, &outcomes).is_some());
/// ```
pub fn weighted_sample<R, T>(rng: &mut R, items: &[(T, f64)]) -> Option<T>
where
    R: Rng,
    T: Clone,
{
    if items.is_empty() {
        return None;
    }

    let total: f64 = items.iter().map(|(_, weight)| weight).sum();
    if total.is_nan() || total <= 0.0 {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut threshold = rng.sample::<f64, _>(StandardUniform) * total;
    for (item, weight) in items {
        if threshold < *weight {
            return Some(item.clone());
        }
        threshold -= weight;
    }

    items.last().map(|(item, _)| item.clone())
}
