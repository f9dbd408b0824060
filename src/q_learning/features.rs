//! Feature extraction for linear Q-function approximation.

use std::{collections::BTreeMap, fmt::Debug};

/// Sparse feature vector: feature name -> value.
///
/// Ordered so that weight updates and printouts are deterministic.
pub type Features = BTreeMap<String, f64>;

/// Maps a state-action pair to a feature vector.
pub trait FeatureExtractor<S, A> {
    fn features(&self, state: &S, action: &A) -> Features;
}

impl<S, A, F> FeatureExtractor<S, A> for F
where
    F: Fn(&S, &A) -> Features,
{
    fn features(&self, state: &S, action: &A) -> Features {
        self(state, action)
    }
}

/// One indicator feature per (state, action) pair.
///
/// With this extractor approximate Q-learning reproduces tabular Q-learning.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExtractor;

impl<S: Debug, A: Debug> FeatureExtractor<S, A> for IdentityExtractor {
    fn features(&self, state: &S, action: &A) -> Features {
        Features::from([(format!("{state:?}/{action:?}"), 1.0)])
    }
}
