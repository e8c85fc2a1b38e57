//! Composite scorer: R, F and M collapse into one weighted index.

use crate::{
    config::ScoreWeights,
    scoring::RfmScores,
    types::{CompositeIndex, CustomerId},
};
use std::collections::BTreeMap;

/// Weights from a validated `RfmConfig` keep this inside `CompositeIndex`
/// (see `RfmConfig::max_composite`).
pub fn composite_index(scores: &RfmScores, weights: &ScoreWeights) -> CompositeIndex {
    scores.recency as u32 * weights.recency
        + scores.frequency as u32 * weights.frequency
        + scores.monetary as u32 * weights.monetary
}

pub fn composite_all(
    scores: &BTreeMap<CustomerId, RfmScores>,
    weights: &ScoreWeights,
) -> BTreeMap<CustomerId, CompositeIndex> {
    scores
        .iter()
        .map(|(id, s)| (id.clone(), composite_index(s, weights)))
        .collect()
}
