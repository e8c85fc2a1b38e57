//! Quantile discretization shared by the dimension scorer and the segmenter.
//!
//! Edges are computed over the sorted cohort. Buckets are right-closed
//! intervals `(e[i], e[i+1]]`, except the lowest, which is `[e[0], e[1]]`,
//! so every cohort value lands in exactly one bucket.

use crate::error::{RfmError, RfmResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Interpolate between neighbouring observations (equal-population cuts).
    Linear,
    /// Snap to the nearest observation; ties go to the even rank.
    /// Edges are always values some customer actually has.
    Nearest,
}

/// Compute `buckets + 1` strictly increasing cut points over `values`.
///
/// `stage` names the caller in the error when the distribution has too few
/// distinct values to yield distinct edges. There is no fallback to fewer
/// buckets: that is a policy decision for the caller.
pub fn edges(
    values: &[f64],
    buckets: usize,
    interpolation: Interpolation,
    stage: &'static str,
) -> RfmResult<Vec<f64>> {
    if values.is_empty() {
        return Err(RfmError::EmptyDataset);
    }
    if buckets == 0 {
        return Err(RfmError::InvalidConfig {
            reason: format!("{stage}: bucket count must be positive"),
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let cuts: Vec<f64> = (0..=buckets)
        .map(|k| quantile_sorted(&sorted, k as f64 / buckets as f64, interpolation))
        .collect();

    if cuts.windows(2).any(|w| w[0] >= w[1]) {
        let mut distinct = cuts.clone();
        distinct.dedup();
        return Err(RfmError::DegenerateDistribution {
            stage,
            requested: buckets,
            distinct_edges: distinct.len(),
        });
    }

    log::debug!("{stage} edges: {cuts:?}");
    Ok(cuts)
}

/// Index of the bucket holding `value`, or None when it lies outside the
/// edges entirely.
pub fn bucket_of(value: f64, edges: &[f64]) -> Option<usize> {
    let (first, last) = (*edges.first()?, *edges.last()?);
    if edges.len() < 2 || value < first || value > last {
        return None;
    }
    Some(edges[1..].partition_point(|e| *e < value))
}

fn quantile_sorted(sorted: &[f64], q: f64, interpolation: Interpolation) -> f64 {
    let n = sorted.len();
    let position = q * (n - 1) as f64;
    match interpolation {
        Interpolation::Linear => {
            let lower = position.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            let fraction = position - lower as f64;
            sorted[lower] + fraction * (sorted[upper] - sorted[lower])
        }
        Interpolation::Nearest => sorted[round_half_even(position).min(n - 1)],
    }
}

fn round_half_even(x: f64) -> usize {
    let floor = x.floor();
    let fraction = x - floor;
    let base = floor as usize;
    if fraction > 0.5 || (fraction == 0.5 && base % 2 == 1) {
        base + 1
    } else {
        base
    }
}
