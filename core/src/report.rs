//! Reporting aggregator — the two summaries handed to the renderer.
//!
//!   1. Customer count per segment (composition view).
//!   2. Total monetary per segment, excluded segments removed, sorted
//!      ascending (ranking view).
//!
//! Monetary totals keep full precision here; they are truncated to whole
//! units only in `RenderPayload`.

use crate::{
    error::{RfmError, RfmResult},
    metrics::MetricsTable,
    segment::{Segment, Segmentation},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const STAGE: &str = "reporting";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub segment:   Segment,
    pub customers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMonetary {
    pub segment:  Segment,
    pub monetary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    /// Every configured segment, in taxonomy order, zero counts included.
    pub counts:  Vec<SegmentCount>,
    /// Non-empty, non-excluded segments, ascending by total monetary.
    pub ranking: Vec<SegmentMonetary>,
}

/// Customer count per segment, one entry per segment in `segments`.
pub fn segment_counts(segmentation: &Segmentation, segments: &[Segment]) -> Vec<SegmentCount> {
    let mut tally: BTreeMap<Segment, u64> = BTreeMap::new();
    for segment in segmentation.assignments.values() {
        *tally.entry(*segment).or_default() += 1;
    }
    segments
        .iter()
        .map(|s| SegmentCount { segment: *s, customers: tally.get(s).copied().unwrap_or(0) })
        .collect()
}

/// Total monetary per segment, reusing each customer's canonical monetary
/// value, with `excluded` segments left out.
pub fn monetary_ranking(
    segmentation: &Segmentation,
    metrics: &MetricsTable,
    excluded: &[Segment],
) -> RfmResult<Vec<SegmentMonetary>> {
    let mut totals: BTreeMap<Segment, f64> = BTreeMap::new();
    for (id, segment) in &segmentation.assignments {
        if excluded.contains(segment) {
            continue;
        }
        let customer = metrics.get(id).ok_or_else(|| RfmError::PipelineIntegrity {
            stage: STAGE,
            customer_id: id.clone(),
        })?;
        *totals.entry(*segment).or_default() += customer.monetary;
    }

    let mut ranking: Vec<SegmentMonetary> = totals
        .into_iter()
        .map(|(segment, monetary)| SegmentMonetary { segment, monetary })
        .collect();
    // Stable: equal totals keep taxonomy order.
    ranking.sort_by(|a, b| a.monetary.total_cmp(&b.monetary));
    Ok(ranking)
}

pub fn build_report(
    segmentation: &Segmentation,
    metrics: &MetricsTable,
    segments: &[Segment],
    excluded: &[Segment],
) -> RfmResult<SegmentReport> {
    let counts = segment_counts(segmentation, segments);
    let ranking = monetary_ranking(segmentation, metrics, excluded)?;
    log::info!(
        "Report built: {} segments counted, {} ranked",
        counts.len(),
        ranking.len()
    );
    Ok(SegmentReport { counts, ranking })
}

// ── Render payload ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionSlice {
    pub segment:   String,
    pub customers: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingBar {
    pub segment:        String,
    pub total_monetary: i64,
}

/// What the renderer receives: proportion view and ranked view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub composition: Vec<CompositionSlice>,
    pub ranking:     Vec<RankingBar>,
}

impl From<&SegmentReport> for RenderPayload {
    fn from(report: &SegmentReport) -> Self {
        let composition = report
            .counts
            .iter()
            .filter(|c| c.customers > 0)
            .map(|c| CompositionSlice { segment: c.segment.label().to_string(), customers: c.customers })
            .collect();
        let ranking = report
            .ranking
            .iter()
            .map(|r| RankingBar {
                segment: r.segment.label().to_string(),
                // Truncation toward zero, at this boundary only.
                total_monetary: r.monetary.trunc() as i64,
            })
            .collect();
        Self { composition, ranking }
    }
}

impl RenderPayload {
    pub fn to_json(&self) -> RfmResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
