//! Segmenter: composite indices → customer lifecycle segments.
//!
//! Bins are quantiles of the current cohort's composite distribution, not
//! fixed thresholds. A segment therefore means "where this customer sits
//! relative to everyone else in this snapshot". Edges use nearest-rank
//! selection so every boundary is a composite score some customer holds.

use crate::{
    error::{RfmError, RfmResult},
    quantile::{self, Interpolation},
    types::{CompositeIndex, CustomerId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const STAGE: &str = "segmentation";

/// Segment taxonomy, in ascending business value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "Churned")]
    Churned,
    #[serde(rename = "Generally-Retained")]
    GenerallyRetained,
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Potential")]
    Potential,
    #[serde(rename = "Key-Retention-Needed")]
    KeyRetentionNeeded,
    #[serde(rename = "Key-Deepening")]
    KeyDeepening,
    #[serde(rename = "Key-Reactivation")]
    KeyReactivation,
    #[serde(rename = "Key-Value")]
    KeyValue,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Self::Churned,
        Self::GenerallyRetained,
        Self::New,
        Self::Potential,
        Self::KeyRetentionNeeded,
        Self::KeyDeepening,
        Self::KeyReactivation,
        Self::KeyValue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Churned            => "Churned",
            Self::GenerallyRetained  => "Generally-Retained",
            Self::New                => "New",
            Self::Potential          => "Potential",
            Self::KeyRetentionNeeded => "Key-Retention-Needed",
            Self::KeyDeepening       => "Key-Deepening",
            Self::KeyReactivation    => "Key-Reactivation",
            Self::KeyValue           => "Key-Value",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assignment of every customer to a segment, plus the composite edges used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    pub edges:       Vec<CompositeIndex>,
    pub assignments: BTreeMap<CustomerId, Segment>,
}

impl Segmentation {
    pub fn get(&self, customer_id: &CustomerId) -> Option<Segment> {
        self.assignments.get(customer_id).copied()
    }
}

/// Bin composites into `segments.len()` quantile bins; `segments[i]` labels
/// bin `i`, lowest composite first.
pub fn segment_all(
    composites: &BTreeMap<CustomerId, CompositeIndex>,
    segments: &[Segment],
) -> RfmResult<Segmentation> {
    let values: Vec<f64> = composites.values().map(|c| *c as f64).collect();
    let cuts = quantile::edges(&values, segments.len(), Interpolation::Nearest, STAGE)?;

    let assignments = composites
        .iter()
        .map(|(id, composite)| -> RfmResult<(CustomerId, Segment)> {
            let bin = quantile::bucket_of(*composite as f64, &cuts).ok_or_else(|| {
                RfmError::PipelineIntegrity { stage: STAGE, customer_id: id.clone() }
            })?;
            Ok((id.clone(), segments[bin]))
        })
        .collect::<RfmResult<BTreeMap<_, _>>>()?;

    // Nearest-rank edges are observed composites, so they are integral.
    let edges = cuts.iter().map(|c| *c as CompositeIndex).collect();

    log::info!("Segmented {} customers into {} bins", assignments.len(), segments.len());
    Ok(Segmentation { edges, assignments })
}
