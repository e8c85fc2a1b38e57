//! Scoring policy: bucket label sets, composite weights, segment taxonomy.
//!
//! RULE: no stage hardcodes a label, a weight or a bucket count.
//! Everything policy-shaped lives here and is injected into the pipeline.

use crate::{
    error::{RfmError, RfmResult},
    scoring::Dimension,
    segment::Segment,
    types::{CompositeIndex, DimensionScore},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fixed composite weights. Frequency counts most; recency and monetary
/// count equally less.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub recency:   u32,
    pub frequency: u32,
    pub monetary:  u32,
}

impl ScoreWeights {
    /// Sum of the three weights; `None` on overflow.
    pub fn total(&self) -> Option<u32> {
        self.recency.checked_add(self.frequency)?.checked_add(self.monetary)
    }

    pub fn of(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Recency   => self.recency,
            Dimension::Frequency => self.frequency,
            Dimension::Monetary  => self.monetary,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { recency: 3, frequency: 4, monetary: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmConfig {
    /// Labels for the recency buckets, lowest recency (most recent) first.
    pub recency_scale:   Vec<DimensionScore>,
    /// Labels for the frequency buckets, lowest frequency first.
    pub frequency_scale: Vec<DimensionScore>,
    /// Labels for the monetary buckets, lowest spend first.
    pub monetary_scale:  Vec<DimensionScore>,
    #[serde(default)]
    pub weights:         ScoreWeights,
    /// Segment per composite-index bin, lowest bin first.
    pub segments:        Vec<Segment>,
    /// Segments left out of the monetary ranking view.
    #[serde(default)]
    pub monetary_view_excluded: Vec<Segment>,
}

impl RfmConfig {
    /// The standard five-bucket, eight-segment policy.
    pub fn standard() -> Self {
        Self {
            recency_scale:   vec![5, 4, 3, 2, 1],
            frequency_scale: vec![1, 2, 3, 4, 5],
            monetary_scale:  vec![1, 2, 3, 4, 5],
            weights:         ScoreWeights::default(),
            segments:        Segment::ALL.to_vec(),
            monetary_view_excluded: vec![Segment::GenerallyRetained],
        }
    }

    /// Load a policy from a JSON file and validate it.
    pub fn load(path: &str) -> RfmResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RfmError::Other(anyhow::anyhow!("Cannot read {path}: {e}")))?;
        let config: RfmConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn scale(&self, dimension: Dimension) -> &[DimensionScore] {
        match dimension {
            Dimension::Recency   => &self.recency_scale,
            Dimension::Frequency => &self.frequency_scale,
            Dimension::Monetary  => &self.monetary_scale,
        }
    }

    /// Largest composite index this policy can produce; `None` if it does
    /// not fit in a `CompositeIndex`.
    pub fn max_composite(&self) -> Option<CompositeIndex> {
        Dimension::ALL.iter().try_fold(0 as CompositeIndex, |acc, dimension| {
            let top = *self.scale(*dimension).iter().max()? as CompositeIndex;
            acc.checked_add(top.checked_mul(self.weights.of(*dimension))?)
        })
    }

    pub fn validate(&self) -> RfmResult<()> {
        for dimension in Dimension::ALL {
            let scale = self.scale(dimension);
            if scale.is_empty() {
                return Err(invalid(format!("{} scale has no labels", dimension.name())));
            }
            if scale.contains(&0) {
                return Err(invalid(format!("{} scale contains a zero label", dimension.name())));
            }
        }
        match self.weights.total() {
            Some(0) => return Err(invalid("score weights sum to zero".into())),
            None => return Err(invalid("score weights overflow their sum".into())),
            Some(_) => {}
        }
        if self.max_composite().is_none() {
            return Err(invalid("score weights overflow the composite index".into()));
        }
        if self.segments.is_empty() {
            return Err(invalid("segment list is empty".into()));
        }
        let mut seen = HashSet::new();
        for segment in &self.segments {
            if !seen.insert(segment) {
                return Err(invalid(format!("segment {} listed twice", segment.label())));
            }
        }
        if let Some(stray) = self.monetary_view_excluded.iter().find(|s| !seen.contains(s)) {
            return Err(invalid(format!(
                "excluded segment {} is not a configured segment",
                stray.label()
            )));
        }
        Ok(())
    }
}

impl Default for RfmConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn invalid(reason: String) -> RfmError {
    RfmError::InvalidConfig { reason }
}
