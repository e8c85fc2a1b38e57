//! Quantile scorer: each RFM dimension is discretized independently into
//! equal-population buckets over the whole cohort.
//!
//! The label set decides direction. Recency uses a descending set so the
//! most recent customers score highest; frequency and monetary ascend.

use crate::{
    config::RfmConfig,
    error::{RfmError, RfmResult},
    metrics::{CustomerMetrics, MetricsTable},
    quantile::{self, Interpolation},
    types::{CustomerId, DimensionScore},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Recency,
    Frequency,
    Monetary,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Recency, Self::Frequency, Self::Monetary];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Recency   => "recency",
            Self::Frequency => "frequency",
            Self::Monetary  => "monetary",
        }
    }

    fn stage(&self) -> &'static str {
        match self {
            Self::Recency   => "recency scoring",
            Self::Frequency => "frequency scoring",
            Self::Monetary  => "monetary scoring",
        }
    }

    pub fn value(&self, metrics: &CustomerMetrics) -> f64 {
        match self {
            Self::Recency   => metrics.recency as f64,
            Self::Frequency => metrics.frequency as f64,
            Self::Monetary  => metrics.monetary,
        }
    }
}

/// The three dimension scores of one customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmScores {
    pub recency:   DimensionScore,
    pub frequency: DimensionScore,
    pub monetary:  DimensionScore,
}

/// Score one dimension. `labels[i]` is assigned to bucket `i`, lowest
/// metric values first.
pub fn score_dimension(
    metrics: &MetricsTable,
    dimension: Dimension,
    labels: &[DimensionScore],
) -> RfmResult<BTreeMap<CustomerId, DimensionScore>> {
    let values: Vec<f64> = metrics.iter().map(|m| dimension.value(m)).collect();
    let cuts = quantile::edges(&values, labels.len(), Interpolation::Linear, dimension.stage())?;

    metrics
        .iter()
        .map(|m| -> RfmResult<(CustomerId, DimensionScore)> {
            let bucket = quantile::bucket_of(dimension.value(m), &cuts).ok_or_else(|| {
                RfmError::PipelineIntegrity {
                    stage: dimension.stage(),
                    customer_id: m.customer_id.clone(),
                }
            })?;
            Ok((m.customer_id.clone(), labels[bucket]))
        })
        .collect()
}

/// Score all three dimensions and zip them per customer.
pub fn score_all(
    metrics: &MetricsTable,
    config: &RfmConfig,
) -> RfmResult<BTreeMap<CustomerId, RfmScores>> {
    let recency = score_dimension(metrics, Dimension::Recency, config.scale(Dimension::Recency))?;
    let frequency = score_dimension(metrics, Dimension::Frequency, config.scale(Dimension::Frequency))?;
    let monetary = score_dimension(metrics, Dimension::Monetary, config.scale(Dimension::Monetary))?;

    let lookup = |scores: &BTreeMap<CustomerId, DimensionScore>, id: &CustomerId, stage: &'static str| {
        scores.get(id).copied().ok_or_else(|| RfmError::PipelineIntegrity {
            stage,
            customer_id: id.clone(),
        })
    };

    let scores = metrics
        .customers
        .keys()
        .map(|id| -> RfmResult<(CustomerId, RfmScores)> {
            Ok((
                id.clone(),
                RfmScores {
                    recency:   lookup(&recency, id, Dimension::Recency.stage())?,
                    frequency: lookup(&frequency, id, Dimension::Frequency.stage())?,
                    monetary:  lookup(&monetary, id, Dimension::Monetary.stage())?,
                },
            ))
        })
        .collect::<RfmResult<BTreeMap<_, _>>>()?;

    log::info!("Dimension scores assigned to {} customers", scores.len());
    Ok(scores)
}
