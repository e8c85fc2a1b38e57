//! The RFM pipeline driver.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Metric calculator     (ledger → recency/frequency/monetary)
//!   2. Quantile scorer       (recency, frequency, monetary — independently)
//!   3. Composite scorer      (weighted sum)
//!   4. Segmenter             (composite quantile bins → segment)
//!   5. Reporting aggregator  (composition + monetary ranking)
//!
//! RULES:
//!   - Each stage reads only the outputs of the stages above it.
//!   - A stage either produces its full mapping or fails the run.
//!   - Nothing depends on wall-clock time or hash iteration order.

use crate::{
    composite::composite_all,
    config::RfmConfig,
    error::{RfmError, RfmResult},
    event::{RunEvent, RunLogEntry},
    ledger::TransactionTable,
    metrics::{compute_metrics, CustomerMetrics, MetricsTable},
    report::{build_report, RenderPayload, SegmentReport},
    scoring::{score_all, Dimension, RfmScores},
    segment::{segment_all, Segment, Segmentation},
    types::{CompositeIndex, CustomerId, RunId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub struct RfmPipeline {
    config: RfmConfig,
}

impl RfmPipeline {
    /// Build a pipeline around a policy. The policy is validated up front
    /// so a bad config never reaches a stage.
    pub fn new(config: RfmConfig) -> RfmResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn standard() -> Self {
        Self { config: RfmConfig::standard() }
    }

    pub fn config(&self) -> &RfmConfig {
        &self.config
    }

    /// Run every stage over one immutable snapshot.
    pub fn run(&self, run_id: impl Into<RunId>, table: &TransactionTable) -> RfmResult<RfmRun> {
        let run_id = run_id.into();
        let mut log = RunLog::new(run_id.clone());
        log.append(RunEvent::RunStarted { run_id: run_id.clone(), rows: table.len() })?;

        // 1. Metrics
        let metrics = compute_metrics(table)?;
        log.append(RunEvent::MetricsComputed {
            customers: metrics.len(),
            reference: metrics.reference,
        })?;

        // 2. Dimension scores
        let scores = score_all(&metrics, &self.config)?;
        for dimension in Dimension::ALL {
            log.append(RunEvent::DimensionScored { dimension, customers: scores.len() })?;
        }

        // 3. Composite
        let composites = composite_all(&scores, &self.config.weights);
        let min = composites.values().copied().min().unwrap_or(0);
        let max = composites.values().copied().max().unwrap_or(0);
        log.append(RunEvent::CompositeComputed { customers: composites.len(), min, max })?;

        // 4. Segments
        let segmentation = segment_all(&composites, &self.config.segments)?;
        log.append(RunEvent::SegmentsAssigned { edges: segmentation.edges.clone() })?;

        // 5. Report
        let report = build_report(
            &segmentation,
            &metrics,
            &self.config.segments,
            &self.config.monetary_view_excluded,
        )?;
        log.append(RunEvent::ReportBuilt {
            counted_segments: report.counts.len(),
            ranked_segments:  report.ranking.len(),
        })?;

        log.append(RunEvent::RunCompleted { run_id: run_id.clone() })?;
        log::info!("Run {run_id} completed: {} customers segmented", segmentation.assignments.len());

        Ok(RfmRun {
            run_id,
            metrics,
            scores,
            composites,
            segmentation,
            report,
            log: log.entries,
        })
    }
}

struct RunLog {
    run_id:  RunId,
    entries: Vec<RunLogEntry>,
}

impl RunLog {
    fn new(run_id: RunId) -> Self {
        Self { run_id, entries: Vec::new() }
    }

    fn append(&mut self, event: RunEvent) -> RfmResult<()> {
        let entry = RunLogEntry {
            seq:        self.entries.len() as u64,
            run_id:     self.run_id.clone(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(&event)?,
        };
        log::debug!("[{}] {}", entry.event_type, entry.payload);
        self.entries.push(entry);
        Ok(())
    }
}

/// One customer's row of the final RFM model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    pub recency:     i64,
    pub frequency:   u64,
    pub monetary:    f64,
    pub scores:      RfmScores,
    pub composite:   CompositeIndex,
    pub segment:     Segment,
}

/// Everything one run produced. Read-only once returned.
#[derive(Debug, Clone)]
pub struct RfmRun {
    pub run_id:       RunId,
    pub metrics:      MetricsTable,
    pub scores:       BTreeMap<CustomerId, RfmScores>,
    pub composites:   BTreeMap<CustomerId, CompositeIndex>,
    pub segmentation: Segmentation,
    pub report:       SegmentReport,
    pub log:          Vec<RunLogEntry>,
}

impl RfmRun {
    pub fn customer_count(&self) -> usize {
        self.metrics.len()
    }

    pub fn segment_of(&self, customer_id: &CustomerId) -> Option<Segment> {
        self.segmentation.get(customer_id)
    }

    pub fn profile(&self, customer_id: &CustomerId) -> RfmResult<CustomerProfile> {
        let metrics = self.metrics.get(customer_id).ok_or_else(|| missing("profile", customer_id))?;
        self.build_profile(metrics)
    }

    /// Profiles for every customer, ordered by customer id.
    pub fn profiles(&self) -> RfmResult<Vec<CustomerProfile>> {
        self.metrics.iter().map(|m| self.build_profile(m)).collect()
    }

    pub fn payload(&self) -> RenderPayload {
        RenderPayload::from(&self.report)
    }

    fn build_profile(&self, metrics: &CustomerMetrics) -> RfmResult<CustomerProfile> {
        let id = &metrics.customer_id;
        Ok(CustomerProfile {
            customer_id: id.clone(),
            recency:     metrics.recency,
            frequency:   metrics.frequency,
            monetary:    metrics.monetary,
            scores:      *self.scores.get(id).ok_or_else(|| missing("profile", id))?,
            composite:   *self.composites.get(id).ok_or_else(|| missing("profile", id))?,
            segment:     self.segmentation.get(id).ok_or_else(|| missing("profile", id))?,
        })
    }
}

fn missing(stage: &'static str, customer_id: &CustomerId) -> RfmError {
    RfmError::PipelineIntegrity { stage, customer_id: customer_id.clone() }
}
