//! The run log — one entry per completed pipeline stage.
//!
//! RULE: events are appended in stage order and never rewritten.
//! Two runs over the same snapshot must produce identical logs.

use crate::{
    scoring::Dimension,
    types::{CompositeIndex, RunId, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted {
        run_id: RunId,
        rows:   usize,
    },
    MetricsComputed {
        customers: usize,
        reference: Timestamp,
    },
    DimensionScored {
        dimension: Dimension,
        customers: usize,
    },
    CompositeComputed {
        customers: usize,
        min:       CompositeIndex,
        max:       CompositeIndex,
    },
    SegmentsAssigned {
        edges: Vec<CompositeIndex>,
    },
    ReportBuilt {
        counted_segments: usize,
        ranked_segments:  usize,
    },
    RunCompleted {
        run_id: RunId,
    },
}

impl RunEvent {
    /// Stable name for the event_type column of the log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. }        => "run_started",
            Self::MetricsComputed { .. }   => "metrics_computed",
            Self::DimensionScored { .. }   => "dimension_scored",
            Self::CompositeComputed { .. } => "composite_computed",
            Self::SegmentsAssigned { .. }  => "segments_assigned",
            Self::ReportBuilt { .. }       => "report_built",
            Self::RunCompleted { .. }      => "run_completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub seq:        u64,
    pub run_id:     RunId,
    pub event_type: String,
    pub payload:    String,
}
