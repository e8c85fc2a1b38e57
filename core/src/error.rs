use crate::types::CustomerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfmError {
    #[error("Empty dataset: no attributed transaction rows to score")]
    EmptyDataset,

    #[error(
        "Degenerate distribution in {stage}: {requested} buckets requested \
         but only {distinct_edges} distinct boundaries available"
    )]
    DegenerateDistribution {
        stage: &'static str,
        requested: usize,
        distinct_edges: usize,
    },

    #[error("Pipeline integrity violation in {stage}: customer {customer_id} missing upstream")]
    PipelineIntegrity {
        stage: &'static str,
        customer_id: CustomerId,
    },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RfmResult<T> = Result<T, RfmError>;
