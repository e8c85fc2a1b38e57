//! rfm-core: Recency/Frequency/Monetary customer segmentation.
//!
//! A single-threaded batch pipeline over one immutable ledger snapshot.
//! See `pipeline.rs` for the fixed stage order.

pub mod composite;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod metrics;
pub mod pipeline;
pub mod quantile;
pub mod report;
pub mod rng;
pub mod scoring;
pub mod segment;
pub mod synthetic;
pub mod types;

pub use config::{RfmConfig, ScoreWeights};
pub use error::{RfmError, RfmResult};
pub use ledger::{LedgerEntry, TransactionRow, TransactionTable};
pub use pipeline::{CustomerProfile, RfmPipeline, RfmRun};
pub use report::RenderPayload;
pub use segment::Segment;
pub use types::CustomerId;
