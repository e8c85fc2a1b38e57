//! The transaction table: the immutable input snapshot of one run.
//!
//! RULE: nothing downstream ever sees a row without a customer.
//! Unattributed entries are dropped here, once, and counted.

use crate::types::{CustomerId, Timestamp};
use serde::{Deserialize, Serialize};

/// One purchased line item, attributed to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub customer_id: CustomerId,
    pub quantity:    i64,
    pub unit_price:  f64,
    pub timestamp:   Timestamp,
    #[serde(default)]
    pub invoice_no:  Option<String>,
}

impl TransactionRow {
    pub fn new(customer_id: CustomerId, quantity: i64, unit_price: f64, timestamp: Timestamp) -> Self {
        Self { customer_id, quantity, unit_price, timestamp, invoice_no: None }
    }

    /// quantity × unit_price. Returns and cancellations stay negative.
    pub fn line_value(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// A ledger line as it arrives from ingestion, customer possibly missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub customer_id: Option<CustomerId>,
    pub quantity:    i64,
    pub unit_price:  f64,
    pub timestamp:   Timestamp,
    #[serde(default)]
    pub invoice_no:  Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    rows: Vec<TransactionRow>,
}

impl TransactionTable {
    pub fn from_rows(rows: Vec<TransactionRow>) -> Self {
        Self { rows }
    }

    /// Drop entries that cannot be attributed to a customer.
    pub fn clean(entries: impl IntoIterator<Item = LedgerEntry>) -> Self {
        let mut dropped = 0usize;
        let rows: Vec<TransactionRow> = entries
            .into_iter()
            .filter_map(|e| match e.customer_id {
                Some(customer_id) => Some(TransactionRow {
                    customer_id,
                    quantity:   e.quantity,
                    unit_price: e.unit_price,
                    timestamp:  e.timestamp,
                    invoice_no: e.invoice_no,
                }),
                None => {
                    dropped += 1;
                    None
                }
            })
            .collect();
        if dropped > 0 {
            log::warn!("Dropped {dropped} ledger entries with no customer id");
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The dataset's single latest timestamp, shared by every customer.
    pub fn latest_timestamp(&self) -> Option<Timestamp> {
        self.rows.iter().map(|r| r.timestamp).max()
    }
}
