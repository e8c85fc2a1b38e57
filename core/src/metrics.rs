//! Metric calculator: ledger rows → one Recency/Frequency/Monetary record
//! per customer.

use crate::{
    error::{RfmError, RfmResult},
    ledger::TransactionTable,
    types::{CustomerId, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    pub customer_id: CustomerId,
    /// Whole days between the customer's last purchase and the reference.
    pub recency:     i64,
    /// Number of ledger rows.
    pub frequency:   u64,
    /// Sum of line values.
    pub monetary:    f64,
}

/// All customers' metrics plus the reference timestamp they were measured
/// against. Keyed by customer id so iteration order never depends on the
/// order rows arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTable {
    pub reference: Timestamp,
    pub customers: BTreeMap<CustomerId, CustomerMetrics>,
}

impl MetricsTable {
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn get(&self, customer_id: &CustomerId) -> Option<&CustomerMetrics> {
        self.customers.get(customer_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomerMetrics> {
        self.customers.values()
    }
}

struct Accumulator {
    last_seen: Timestamp,
    frequency: u64,
    monetary:  f64,
}

pub fn compute_metrics(table: &TransactionTable) -> RfmResult<MetricsTable> {
    let reference = table.latest_timestamp().ok_or(RfmError::EmptyDataset)?;

    let mut groups: BTreeMap<CustomerId, Accumulator> = BTreeMap::new();
    for row in table.rows() {
        let acc = groups
            .entry(row.customer_id.clone())
            .or_insert(Accumulator { last_seen: row.timestamp, frequency: 0, monetary: 0.0 });
        acc.last_seen = acc.last_seen.max(row.timestamp);
        acc.frequency += 1;
        acc.monetary += row.line_value();
    }

    let customers = groups
        .into_iter()
        .map(|(customer_id, acc)| {
            // num_days truncates; reference >= last_seen so this is a floor.
            let recency = (reference - acc.last_seen).num_days();
            let metrics = CustomerMetrics {
                customer_id: customer_id.clone(),
                recency,
                frequency: acc.frequency,
                monetary: acc.monetary,
            };
            (customer_id, metrics)
        })
        .collect::<BTreeMap<_, _>>();

    log::info!(
        "Metrics computed: {} customers from {} rows, reference {}",
        customers.len(),
        table.len(),
        reference
    );

    Ok(MetricsTable { reference, customers })
}
