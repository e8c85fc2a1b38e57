//! Synthetic retail ledgers for demos, soak runs and tests.
//!
//! Spend is Pareto-skewed, visit counts vary per customer, and a small
//! share of lines carries no customer id, as real till exports do.

use crate::{
    ledger::{LedgerEntry, TransactionTable},
    rng::Stream,
    types::{CustomerId, Timestamp},
};
use chrono::{Duration, NaiveDate};

/// First customer number handed out.
const FIRST_CUSTOMER: i64 = 12_000;

#[derive(Debug, Clone)]
pub struct SyntheticLedger {
    pub customers: usize,
    pub seed:      u64,
    /// Length of the trading window in days.
    pub days:      i64,
    pub start:     Timestamp,
    /// Probability a line has no customer id.
    pub unattributed_rate: f64,
}

impl SyntheticLedger {
    pub fn new(customers: usize, seed: u64) -> Self {
        let start = NaiveDate::from_ymd_opt(2010, 12, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap_or_default();
        Self {
            customers,
            seed,
            days: 365,
            start,
            unattributed_rate: 0.02,
        }
    }

    pub fn with_days(mut self, days: i64) -> Self {
        self.days = days.max(1);
        self
    }

    /// Raw ledger lines, unattributed ones included.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        let mut customers = Stream::Customers.rng(self.seed);
        let mut visits = Stream::Visits.rng(self.seed);
        let mut lines = Stream::Lines.rng(self.seed);

        let mut entries = Vec::new();
        for i in 0..self.customers {
            let customer_id = CustomerId::Numeric(FIRST_CUSTOMER + i as i64);
            // Heavy-tailed loyalty: most customers visit a handful of times.
            let visit_count = customers.pareto(1.0, 1.2).min(60.0) as u64;
            let basket_scale = customers.pareto(1.0, 2.0).min(20.0);

            for _ in 0..visit_count.max(1) {
                let day = visits.below(self.days as u64) as i64;
                let minute = visits.below(10 * 60) as i64;
                let timestamp = self.start + Duration::days(day) + Duration::minutes(minute);
                let invoice_no = format!("{}", 500_000 + entries.len());

                let line_count = 1 + lines.below(8);
                for _ in 0..line_count {
                    let quantity = 1 + lines.below(12) as i64;
                    let price = (lines.pareto(0.4, 1.6) * basket_scale).min(500.0);
                    let attributed = !lines.chance(self.unattributed_rate);
                    entries.push(LedgerEntry {
                        customer_id: attributed.then(|| customer_id.clone()),
                        quantity,
                        unit_price: (price * 100.0).round() / 100.0,
                        timestamp,
                        invoice_no: Some(invoice_no.clone()),
                    });
                }
            }
        }
        entries
    }

    /// The cleaned table.
    pub fn table(&self) -> TransactionTable {
        TransactionTable::clean(self.entries())
    }
}
