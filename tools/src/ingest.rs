//! Retail ledger CSV ingestion.
//!
//! Expected columns (extra columns are ignored):
//!   InvoiceNo, Quantity, InvoiceDate (%m/%d/%Y %H:%M), UnitPrice, CustomerID
//!
//! Exports are often Latin-1, so records are read as bytes and only the
//! columns we use are decoded.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rfm_core::{CustomerId, LedgerEntry, TransactionTable};
use serde::Deserialize;
use std::path::Path;

pub const INVOICE_DATE_FORMAT: &str = "%m/%d/%Y %H:%M";

#[derive(Debug, Deserialize)]
struct RetailRecord {
    #[serde(rename = "InvoiceNo")]
    invoice_no:   String,
    #[serde(rename = "Quantity")]
    quantity:     i64,
    #[serde(rename = "InvoiceDate")]
    invoice_date: String,
    #[serde(rename = "UnitPrice")]
    unit_price:   f64,
    #[serde(rename = "CustomerID", default)]
    customer_id:  Option<String>,
}

pub fn load_ledger(csv_path: &Path) -> Result<TransactionTable> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open {}", csv_path.display()))?;
    let headers = rdr.byte_headers().context("Failed to read CSV header")?.clone();

    let mut entries = Vec::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let line = i + 2;
        let record = result.with_context(|| format!("Failed to read line {line}"))?;
        let raw: RetailRecord = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Failed to deserialize line {line}"))?;
        let timestamp = NaiveDateTime::parse_from_str(raw.invoice_date.trim(), INVOICE_DATE_FORMAT)
            .with_context(|| format!("Bad InvoiceDate {:?} on line {line}", raw.invoice_date))?;

        entries.push(LedgerEntry {
            customer_id: raw.customer_id.as_deref().and_then(CustomerId::parse),
            quantity:    raw.quantity,
            unit_price:  raw.unit_price,
            timestamp,
            invoice_no:  Some(raw.invoice_no),
        });
    }

    log::info!("Read {} ledger lines from {}", entries.len(), csv_path.display());
    Ok(TransactionTable::clean(entries))
}
