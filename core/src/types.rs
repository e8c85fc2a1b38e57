//! Shared primitive types used across the whole pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one batch run.
pub type RunId = String;

/// Invoice timestamp. The ledger carries no timezone, so neither do we.
pub type Timestamp = NaiveDateTime;

/// A per-dimension quantile score (1..=5 under the standard scales).
pub type DimensionScore = u8;

/// Weighted sum of the three dimension scores.
pub type CompositeIndex = u32;

/// Opaque customer key.
///
/// Retail exports carry customer numbers as integers (often rendered as
/// floats, e.g. `12346.0`); other ledgers use free-form codes. Both are
/// supported with a total order so grouping is independent of input order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Numeric(i64),
    Text(String),
}

impl CustomerId {
    /// Parse a raw identifier cell. Blank cells mean "no customer".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(Self::Numeric(n));
        }
        // Integral floats only; "12.5" stays a text code.
        if let Some(int_part) = trimmed.strip_suffix(".0") {
            if let Ok(n) = int_part.parse::<i64>() {
                return Some(Self::Numeric(n));
            }
        }
        Some(Self::Text(trimmed.to_string()))
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s)    => f.write_str(s),
        }
    }
}

impl From<i64> for CustomerId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_float_rendered_customer_numbers() {
        assert_eq!(CustomerId::parse("12346.0"), Some(CustomerId::Numeric(12346)));
        assert_eq!(CustomerId::parse(" 17850 "), Some(CustomerId::Numeric(17850)));
        assert_eq!(CustomerId::parse("12.5"), Some(CustomerId::Text("12.5".into())));
        assert_eq!(CustomerId::parse("C-001"), Some(CustomerId::Text("C-001".into())));
        assert_eq!(CustomerId::parse("   "), None);
    }

    #[test]
    fn numeric_ids_sort_before_text_ids() {
        let mut ids = vec![
            CustomerId::from("b"),
            CustomerId::from(20),
            CustomerId::from("a"),
            CustomerId::from(3),
        ];
        ids.sort();
        assert_eq!(ids[0], CustomerId::Numeric(3));
        assert_eq!(ids[1], CustomerId::Numeric(20));
        assert_eq!(ids[2], CustomerId::Text("a".into()));
    }
}
