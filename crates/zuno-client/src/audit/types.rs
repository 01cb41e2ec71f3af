use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A purchase as delivered by the transaction-sync service.
///
/// Every field is optional on the wire. Records that lack what the analyzer
/// needs are reported as skipped rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub datetime: Option<String>,
    pub ts: Option<String>,
    pub merchant: Option<Merchant>,
    pub price: Option<Price>,
    pub products: Option<Vec<Product>>,
}

impl Transaction {
    pub fn timestamp(&self) -> Option<&str> {
        self.datetime
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or(self.ts.as_deref())
    }

    pub fn merchant_name(&self) -> Option<&str> {
        self.merchant
            .as_ref()
            .and_then(|merchant| merchant.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    pub fn first_product(&self) -> Option<&Product> {
        self.products.as_ref().and_then(|products| products.first())
    }

    pub fn total_amount(&self) -> Option<Decimal> {
        self.price.as_ref().and_then(Price::total_amount)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Merchant {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Price {
    /// Decimal string, e.g. `"9.99"`.
    pub total: Option<String>,
}

impl Price {
    pub fn total_amount(&self) -> Option<Decimal> {
        let raw = self.total.as_deref()?.trim();
        Decimal::from_str(raw).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Product {
    pub external_id: Option<String>,
    pub name: Option<String>,
}

impl Product {
    pub fn stable_id(&self) -> Option<&str> {
        self.external_id
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}

/// The reference instant and optional lookback bound for one audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditWindow {
    pub now: DateTime<Utc>,
    pub lookback_days: Option<u32>,
}

impl AuditWindow {
    pub fn unbounded(now: DateTime<Utc>) -> Self {
        Self {
            now,
            lookback_days: None,
        }
    }

    pub fn with_lookback(now: DateTime<Utc>, lookback_days: u32) -> Self {
        Self {
            now,
            lookback_days: Some(lookback_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{Merchant, Price, Product, Transaction};

    #[test]
    fn timestamp_falls_back_to_ts_alias() {
        let transaction = Transaction {
            datetime: Some("  ".to_string()),
            ts: Some("2026-01-01T00:00:00Z".to_string()),
            ..Transaction::default()
        };
        assert_eq!(transaction.timestamp(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn empty_merchant_name_counts_as_missing() {
        let transaction = Transaction {
            merchant: Some(Merchant {
                id: Some(44),
                name: Some(String::new()),
            }),
            ..Transaction::default()
        };
        assert_eq!(transaction.merchant_name(), None);
    }

    #[test]
    fn price_total_parses_decimal_strings_only() {
        let valid = Price {
            total: Some(" 19.99 ".to_string()),
        };
        assert_eq!(valid.total_amount(), Some(dec!(19.99)));

        let invalid = Price {
            total: Some("n/a".to_string()),
        };
        assert_eq!(invalid.total_amount(), None);
    }

    #[test]
    fn blank_external_id_is_not_a_stable_product_reference() {
        let product = Product {
            external_id: Some(" ".to_string()),
            name: Some("Gift Card".to_string()),
        };
        assert_eq!(product.stable_id(), None);
    }
}
