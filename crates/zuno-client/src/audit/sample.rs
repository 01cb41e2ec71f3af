//! Bundled transactions for `zuno demo audit`.
//!
//! Everything is dated relative to the supplied `now` so the demo always
//! falls inside the default lookback window.

use chrono::{DateTime, Duration, Utc};

use crate::audit::date::format_iso_datetime;
use crate::audit::types::{Merchant, Price, Product, Transaction};

const AMAZON_ID: i64 = 44;
const TARGET_ID: i64 = 12;
const STREAMING_ID: i64 = 900;

pub fn sample_transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    let mut rows = Vec::new();

    // Six monthly Spotify charges, merchant-level.
    for step in 0..6 {
        rows.push(sample_row(
            now - Duration::days(15 + 30 * step),
            STREAMING_ID,
            "Spotify",
            "9.99",
            None,
        ));
    }

    // Three Netflix charges thirty days apart.
    for step in 0..3 {
        rows.push(sample_row(
            now - Duration::days(5 + 30 * step),
            STREAMING_ID + 1,
            "Netflix",
            "15.49",
            None,
        ));
    }

    // One-off Amazon items, each with its own ASIN.
    for index in 1..=5 {
        let total = format!("{}.99", 19 + index);
        rows.push(sample_row(
            now - Duration::days(7 * index),
            AMAZON_ID,
            "Amazon",
            &total,
            Some((format!("ASIN{index:03}"), format!("Sample Item {index}"))),
        ));
    }

    // Subscribe & Save coffee delivered twice, ten days apart.
    for offset in [12, 22] {
        rows.push(sample_row(
            now - Duration::days(offset),
            AMAZON_ID,
            "Amazon",
            "24.50",
            Some(("B07COFFEE".to_string(), "Subscribe & Save Coffee".to_string())),
        ));
    }

    rows.push(sample_row(
        now - Duration::days(3),
        TARGET_ID,
        "Target",
        "54.10",
        None,
    ));

    // The sync service occasionally omits the timestamp.
    rows.push(Transaction {
        datetime: None,
        ts: None,
        merchant: Some(Merchant {
            id: Some(TARGET_ID),
            name: Some("Target".to_string()),
        }),
        price: Some(Price {
            total: Some("12.00".to_string()),
        }),
        products: None,
    });

    rows
}

fn sample_row(
    when: DateTime<Utc>,
    merchant_id: i64,
    merchant_name: &str,
    total: &str,
    product: Option<(String, String)>,
) -> Transaction {
    Transaction {
        datetime: Some(format_iso_datetime(&when)),
        ts: None,
        merchant: Some(Merchant {
            id: Some(merchant_id),
            name: Some(merchant_name.to_string()),
        }),
        price: Some(Price {
            total: Some(total.to_string()),
        }),
        products: product.map(|(external_id, name)| {
            vec![Product {
                external_id: Some(external_id),
                name: Some(name),
            }]
        }),
    }
}
