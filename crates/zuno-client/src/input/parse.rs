use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::audit::types::{Merchant, Price, Product, Transaction};
use crate::input::{OPTIONAL_CSV_HEADERS, REQUIRED_CSV_HEADERS};
use crate::input::{optional_header_names, required_header_names};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    JsonArray,
    JsonObject,
    Csv,
}

impl InputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JsonArray => "json_array",
            Self::JsonObject => "json_object",
            Self::Csv => "csv",
        }
    }
}

/// Transactions decoded from one source.
///
/// Rows are numbered from 1: array position for JSON, data row for CSV.
#[derive(Debug, Clone)]
pub struct ParsedInput {
    pub format: InputFormat,
    pub transactions: Vec<Transaction>,
    /// Source row of each entry in `transactions`.
    pub source_rows: Vec<usize>,
    /// Rows that could not be decoded into a transaction at all.
    pub unreadable_rows: Vec<usize>,
}

impl ParsedInput {
    fn new(format: InputFormat) -> Self {
        Self {
            format,
            transactions: Vec::new(),
            source_rows: Vec::new(),
            unreadable_rows: Vec::new(),
        }
    }

    fn push(&mut self, row: usize, transaction: Transaction) {
        self.transactions.push(transaction);
        self.source_rows.push(row);
    }
}

pub fn parse_transactions(content: &str) -> ClientResult<ParsedInput> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_input_format(
            "Transaction source is empty.",
            "empty",
        ));
    }

    if looks_like_ndjson(trimmed) {
        return Err(ClientError::invalid_input_format(
            "NDJSON is not supported. Provide a JSON array, a JSON object with `transactions`, or CSV.",
            "ndjson",
        ));
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        let parsed = serde_json::from_str::<Value>(trimmed).map_err(|error| {
            ClientError::invalid_input_format(
                &format!("Invalid JSON input: {error}"),
                "invalid_json",
            )
        })?;
        return parse_json(parsed);
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    Err(ClientError::invalid_input_format(
        "Unsupported input format. Provide a JSON array, a JSON object with `transactions`, or CSV with headers.",
        "unknown",
    ))
}

fn parse_json(parsed: Value) -> ClientResult<ParsedInput> {
    match parsed {
        Value::Array(items) => Ok(collect_json_rows(InputFormat::JsonArray, &items)),
        Value::Object(object) => {
            let Some(items) = wrapped_transactions(&object) else {
                return Err(ClientError::invalid_input_format(
                    "JSON objects must carry a `transactions` array (or `data.transactions`).",
                    "json_object_without_transactions",
                ));
            };
            Ok(collect_json_rows(InputFormat::JsonObject, items))
        }
        _ => Err(ClientError::invalid_input_format(
            "JSON input must be an array of transactions or an object wrapping one.",
            "json_scalar",
        )),
    }
}

fn wrapped_transactions(object: &Map<String, Value>) -> Option<&Vec<Value>> {
    if let Some(items) = object.get("transactions").and_then(Value::as_array) {
        return Some(items);
    }
    object
        .get("data")
        .and_then(Value::as_object)
        .and_then(|data| data.get("transactions"))
        .and_then(Value::as_array)
}

fn collect_json_rows(format: InputFormat, items: &[Value]) -> ParsedInput {
    let mut parsed = ParsedInput::new(format);
    for (index, item) in items.iter().enumerate() {
        let row = index + 1;
        match item.as_object() {
            Some(object) => parsed.push(row, transaction_from_object(object)),
            None => {
                debug!(row, "transaction entry is not an object");
                parsed.unreadable_rows.push(row);
            }
        }
    }
    parsed
}

fn transaction_from_object(object: &Map<String, Value>) -> Transaction {
    Transaction {
        datetime: read_optional_string(object.get("datetime")),
        ts: read_optional_string(object.get("ts")),
        merchant: object.get("merchant").and_then(read_merchant),
        price: object.get("price").and_then(read_price),
        products: object.get("products").and_then(read_products),
    }
}

fn read_merchant(value: &Value) -> Option<Merchant> {
    match value {
        Value::Object(object) => Some(Merchant {
            id: object.get("id").and_then(read_optional_integer),
            name: read_optional_string(object.get("name")),
        }),
        Value::String(name) => Some(Merchant {
            id: None,
            name: Some(name.clone()),
        }),
        _ => None,
    }
}

fn read_price(value: &Value) -> Option<Price> {
    match value {
        Value::Object(object) => Some(Price {
            total: read_optional_string(object.get("total")),
        }),
        Value::Null => None,
        other => Some(Price {
            total: read_optional_string(Some(other)),
        }),
    }
}

fn read_products(value: &Value) -> Option<Vec<Product>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|object| Product {
                external_id: read_optional_string(object.get("external_id")),
                name: read_optional_string(object.get("name")),
            })
            .collect(),
    )
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    let current = value?;

    match current {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn read_optional_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn parse_csv(content: &str) -> ClientResult<ParsedInput> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| {
            ClientError::invalid_input_format(
                &format!("CSV header row is missing or unreadable: {error}"),
                "csv",
            )
        })?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers) {
        return Err(ClientError::input_schema_mismatch(
            required_header_names(),
            optional_header_names(),
            headers,
        ));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.to_string(), index))
        .collect::<HashMap<String, usize>>();

    let mut parsed = ParsedInput::new(InputFormat::Csv);
    for (row_index, result_row) in reader.records().enumerate() {
        let row = row_index + 1;
        let record = match result_row {
            Ok(record) => record,
            Err(error) => {
                debug!(row, %error, "csv row is malformed");
                parsed.unreadable_rows.push(row);
                continue;
            }
        };

        parsed.push(row, transaction_from_record(&record, &index_by_name));
    }

    Ok(parsed)
}

fn transaction_from_record(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
) -> Transaction {
    let merchant_name = value_for(record, index_by_name, "merchant_name");
    let merchant_id = value_for(record, index_by_name, "merchant_id")
        .and_then(|value| value.trim().parse::<i64>().ok());
    let product_id = value_for(record, index_by_name, "product_external_id");
    let product_name = value_for(record, index_by_name, "product_name");

    let products = if product_id.is_some() || product_name.is_some() {
        Some(vec![Product {
            external_id: product_id,
            name: product_name,
        }])
    } else {
        None
    };

    Transaction {
        datetime: value_for(record, index_by_name, "datetime"),
        ts: None,
        merchant: if merchant_name.is_some() || merchant_id.is_some() {
            Some(Merchant {
                id: merchant_id,
                name: merchant_name,
            })
        } else {
            None
        },
        price: value_for(record, index_by_name, "price_total").map(|total| Price {
            total: Some(total),
        }),
        products,
    }
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    let value = record.get(*index)?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn looks_like_ndjson(content: &str) -> bool {
    let lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>();
    if lines.len() < 2 {
        return false;
    }

    lines.iter().all(|line| {
        serde_json::from_str::<Value>(line.trim())
            .map(|value| value.is_object())
            .unwrap_or(false)
    })
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}

fn headers_are_valid(actual_headers: &[String]) -> bool {
    let has_required = REQUIRED_CSV_HEADERS
        .iter()
        .all(|required| actual_headers.iter().any(|value| value == required));
    let all_known = actual_headers.iter().all(|header| {
        REQUIRED_CSV_HEADERS.contains(&header.as_str())
            || OPTIONAL_CSV_HEADERS.contains(&header.as_str())
    });
    has_required && all_known
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{InputFormat, parse_transactions};

    #[test]
    fn json_array_keeps_nested_shape() {
        let parsed = parse_transactions(
            r#"[
                {"datetime": "2026-01-05T10:00:00Z",
                 "merchant": {"id": 44, "name": "Amazon"},
                 "price": {"total": "24.50"},
                 "products": [{"external_id": "B07COFFEE", "name": "Coffee"}]},
                {"ts": "2026-01-06", "merchant": "Spotify", "price": {"total": 9.99}}
            ]"#,
        );
        assert!(parsed.is_ok());
        if let Ok(input) = parsed {
            assert_eq!(input.format, InputFormat::JsonArray);
            assert_eq!(input.transactions.len(), 2);
            assert_eq!(input.source_rows, vec![1, 2]);

            let first = &input.transactions[0];
            assert_eq!(first.merchant_name(), Some("Amazon"));
            assert_eq!(
                first.first_product().and_then(|product| product.stable_id()),
                Some("B07COFFEE")
            );
            assert_eq!(first.total_amount(), Some(dec!(24.50)));

            let second = &input.transactions[1];
            assert_eq!(second.timestamp(), Some("2026-01-06"));
            assert_eq!(second.merchant_name(), Some("Spotify"));
            assert_eq!(second.total_amount(), Some(dec!(9.99)));
        }
    }

    #[test]
    fn json_object_wrappers_are_accepted() {
        let direct = parse_transactions(r#"{"transactions": [{"merchant": {"name": "Netflix"}}]}"#);
        assert!(matches!(direct, Ok(ref input) if input.format == InputFormat::JsonObject));

        let nested = parse_transactions(
            r#"{"data": {"transactions": [{"merchant": {"name": "Netflix"}}, 7]}}"#,
        );
        assert!(nested.is_ok());
        if let Ok(input) = nested {
            assert_eq!(input.transactions.len(), 1);
            assert_eq!(input.unreadable_rows, vec![2]);
        }
    }

    #[test]
    fn json_object_without_transactions_is_rejected() {
        let parsed = parse_transactions(r#"{"items": []}"#);
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "invalid_input_format");
            assert_eq!(
                error
                    .data
                    .as_ref()
                    .and_then(|data| data.get("received_format"))
                    .and_then(|value| value.as_str()),
                Some("json_object_without_transactions")
            );
        }
    }

    #[test]
    fn ndjson_and_empty_input_are_rejected() {
        let ndjson = parse_transactions("{\"datetime\": \"2026-01-01\"}\n{\"datetime\": \"2026-01-02\"}");
        assert!(matches!(ndjson, Err(ref error) if error.code == "invalid_input_format"));

        let empty = parse_transactions("   ");
        assert!(matches!(empty, Err(ref error) if error.code == "invalid_input_format"));

        let broken = parse_transactions("[{\"datetime\": ");
        assert!(matches!(broken, Err(ref error) if error.code == "invalid_input_format"));
    }

    #[test]
    fn csv_rows_become_transactions() {
        let parsed = parse_transactions(
            "datetime,merchant_id,merchant_name,price_total,product_external_id,product_name\n\
             2026-01-05T10:00:00Z,44,Amazon,24.50,B07COFFEE,Coffee\n\
             2026-01-06,,Spotify,9.99,,\n",
        );
        assert!(parsed.is_ok());
        if let Ok(input) = parsed {
            assert_eq!(input.format, InputFormat::Csv);
            assert_eq!(input.transactions.len(), 2);

            let amazon = &input.transactions[0];
            assert_eq!(amazon.merchant.as_ref().and_then(|m| m.id), Some(44));
            assert_eq!(
                amazon.first_product().and_then(|product| product.name.as_deref()),
                Some("Coffee")
            );

            let spotify = &input.transactions[1];
            assert!(spotify.products.is_none());
            assert_eq!(spotify.total_amount(), Some(dec!(9.99)));
        }
    }

    #[test]
    fn csv_with_only_required_headers_is_accepted() {
        let parsed = parse_transactions("merchant_name,datetime\nNetflix,2026-02-01\n");
        assert!(parsed.is_ok());
        if let Ok(input) = parsed {
            assert_eq!(input.transactions[0].merchant_name(), Some("Netflix"));
            assert_eq!(input.transactions[0].timestamp(), Some("2026-02-01"));
        }
    }

    #[test]
    fn csv_header_mismatch_reports_schema() {
        let parsed = parse_transactions("posted_at,merchant_name\n2026-01-01,Netflix\n");
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "input_schema_mismatch");
            let actual = error
                .data
                .as_ref()
                .and_then(|data| data.get("actual_headers"))
                .cloned();
            assert_eq!(actual, Some(serde_json::json!(["posted_at", "merchant_name"])));
        }
    }

    #[test]
    fn malformed_csv_rows_are_unreadable_not_fatal() {
        let parsed = parse_transactions(
            "datetime,merchant_name\n2026-01-01,Netflix\n2026-01-02,Netflix,extra\n2026-01-31,Netflix\n",
        );
        assert!(parsed.is_ok());
        if let Ok(input) = parsed {
            assert_eq!(input.transactions.len(), 2);
            assert_eq!(input.unreadable_rows, vec![2]);
            assert_eq!(input.source_rows, vec![1, 3]);
        }
    }
}
