pub mod parse;
pub mod source;

pub use parse::{InputFormat, ParsedInput, parse_transactions};
pub use source::{ResolvedSource, SourceKind, resolve_source};

use crate::ClientError;
use crate::error::AUDIT_HELP_COMMAND;

pub const REQUIRED_CSV_HEADERS: [&str; 2] = ["datetime", "merchant_name"];
pub const OPTIONAL_CSV_HEADERS: [&str; 4] = [
    "merchant_id",
    "price_total",
    "product_external_id",
    "product_name",
];

pub fn required_header_names() -> Vec<String> {
    REQUIRED_CSV_HEADERS
        .iter()
        .map(|value| value.to_string())
        .collect()
}

pub fn optional_header_names() -> Vec<String> {
    OPTIONAL_CSV_HEADERS
        .iter()
        .map(|value| value.to_string())
        .collect()
}

pub(crate) fn invalid_source_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide transactions as a file path, or pass `-` and pipe them on stdin.".to_string(),
            format!("Run `{AUDIT_HELP_COMMAND}` to confirm input requirements."),
        ],
    )
}
