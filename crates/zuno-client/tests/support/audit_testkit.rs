#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::{Builder, TempDir};
use zuno_client::commands::audit::{self, AuditRunOptions};

pub const FIXED_NOW: &str = "2026-07-01T00:00:00Z";

pub fn temp_dir_in_tmp(prefix: &str) -> std::io::Result<TempDir> {
    Builder::new().prefix(prefix).tempdir_in("/tmp")
}

pub fn transaction(
    datetime: &str,
    merchant: &str,
    total: &str,
    product: Option<(&str, &str)>,
) -> Value {
    let mut row = json!({
        "datetime": datetime,
        "merchant": { "id": 1, "name": merchant },
        "price": { "total": total },
    });
    if let Some((external_id, name)) = product {
        row["products"] = json!([{ "external_id": external_id, "name": name }]);
    }
    row
}

/// Options that read `rows` from stdin with an empty environment and a
/// lookback wide enough for every fixture.
pub fn options_for(rows: &[Value]) -> AuditRunOptions {
    AuditRunOptions {
        path: Some("-".to_string()),
        now: Some(FIXED_NOW.to_string()),
        all_history: true,
        stdin_override: Some(Value::Array(rows.to_vec()).to_string()),
        env_override: Some(HashMap::new()),
        ..AuditRunOptions::default()
    }
}

pub fn audit_payload(options: AuditRunOptions) -> Value {
    let result = audit::run_with_options(options);
    assert!(result.is_ok());
    if let Ok(success) = result {
        let payload = serde_json::to_value(success);
        assert!(payload.is_ok());
        if let Ok(value) = payload {
            return value;
        }
    }
    Value::Null
}

pub fn run_scenario(rows: &[Value]) -> Value {
    audit_payload(options_for(rows))
}

pub fn candidates(payload: &Value) -> Vec<Value> {
    payload["data"]["candidates"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

pub fn candidate_exists(rows: &[Value], key: &str, frequency: &str, risk: &str) -> bool {
    rows.iter().any(|row| {
        row.get("key").and_then(Value::as_str) == Some(key)
            && row.get("frequency_label").and_then(Value::as_str) == Some(frequency)
            && row.get("risk_level").and_then(Value::as_str) == Some(risk)
    })
}

pub fn write_fixture(base: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    let path = base.join(name);
    fs::write(&path, body)?;
    Ok(path)
}
