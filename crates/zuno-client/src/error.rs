use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const AUDIT_HELP_COMMAND: &str = "zuno audit --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_audit_help_data(self, data: Value) -> Self {
        self.with_data(merge_audit_help_data(data))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `zuno {cmd} --help` for usage."),
            None => "Run `zuno --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_input_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_input_format",
            message,
            vec![
                "Provide a JSON array of transactions, a JSON object with a `transactions` array, or CSV.".to_string(),
                format!("Run `{AUDIT_HELP_COMMAND}` to confirm field requirements."),
            ],
        )
        .with_audit_help_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "json_object", "csv"],
        }))
    }

    pub fn input_schema_mismatch(
        required_headers: Vec<String>,
        optional_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        let mut expected_headers = required_headers.clone();
        expected_headers.extend(optional_headers.clone());

        Self::new(
            "input_schema_mismatch",
            "CSV headers do not satisfy the transaction schema.",
            vec![
                "Include all required headers; optional headers may be omitted.".to_string(),
                "Do not include unknown headers.".to_string(),
                format!("Run `{AUDIT_HELP_COMMAND}` to review required and optional fields."),
            ],
        )
        .with_audit_help_data(json!({
            "required_headers": required_headers,
            "optional_headers": optional_headers,
            "expected_headers": expected_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn input_unreadable(source: &str, detail: &str) -> Self {
        Self::new(
            "input_unreadable",
            &format!("Could not read transactions from {source}: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Or pipe transactions on stdin and pass `-` as the path.".to_string(),
            ],
        )
        .with_audit_help_data(json!({
            "source": source,
        }))
    }

    pub fn config_invalid(variable: &str, value: &str, expected: &str) -> Self {
        Self::new(
            "config_invalid",
            &format!("Environment variable `{variable}` has invalid value `{value}`."),
            vec![
                format!("Set `{variable}` to {expected}, or unset it to use the default."),
                "Command-line flags override environment settings.".to_string(),
            ],
        )
        .with_data(json!({
            "variable": variable,
            "value": value,
            "expected": expected,
        }))
    }

    pub fn cost_estimate_overflow(cost_strategy: &str) -> Self {
        Self::new(
            "cost_estimate_overflow",
            "Estimated subscription costs exceed the supported numeric range.",
            vec![
                "Check `price.total` values for misplaced digits or unit mistakes.".to_string(),
                "Rerun with `--cost-strategy flat` to estimate without observed amounts."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "cost_strategy": cost_strategy,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

fn merge_audit_help_data(mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(AUDIT_HELP_COMMAND.to_string()),
        );
    }

    data
}

pub type ClientResult<T> = Result<T, ClientError>;
