use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let json_data = serde_json::to_value(data)
        .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data: json_data,
    })
}

pub fn failure_from_error(error: &ClientError) -> FailureEnvelope {
    FailureEnvelope {
        ok: false,
        error: ErrorContract {
            code: error.code.clone(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
        },
        data: error.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::ClientError;

    use super::{failure_from_error, success};

    #[test]
    fn success_wraps_data_with_command_and_version() {
        let envelope = success("cancel", json!({ "merchant": "Netflix" }));
        assert!(envelope.is_ok());
        if let Ok(value) = envelope {
            assert!(value.ok);
            assert_eq!(value.command, "cancel");
            assert_eq!(value.version, crate::API_VERSION);
            assert_eq!(value.data["merchant"], "Netflix");
        }
    }

    #[test]
    fn failure_carries_error_fields_and_data() {
        let error = ClientError::config_invalid("ZUNO_COST_STRATEGY", "median", "`flat`");
        let envelope = failure_from_error(&error);
        assert!(!envelope.ok);
        assert_eq!(envelope.error.code, "config_invalid");
        assert_eq!(envelope.error.recovery_steps.len(), 2);
        assert_eq!(
            envelope.data.as_ref().and_then(|data| data.get("variable")),
            Some(&json!("ZUNO_COST_STRATEGY"))
        );
    }
}
