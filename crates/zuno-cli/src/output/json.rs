use std::io;

use serde::Serialize;
use serde_json::{Value, json};
use zuno_client::{ClientError, SuccessEnvelope};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        "audit" | "demo audit" | "cancel" => json!({
            "ok": true,
            "version": JSON_VERSION,
            "command": success.command,
            "data": success.data,
        }),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let mut payload = json!({
        "error": {
            "code": error.code,
            "message": error.message,
            "recovery_steps": error.recovery_steps,
        }
    });
    if let (Some(data), Some(object)) = (error.data.as_ref(), payload.as_object_mut()) {
        object.insert("data".to_string(), data.clone());
    }
    serialize_json_pretty(&payload)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use zuno_client::{ClientError, SuccessEnvelope};

    use super::{render_error_json, render_success_json};

    fn success(command: &str, data: Value) -> SuccessEnvelope {
        SuccessEnvelope {
            ok: true,
            command: command.to_string(),
            version: "0.1.0".to_string(),
            data,
        }
    }

    fn parse(text: &str) -> Value {
        let parsed: Result<Value, _> = serde_json::from_str(text);
        assert!(parsed.is_ok());
        parsed.unwrap_or(Value::Null)
    }

    #[test]
    fn audit_json_uses_versioned_envelope() {
        let payload = success(
            "audit",
            json!({ "candidates": [], "summary": { "total_candidates": 0 } }),
        );

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let value = parse(&text);
            assert_eq!(value["ok"], Value::Bool(true));
            assert_eq!(value["version"], "v1");
            assert_eq!(value["command"], "audit");
            assert_eq!(value["data"]["summary"]["total_candidates"], 0);
        }
    }

    #[test]
    fn unknown_command_is_an_output_error() {
        let rendered = render_success_json(&success("export", json!({})));
        assert!(rendered.is_err());
    }

    #[test]
    fn error_json_carries_code_and_data() {
        let error = ClientError::config_invalid("ZUNO_LOOKBACK_DAYS", "soon", "a positive integer");
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let value = parse(&text);
            assert_eq!(value["error"]["code"], "config_invalid");
            assert_eq!(value["data"]["variable"], "ZUNO_LOOKBACK_DAYS");
            assert!(value.get("ok").is_none());
        }
    }
}
