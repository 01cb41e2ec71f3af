use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

const EXPECTED_ROOT_HELP: &str = "Zuno - find the subscriptions hiding in your purchase history

Usage:
  zuno <command>

Start here:
  zuno demo audit
  zuno audit --help
";

const NETFLIX_ROWS: &str = r#"[
  {"datetime": "2026-01-01T09:00:00Z", "merchant": {"id": 7, "name": "Netflix"}, "price": {"total": "15.49"}},
  {"datetime": "2026-01-31T09:00:00Z", "merchant": {"id": 7, "name": "Netflix"}, "price": {"total": "15.49"}},
  {"datetime": "2026-03-02T09:00:00Z", "merchant": {"id": 7, "name": "Netflix"}, "price": {"total": "15.49"}},
  {"datetime": "2026-02-14T18:00:00Z", "merchant": {"id": 9, "name": "Target"}, "price": {"total": "54.10"}}
]"#;

struct CliOutput {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn run_cli_with(args: &[&str], input: Option<&str>, env: &[(&str, &str)]) -> CliOutput {
    let mut command = Command::new(env!("CARGO_BIN_EXE_zuno"));
    command.args(args);
    for variable in [
        "RUST_LOG",
        "ZUNO_LOOKBACK_DAYS",
        "ZUNO_COST_STRATEGY",
        "ZUNO_MERCHANT_NORMALIZATION",
    ] {
        command.env_remove(variable);
    }
    for (key, value) in env {
        command.env(key, value);
    }
    command.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let child_spawn = command.spawn();
    assert!(child_spawn.is_ok());
    if let Ok(mut child) = child_spawn {
        if let Some(body) = input
            && let Some(mut pipe) = child.stdin.take()
        {
            let write_result = pipe.write_all(body.as_bytes());
            assert!(write_result.is_ok());
        }

        let output = child.wait_with_output();
        assert!(output.is_ok());
        if let Ok(result) = output {
            return CliOutput {
                code: result.status.code(),
                stdout: String::from_utf8_lossy(&result.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            };
        }
    }

    CliOutput {
        code: None,
        stdout: String::new(),
        stderr: String::new(),
    }
}

fn run_cli(args: &[&str]) -> CliOutput {
    run_cli_with(args, None, &[])
}

fn parse_json(text: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(text);
    assert!(parsed.is_ok(), "stdout was not JSON: {text}");
    parsed.unwrap_or(Value::Null)
}

#[test]
fn bare_invocation_prints_root_help() {
    let output = run_cli(&[]);
    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, EXPECTED_ROOT_HELP);
}

#[test]
fn top_level_help_lists_every_command() {
    let output = run_cli(&["--help"]);
    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("zuno demo audit"));
    assert!(output.stdout.contains("zuno audit <path>"));
    assert!(output.stdout.contains("zuno cancel <merchant>"));
}

#[test]
fn audit_help_documents_schema_and_settings() {
    let output = run_cli(&["audit", "--help"]);
    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Transaction schema:"));
    assert!(output.stdout.contains("ZUNO_LOOKBACK_DAYS"));
}

#[test]
fn audit_stdin_json_contract() {
    let output = run_cli_with(
        &["audit", "-", "--now", "2026-03-05", "--json"],
        Some(NETFLIX_ROWS),
        &[],
    );
    assert_eq!(output.code, Some(0));

    let value = parse_json(&output.stdout);
    assert_eq!(value["ok"], Value::Bool(true));
    assert_eq!(value["version"], "v1");
    assert_eq!(value["command"], "audit");

    let data = &value["data"];
    assert_eq!(data["lookback_days"], 90);
    assert_eq!(data["input_format"], "json_array");
    assert_eq!(data["candidates"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["candidates"][0]["key"], "merchant::Netflix");
    assert_eq!(data["candidates"][0]["frequency_label"], "Monthly");
    assert_eq!(data["candidates"][0]["risk_level"], "medium");
    assert_eq!(data["summary"]["estimated_monthly_cost"], "25.00");
    assert_eq!(data["summary"]["estimated_annual_cost"], "300.00");
    assert_eq!(data["summary"]["estimated_potential_savings"], "90.00");
}

#[test]
fn audit_text_output_for_csv_file() {
    let temp = tempfile::Builder::new().prefix("zuno-cli-csv").tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let path = dir.path().join("purchases.csv");
        let body = "datetime,merchant_name,price_total\n\
                    2026-01-01,Netflix,15.49\n\
                    2026-01-31,Netflix,15.49\n\
                    2026-03-02,Netflix,15.49\n\
                    ,Netflix,15.49\n";
        assert!(fs::write(&path, body).is_ok());
        let path_text = path.display().to_string();

        let output = run_cli(&["audit", &path_text, "--now", "2026-03-05"]);
        assert_eq!(output.code, Some(0));
        assert!(output.stdout.starts_with(
            "Subscription audit: 1 potential subscription (last 90 days, as of 2026-03-05)"
        ));
        assert!(output.stdout.contains("Netflix"));
        assert!(output.stdout.contains("Skipped 1 of 4 transactions:"));
        assert!(output.stdout.contains("Next step: zuno cancel \"Netflix\""));
    }
}

#[test]
fn demo_audit_is_reproducible() {
    let args = ["demo", "audit", "--now", "2026-06-01T00:00:00Z", "--json"];
    let first = run_cli(&args);
    let second = run_cli(&args);
    assert_eq!(first.code, Some(0));
    assert_eq!(first.stdout, second.stdout);

    let value = parse_json(&first.stdout);
    assert_eq!(value["command"], "demo audit");
    assert_eq!(value["data"]["source"], "sample");
    assert_eq!(value["data"]["summary"]["total_candidates"], 3);
}

#[test]
fn cancel_text_contains_mailto() {
    let output = run_cli(&["cancel", "Uber Eats", "--user", "Sam"]);
    assert_eq!(output.code, Some(0));
    assert!(output.stdout.starts_with("Cancellation draft for Uber Eats"));
    assert!(output.stdout.contains("support@ubereats.com"));
    assert!(output.stdout.contains("mailto:support@ubereats.com?subject="));
}

#[test]
fn missing_file_is_a_user_error() {
    let output = run_cli(&["audit", "/nonexistent/zuno/purchases.csv"]);
    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("  Error:    input_unreadable"));
    assert!(output.stdout.contains("What to do next:"));
}

#[test]
fn parse_errors_honor_json_flag() {
    let output = run_cli(&["audit", "-", "--sort", "price", "--json"]);
    assert_eq!(output.code, Some(1));
    let value = parse_json(&output.stdout);
    assert_eq!(value["error"]["code"], "invalid_argument");
    assert_eq!(
        value["error"]["recovery_steps"][0],
        "Run `zuno audit --help` for usage."
    );
}

#[test]
fn invalid_environment_is_config_error() {
    let output = run_cli_with(
        &["audit", "-", "--json"],
        Some(NETFLIX_ROWS),
        &[("ZUNO_COST_STRATEGY", "median")],
    );
    assert_eq!(output.code, Some(1));
    let value = parse_json(&output.stdout);
    assert_eq!(value["error"]["code"], "config_invalid");
}

#[test]
fn verbose_logs_go_to_stderr_only() {
    let output = run_cli_with(
        &["audit", "-", "--all-history", "--json", "--verbose"],
        Some(NETFLIX_ROWS),
        &[],
    );
    assert_eq!(output.code, Some(0));
    let value = parse_json(&output.stdout);
    assert_eq!(value["data"]["lookback_days"], Value::Null);
    assert!(output.stderr.contains("subscription audit"));
}
