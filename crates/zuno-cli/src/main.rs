mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use zuno_client::ClientError;

const ROOT_HELP: &str = "Zuno - find the subscriptions hiding in your purchase history

Usage:
  zuno <command>

Start here:
  zuno demo audit
  zuno audit --help
";

const TOP_LEVEL_HELP: &str = "Zuno - find the subscriptions hiding in your purchase history

USAGE: zuno <command>

Try it:
  zuno demo audit                                 Audit bundled sample purchases

Audit your purchases:
  1. zuno audit --help                            Read the transaction schema and settings
  2. zuno audit <path>                            Audit a JSON or CSV export
     cat purchases.json | zuno audit -            Audit purchases piped on stdin

Act on a finding:
  zuno cancel <merchant> [--product <name>]       Draft a cancellation email

Every command accepts --json for machine-readable output,
and --verbose to log analyzer decisions to stderr.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };

    init_logging(cli.verbose);
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            return Ok(ExitCode::SUCCESS);
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let command_hint = if matches!(
        err.kind(),
        ErrorKind::MissingRequiredArgument
            | ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::UnknownArgument
            | ErrorKind::ArgumentConflict
            | ErrorKind::InvalidSubcommand
    ) {
        command_path_from_args(raw_args)
    } else {
        None
    };
    let clean_message = strip_clap_boilerplate(&err.to_string());
    let parse_error = ClientError::invalid_argument_for_command(&clean_message, command_hint);
    let mode = infer_requested_output_mode(raw_args);
    if output::print_failure(&parse_error, mode).is_err() {
        return Err(ExitCode::from(2));
    }
    Err(ExitCode::from(1))
}

/// Priority: `RUST_LOG` > `--verbose` > warnings only. Logs go to stderr so
/// stdout stays parseable.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines so the
/// "What to do next" section is the only guidance shown.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    let non_flags = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<&str>>();

    match non_flags.as_slice() {
        ["audit", ..] => Some("audit"),
        ["demo", "audit", ..] => Some("demo audit"),
        ["demo", ..] => Some("demo"),
        ["cancel", ..] => Some("cancel"),
        _ => None,
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.code.starts_with("internal_") {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}
