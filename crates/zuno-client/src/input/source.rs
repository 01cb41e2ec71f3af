use std::fs;
use std::io::{IsTerminal, Read};

use tracing::debug;

use crate::input::invalid_source_error;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub source_kind: SourceKind,
    pub source_ref: Option<String>,
    pub content: String,
}

impl ResolvedSource {
    /// `stdin`, or the file path as given.
    pub fn label(&self) -> &str {
        self.source_ref
            .as_deref()
            .unwrap_or(self.source_kind.as_str())
    }
}

/// Picks exactly one of a file path or piped stdin.
///
/// `stdin_override` replaces the real stdin and is how tests feed input.
pub fn resolve_source(
    path: Option<String>,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    let stdin_body = read_stdin(stdin_override)?;

    if let Some(path_value) = path {
        if path_value == "-" {
            if let Some(stdin_value) = stdin_body {
                return Ok(stdin_source(stdin_value));
            }

            return Err(invalid_source_error(
                "Path `-` means stdin input, but stdin was empty. Pipe JSON/CSV input or pass a file path.",
            ));
        }

        if stdin_body.is_some() {
            return Err(invalid_source_error(
                "Both stdin and file input were provided. Pass exactly one source: either a file path or piped stdin.",
            ));
        }

        let file_body = fs::read_to_string(&path_value)
            .map_err(|error| ClientError::input_unreadable(&path_value, &error.to_string()))?;
        debug!(path = %path_value, bytes = file_body.len(), "read transaction file");

        return Ok(ResolvedSource {
            source_kind: SourceKind::File,
            source_ref: Some(path_value),
            content: file_body,
        });
    }

    if let Some(stdin_value) = stdin_body {
        return Ok(stdin_source(stdin_value));
    }

    Err(invalid_source_error(
        "No transaction source provided. Pass a file path or pipe input via stdin.",
    ))
}

fn stdin_source(content: String) -> ResolvedSource {
    debug!(bytes = content.len(), "read transactions from stdin");
    ResolvedSource {
        source_kind: SourceKind::Stdin,
        source_ref: None,
        content,
    }
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value).filter(|body| !body.trim().is_empty()));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| ClientError::input_unreadable("stdin", &error.to_string()))?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(buffer))
}
