use zuno_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "The audit could not run.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
        String::new(),
        "What to do next:".to_string(),
    ];

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    }
    lines.extend(
        error
            .recovery_steps
            .iter()
            .enumerate()
            .map(|(index, step)| format!("  {}. {step}", index + 1)),
    );

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use zuno_client::ClientError;

    use super::render_error;

    #[test]
    fn renders_numbered_recovery_steps() {
        let error = ClientError::input_unreadable("purchases.csv", "No such file or directory");

        let rendered = render_error(&error);
        assert!(rendered.starts_with("The audit could not run."));
        assert!(rendered.contains("  Error:    input_unreadable"));
        assert!(rendered.contains("  Details:  Could not read transactions from purchases.csv"));
        assert!(rendered.contains("  1. Verify the path exists and is readable."));
        assert!(rendered.contains("  2. Or pipe transactions on stdin"));
    }

    #[test]
    fn falls_back_to_retry_hint() {
        let error = ClientError::internal_serialization("boom");
        let rendered = render_error(&error);
        assert!(rendered.ends_with("  1. Retry the command."));
    }
}
