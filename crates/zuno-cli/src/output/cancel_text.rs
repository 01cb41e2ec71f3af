use std::io;

use serde_json::Value;

use super::format::key_value_rows;

pub fn render_cancel(data: &Value) -> io::Result<String> {
    let field = |name: &str| -> io::Result<String> {
        data.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| io::Error::other(format!("cancel output requires `{name}`")))
    };

    let merchant = field("merchant")?;
    let target = data
        .get("product")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| merchant.clone());

    let mut lines = vec![format!("Cancellation draft for {target}"), String::new()];
    lines.extend(key_value_rows(
        &[("To:", field("recipient")?), ("Subject:", field("subject")?)],
        2,
    ));
    lines.push(String::new());
    lines.extend(field("body")?.lines().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("  {line}")
        }
    }));
    lines.push(String::new());
    lines.push("Open in your mail client:".to_string());
    lines.push(format!("  {}", field("mailto")?));

    Ok(lines.join("\n"))
}
