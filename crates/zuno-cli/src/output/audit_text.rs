use std::io;

use serde_json::Value;

use super::format::{self, Column, key_value_rows};

const SKIP_REASONS: [(&str, &str); 5] = [
    ("missing_datetime", "no datetime"),
    ("invalid_datetime", "unparseable datetime"),
    ("missing_merchant", "no merchant name"),
    ("outside_lookback", "older than lookback"),
    ("unreadable", "unreadable row"),
];

pub fn render_audit(data: &Value) -> io::Result<String> {
    let candidates = data
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("audit output requires candidates"))?;
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("audit output requires summary"))?;

    let mut lines = vec![audit_heading(candidates.len(), data), String::new()];

    if candidates.is_empty() {
        lines.push("No recurring charges found.".to_string());
        lines.push(String::new());
        lines.push("A subscription needs at least two charges from the same merchant".to_string());
        lines.push("(or the same product) inside the lookback window.".to_string());
    } else {
        lines.push("Subscriptions:".to_string());
        lines.extend(format::render_table_or_blocks(
            &candidate_columns(),
            &candidates.iter().map(candidate_cells).collect::<Vec<_>>(),
            format::terminal_width(),
            "Subscription",
        ));
        lines.push(String::new());
        lines.push("Estimated spend:".to_string());
        lines.extend(key_value_rows(
            &[
                ("Monthly:", dollars(summary.get("estimated_monthly_cost"))),
                ("Annual:", dollars(summary.get("estimated_annual_cost"))),
                (
                    "Potential savings:",
                    dollars(summary.get("estimated_potential_savings")),
                ),
            ],
            2,
        ));
    }

    lines.extend(skipped_section(data));

    lines.push(String::new());
    lines.push(format!(
        "Costs use the `{}` strategy under policy {}.",
        text_field(data, "cost_strategy"),
        text_field(data, "policy_version")
    ));
    if let Some(first) = candidates.first() {
        lines.push(format!("Next step: {}", cancel_hint(first)));
    }

    Ok(lines.join("\n"))
}

fn audit_heading(count: usize, data: &Value) -> String {
    let noun = if count == 1 {
        "subscription"
    } else {
        "subscriptions"
    };
    let window = match data.get("lookback_days").and_then(Value::as_u64) {
        Some(days) => format!("last {days} days"),
        None => "all history".to_string(),
    };
    let as_of = text_field(data, "now");
    let as_of_date = as_of.get(..10).unwrap_or(&as_of);
    format!("Subscription audit: {count} potential {noun} ({window}, as of {as_of_date})")
}

fn candidate_columns() -> [Column<'static>; 7] {
    [
        Column::left("Subscription"),
        Column::left("Type"),
        Column::left("Frequency"),
        Column::right("Charges"),
        Column::right("Avg gap"),
        Column::left("Risk"),
        Column::right("Est. monthly"),
    ]
}

fn candidate_cells(row: &Value) -> Vec<String> {
    let title = text_field(row, "title");
    let title = match row.get("product_name").and_then(Value::as_str) {
        Some(_) => format!("{title} ({})", text_field(row, "merchant")),
        None => title,
    };
    let avg_gap = row
        .get("avg_gap_days")
        .and_then(Value::as_f64)
        .map(|days| format!("{days:.1}d"))
        .unwrap_or_else(|| "-".to_string());

    vec![
        title,
        text_field(row, "subscription_type")
            .trim_end_matches(" Subscription")
            .to_string(),
        text_field(row, "frequency_label"),
        row.get("occurrences")
            .and_then(Value::as_u64)
            .map(|count| count.to_string())
            .unwrap_or_else(|| "-".to_string()),
        avg_gap,
        text_field(row, "risk_level"),
        dollars(row.get("estimated_monthly_cost")),
    ]
}

fn skipped_section(data: &Value) -> Vec<String> {
    let Some(skipped) = data.get("skipped") else {
        return Vec::new();
    };
    let total = skipped.get("total").and_then(Value::as_u64).unwrap_or(0);
    if total == 0 {
        return Vec::new();
    }

    let input_rows = data.get("input_rows").and_then(Value::as_u64).unwrap_or(0);
    let entries = SKIP_REASONS
        .iter()
        .filter_map(|(key, label)| {
            let count = skipped.get(*key).and_then(Value::as_u64).unwrap_or(0);
            (count > 0).then(|| (*label, count.to_string()))
        })
        .collect::<Vec<(&str, String)>>();

    let mut lines = vec![
        String::new(),
        format!("Skipped {total} of {input_rows} transactions:"),
    ];
    lines.extend(key_value_rows(&entries, 2));
    lines
}

fn cancel_hint(row: &Value) -> String {
    let merchant = text_field(row, "merchant");
    match row.get("product_name").and_then(Value::as_str) {
        Some(product) => format!("zuno cancel \"{merchant}\" --product \"{product}\""),
        None => format!("zuno cancel \"{merchant}\""),
    }
}

fn dollars(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str) {
        Some(amount) if amount.starts_with('-') => format!("-${}", &amount[1..]),
        Some(amount) => format!("${amount}"),
        None => "-".to_string(),
    }
}

fn text_field(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}
