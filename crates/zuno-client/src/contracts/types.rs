use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AuditData {
    pub policy_version: String,
    /// `stdin`, the file path, or `sample` for the demo.
    pub source: String,
    pub input_format: Option<String>,
    pub now: String,
    pub lookback_days: Option<u32>,
    pub cost_strategy: String,
    pub merchant_normalization: String,
    pub sort: String,
    pub input_rows: usize,
    /// Rows left after the lookback filter.
    pub total_transactions: usize,
    pub considered_transactions: usize,
    pub skipped: SkippedCounts,
    pub skipped_rows: Vec<SkippedRow>,
    pub candidates: Vec<CandidateRow>,
    pub summary: SummaryRow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkippedCounts {
    pub total: usize,
    pub missing_datetime: usize,
    pub invalid_datetime: usize,
    pub missing_merchant: usize,
    pub outside_lookback: usize,
    pub unreadable: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateRow {
    pub key: String,
    pub title: String,
    pub merchant: String,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub subscription_type: String,
    pub occurrences: usize,
    pub avg_gap_days: f64,
    pub frequency_label: String,
    pub risk_level: String,
    pub first_seen: String,
    pub last_seen: String,
    pub average_total: Option<Decimal>,
    pub estimated_monthly_cost: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub total_candidates: usize,
    pub estimated_monthly_cost: Decimal,
    pub estimated_annual_cost: Decimal,
    pub estimated_potential_savings: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelData {
    pub merchant: String,
    pub product: Option<String>,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub mailto: String,
}
