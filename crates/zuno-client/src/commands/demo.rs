use crate::ClientResult;
use crate::audit::recurring::CandidateSort;
use crate::audit::sample::sample_transactions;
use crate::commands::audit::{AuditRequest, build_audit_data, resolve_now};
use crate::config::AuditSettings;
use crate::contracts::envelope::{SuccessEnvelope, success};

/// Wide enough to cover the six months of bundled streaming charges.
pub const DEMO_LOOKBACK_DAYS: u32 = 180;

pub const DEMO_SOURCE: &str = "sample";

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_at(None)
}

#[doc(hidden)]
pub fn run_at(now: Option<&str>) -> ClientResult<SuccessEnvelope> {
    let now = resolve_now(now, "demo audit")?;
    let transactions = sample_transactions(now);
    let settings = AuditSettings {
        lookback_days: Some(DEMO_LOOKBACK_DAYS),
        ..AuditSettings::default()
    };

    let data = build_audit_data(AuditRequest {
        source: DEMO_SOURCE,
        input_format: None,
        transactions: &transactions,
        source_rows: &[],
        unreadable_rows: &[],
        now,
        settings,
        sort: CandidateSort::Input,
    })?;

    success("demo audit", data)
}
