use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::audit::cost::{CostStrategy, MonthlyCostEstimator};
use crate::audit::date::{format_iso_date, format_iso_datetime, parse_reference_instant};
use crate::audit::normalize::MerchantNormalization;
use crate::audit::policy::{AUDIT_POLICY_V1, AUDIT_POLICY_VERSION};
use crate::audit::recurring::{
    CandidateSort, RecurrenceCandidate, SkipReason, detect_candidates_with, sort_candidates,
};
use crate::audit::summary::{AuditSummary, summarize_with};
use crate::audit::types::{AuditWindow, Transaction};
use crate::config::{AuditSettings, SettingsOverrides};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AuditData, CandidateRow, SkippedCounts, SkippedRow, SummaryRow};
use crate::input::{InputFormat, parse_transactions, resolve_source};
use crate::{ClientError, ClientResult};

const UNREADABLE_REASON: &str = "unreadable";

#[derive(Debug, Default)]
pub struct AuditRunOptions {
    pub path: Option<String>,
    pub now: Option<String>,
    pub lookback_days: Option<u32>,
    pub all_history: bool,
    pub cost_strategy: Option<String>,
    pub normalize_merchants: bool,
    pub sort: Option<String>,
    pub stdin_override: Option<String>,
    /// Replaces the process environment when resolving settings.
    pub env_override: Option<HashMap<String, String>>,
}

pub fn run(path: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(AuditRunOptions {
        path,
        ..AuditRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: AuditRunOptions) -> ClientResult<SuccessEnvelope> {
    let settings = resolve_settings(&options)?;
    let sort = parse_sort(options.sort.as_deref())?;
    let now = resolve_now(options.now.as_deref(), "audit")?;

    let source = resolve_source(options.path, options.stdin_override)?;
    let parsed = parse_transactions(&source.content)?;

    let data = build_audit_data(AuditRequest {
        source: source.label(),
        input_format: Some(parsed.format),
        transactions: &parsed.transactions,
        source_rows: &parsed.source_rows,
        unreadable_rows: &parsed.unreadable_rows,
        now,
        settings,
        sort,
    })?;

    success("audit", data)
}

pub(crate) fn resolve_now(value: Option<&str>, command: &str) -> ClientResult<DateTime<Utc>> {
    match value {
        Some(raw) => parse_reference_instant(raw, command),
        None => Ok(Utc::now()),
    }
}

fn resolve_settings(options: &AuditRunOptions) -> ClientResult<AuditSettings> {
    let base = match options.env_override.as_ref() {
        Some(env) => AuditSettings::from_lookup(|name| env.get(name).cloned()),
        None => AuditSettings::from_env(),
    }?;

    if options.lookback_days == Some(0) {
        return Err(ClientError::invalid_argument_for_command(
            "`--lookback-days` must be a positive number of days.",
            Some("audit"),
        ));
    }

    let cost_strategy = match options.cost_strategy.as_deref() {
        Some(raw) => Some(CostStrategy::parse(raw).ok_or_else(|| {
            ClientError::invalid_argument_for_command(
                &format!("Unknown cost strategy `{raw}`. Use `flat` or `observed`."),
                Some("audit"),
            )
        })?),
        None => None,
    };

    Ok(base.apply(SettingsOverrides {
        lookback_days: options.lookback_days,
        all_history: options.all_history,
        cost_strategy,
        normalization: options
            .normalize_merchants
            .then_some(MerchantNormalization::Canonical),
    }))
}

fn parse_sort(value: Option<&str>) -> ClientResult<CandidateSort> {
    let Some(raw) = value else {
        return Ok(CandidateSort::default());
    };
    CandidateSort::parse(raw).ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            &format!("Unknown sort `{raw}`. Use input, first-seen, occurrences, risk, or merchant."),
            Some("audit"),
        )
    })
}

pub(crate) struct AuditRequest<'a> {
    pub(crate) source: &'a str,
    pub(crate) input_format: Option<InputFormat>,
    pub(crate) transactions: &'a [Transaction],
    /// Source row per transaction; positions are used when empty.
    pub(crate) source_rows: &'a [usize],
    pub(crate) unreadable_rows: &'a [usize],
    pub(crate) now: DateTime<Utc>,
    pub(crate) settings: AuditSettings,
    pub(crate) sort: CandidateSort,
}

pub(crate) fn build_audit_data(request: AuditRequest<'_>) -> ClientResult<AuditData> {
    let settings = request.settings;
    let window = AuditWindow {
        now: request.now,
        lookback_days: settings.lookback_days,
    };

    let mut detection = detect_candidates_with(
        request.transactions,
        window,
        settings.normalization,
        AUDIT_POLICY_V1,
    );
    sort_candidates(&mut detection.candidates, request.sort);

    let estimator = settings.cost_strategy.estimator();
    let summary = summarize_with(&detection.candidates, estimator.as_ref(), AUDIT_POLICY_V1)
        .ok_or_else(|| ClientError::cost_estimate_overflow(settings.cost_strategy.as_str()))?;

    let candidates = detection
        .candidates
        .iter()
        .map(|candidate| candidate_row(candidate, estimator.as_ref()))
        .collect::<Vec<CandidateRow>>();

    let mut skipped_rows = detection
        .skipped
        .iter()
        .map(|skipped| SkippedRow {
            row: request
                .source_rows
                .get(skipped.index)
                .copied()
                .unwrap_or(skipped.index + 1),
            reason: skipped.reason.as_str().to_string(),
        })
        .chain(request.unreadable_rows.iter().map(|row| SkippedRow {
            row: *row,
            reason: UNREADABLE_REASON.to_string(),
        }))
        .collect::<Vec<SkippedRow>>();
    skipped_rows.sort_by_key(|row| row.row);

    let skipped = SkippedCounts {
        total: skipped_rows.len(),
        missing_datetime: detection.skipped_count(SkipReason::MissingDatetime),
        invalid_datetime: detection.skipped_count(SkipReason::InvalidDatetime),
        missing_merchant: detection.skipped_count(SkipReason::MissingMerchant),
        outside_lookback: detection.skipped_count(SkipReason::OutsideLookback),
        unreadable: request.unreadable_rows.len(),
    };

    info!(
        source = request.source,
        candidates = candidates.len(),
        skipped = skipped.total,
        cost_strategy = settings.cost_strategy.as_str(),
        "subscription audit completed"
    );

    Ok(AuditData {
        policy_version: AUDIT_POLICY_VERSION.to_string(),
        source: request.source.to_string(),
        input_format: request
            .input_format
            .map(|format| format.as_str().to_string()),
        now: format_iso_datetime(&request.now),
        lookback_days: settings.lookback_days,
        cost_strategy: settings.cost_strategy.as_str().to_string(),
        merchant_normalization: settings.normalization.as_str().to_string(),
        sort: request.sort.as_str().to_string(),
        input_rows: request.transactions.len() + request.unreadable_rows.len(),
        total_transactions: request
            .transactions
            .len()
            .saturating_sub(skipped.outside_lookback),
        considered_transactions: detection.considered,
        skipped,
        skipped_rows,
        candidates,
        summary: summary_row(&summary),
    })
}

fn candidate_row(
    candidate: &RecurrenceCandidate,
    estimator: &dyn MonthlyCostEstimator,
) -> CandidateRow {
    CandidateRow {
        key: candidate.key.clone(),
        title: candidate.display_title().to_string(),
        merchant: candidate.merchant.clone(),
        product_id: candidate.product_id.clone(),
        product_name: candidate.product_name.clone(),
        subscription_type: candidate.scope.subscription_type().to_string(),
        occurrences: candidate.occurrences,
        avg_gap_days: candidate.avg_gap_days,
        frequency_label: candidate.frequency_label.as_str().to_string(),
        risk_level: candidate.risk_level.as_str().to_string(),
        first_seen: format_iso_date(&candidate.first_seen_at),
        last_seen: format_iso_date(&candidate.last_seen_at),
        average_total: candidate.average_total.map(money),
        estimated_monthly_cost: money(estimator.estimate_monthly_cost(candidate)),
    }
}

fn summary_row(summary: &AuditSummary) -> SummaryRow {
    SummaryRow {
        total_candidates: summary.total_candidates,
        estimated_monthly_cost: money(summary.estimated_monthly_cost),
        estimated_annual_cost: money(summary.estimated_annual_cost),
        estimated_potential_savings: money(summary.estimated_potential_savings),
    }
}

/// Two decimal places, half away from zero, always rendered with both digits.
pub(crate) fn money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
