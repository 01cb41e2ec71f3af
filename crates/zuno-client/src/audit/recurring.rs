use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::audit::cadence::{FrequencyLabel, RiskLevel};
use crate::audit::date::{days_between, lookback_cutoff, parse_transaction_datetime};
use crate::audit::normalize::{GroupKey, GroupScope, MerchantNormalization};
use crate::audit::policy::{AUDIT_POLICY_V1, AuditPolicy};
use crate::audit::types::{AuditWindow, Product, Transaction};

#[derive(Debug, Clone)]
pub struct RecurrenceCandidate {
    pub key: String,
    pub scope: GroupScope,
    pub merchant: String,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub occurrences: usize,
    pub avg_gap_days: f64,
    pub frequency_label: FrequencyLabel,
    pub risk_level: RiskLevel,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub average_total: Option<Decimal>,
}

impl RecurrenceCandidate {
    /// Product name when the group is product-scoped, merchant otherwise.
    pub fn display_title(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.merchant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingDatetime,
    InvalidDatetime,
    MissingMerchant,
    OutsideLookback,
}

impl SkipReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingDatetime => "missing_datetime",
            Self::InvalidDatetime => "invalid_datetime",
            Self::MissingMerchant => "missing_merchant",
            Self::OutsideLookback => "outside_lookback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedTransaction {
    /// Zero-based position in the analyzer input.
    pub index: usize,
    pub reason: SkipReason,
}

/// A transaction that survived validation and the lookback window.
#[derive(Debug, Clone)]
pub struct ValidTransaction {
    pub index: usize,
    pub occurred_at: DateTime<Utc>,
    pub key: GroupKey,
    pub product_name: Option<String>,
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct CandidateDetection {
    pub candidates: Vec<RecurrenceCandidate>,
    pub considered: usize,
    pub skipped: Vec<SkippedTransaction>,
}

impl CandidateDetection {
    pub fn skipped_count(&self, reason: SkipReason) -> usize {
        self.skipped
            .iter()
            .filter(|skipped| skipped.reason == reason)
            .count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CandidateSort {
    /// Order in which each group first appears in the input.
    #[default]
    Input,
    FirstSeen,
    Occurrences,
    Risk,
    Merchant,
}

impl CandidateSort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::FirstSeen => "first-seen",
            Self::Occurrences => "occurrences",
            Self::Risk => "risk",
            Self::Merchant => "merchant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "input" => Some(Self::Input),
            "first-seen" => Some(Self::FirstSeen),
            "occurrences" => Some(Self::Occurrences),
            "risk" => Some(Self::Risk),
            "merchant" => Some(Self::Merchant),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct TransactionGroup {
    key: GroupKey,
    rows: Vec<ValidTransaction>,
}

pub fn detect_candidates(transactions: &[Transaction], window: AuditWindow) -> CandidateDetection {
    detect_candidates_with(
        transactions,
        window,
        MerchantNormalization::Verbatim,
        AUDIT_POLICY_V1,
    )
}

pub fn detect_candidates_with(
    transactions: &[Transaction],
    window: AuditWindow,
    normalization: MerchantNormalization,
    policy: AuditPolicy,
) -> CandidateDetection {
    let (valid, skipped) = partition_transactions(transactions, window, normalization);
    let considered = valid.len();

    let mut groups: Vec<TransactionGroup> = Vec::new();
    let mut index_by_key: HashMap<GroupKey, usize> = HashMap::new();
    for row in valid {
        let slot = *index_by_key.entry(row.key.clone()).or_insert_with(|| {
            groups.push(TransactionGroup {
                key: row.key.clone(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }

    let mut candidates = Vec::new();
    for mut group in groups {
        if !policy.is_recurring(group.rows.len()) {
            continue;
        }
        group.rows.sort_by_key(|row| row.occurred_at);
        if let Some(candidate) = build_candidate(&group, policy) {
            candidates.push(candidate);
        }
    }

    info!(
        total = transactions.len(),
        considered,
        skipped = skipped.len(),
        candidates = candidates.len(),
        "subscription audit detection finished"
    );

    CandidateDetection {
        candidates,
        considered,
        skipped,
    }
}

/// Splits input into analyzable transactions and skipped ones with a reason.
pub fn partition_transactions(
    transactions: &[Transaction],
    window: AuditWindow,
    normalization: MerchantNormalization,
) -> (Vec<ValidTransaction>, Vec<SkippedTransaction>) {
    let cutoff = window
        .lookback_days
        .and_then(|days| lookback_cutoff(window.now, days));

    let mut valid = Vec::new();
    let mut skipped = Vec::new();
    for (index, transaction) in transactions.iter().enumerate() {
        match validate(index, transaction, cutoff, normalization) {
            Ok(row) => valid.push(row),
            Err(reason) => {
                debug!(index, reason = reason.as_str(), "skipping transaction");
                skipped.push(SkippedTransaction { index, reason });
            }
        }
    }
    (valid, skipped)
}

fn validate(
    index: usize,
    transaction: &Transaction,
    cutoff: Option<DateTime<Utc>>,
    normalization: MerchantNormalization,
) -> Result<ValidTransaction, SkipReason> {
    let raw_datetime = transaction
        .timestamp()
        .ok_or(SkipReason::MissingDatetime)?;
    let occurred_at = parse_transaction_datetime(raw_datetime).ok_or(SkipReason::InvalidDatetime)?;

    if let Some(oldest) = cutoff
        && occurred_at < oldest
    {
        return Err(SkipReason::OutsideLookback);
    }

    let merchant_name = transaction
        .merchant_name()
        .ok_or(SkipReason::MissingMerchant)?;

    let product = transaction.first_product();
    let product_id = product.and_then(Product::stable_id);
    let key = GroupKey::for_transaction(merchant_name, product_id, normalization);
    let product_name = product_id
        .and(product)
        .and_then(|value| value.name.clone())
        .filter(|name| !name.trim().is_empty());

    Ok(ValidTransaction {
        index,
        occurred_at,
        key,
        product_name,
        total: transaction.total_amount(),
    })
}

fn build_candidate(group: &TransactionGroup, policy: AuditPolicy) -> Option<RecurrenceCandidate> {
    let first = group.rows.first()?;
    let last = group.rows.last()?;
    let avg_gap_days = average_gap_days(&group.rows)?;
    let occurrences = group.rows.len();

    Some(RecurrenceCandidate {
        key: group.key.to_string(),
        scope: group.key.scope,
        merchant: group.key.merchant.clone(),
        product_id: group.key.product_id.clone(),
        product_name: group.rows.iter().find_map(|row| row.product_name.clone()),
        occurrences,
        avg_gap_days,
        frequency_label: policy.frequency_for_gap(avg_gap_days),
        risk_level: policy.risk_for(occurrences, avg_gap_days),
        first_seen_at: first.occurred_at,
        last_seen_at: last.occurred_at,
        average_total: average_total(&group.rows),
    })
}

/// Mean of consecutive whole-day gaps; `None` for fewer than two rows.
fn average_gap_days(sorted_rows: &[ValidTransaction]) -> Option<f64> {
    if sorted_rows.len() < 2 {
        return None;
    }

    let total_days = sorted_rows
        .windows(2)
        .map(|pair| days_between(pair[0].occurred_at, pair[1].occurred_at))
        .sum::<i64>();
    let intervals = sorted_rows.len() - 1;
    Some((total_days as f64) / (intervals as f64))
}

fn average_total(rows: &[ValidTransaction]) -> Option<Decimal> {
    let mut sum = Decimal::ZERO;
    let mut count = 0usize;
    for total in rows.iter().filter_map(|row| row.total) {
        sum = sum.checked_add(total)?;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    sum.checked_div(Decimal::from(count))
}

pub fn sort_candidates(candidates: &mut [RecurrenceCandidate], order: CandidateSort) {
    match order {
        CandidateSort::Input => {}
        CandidateSort::FirstSeen => candidates.sort_by_key(|candidate| candidate.first_seen_at),
        CandidateSort::Occurrences => {
            candidates.sort_by(|left, right| right.occurrences.cmp(&left.occurrences));
        }
        CandidateSort::Risk => candidates.sort_by(compare_by_risk),
        CandidateSort::Merchant => candidates.sort_by(|left, right| {
            left.merchant
                .cmp(&right.merchant)
                .then_with(|| left.key.cmp(&right.key))
        }),
    }
}

fn compare_by_risk(left: &RecurrenceCandidate, right: &RecurrenceCandidate) -> Ordering {
    right
        .risk_level
        .rank()
        .cmp(&left.risk_level.rank())
        .then_with(|| right.occurrences.cmp(&left.occurrences))
        .then_with(|| left.avg_gap_days.total_cmp(&right.avg_gap_days))
}
