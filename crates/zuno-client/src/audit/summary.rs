use rust_decimal::Decimal;
use serde::Serialize;

use crate::audit::cost::{FlatRateEstimator, MonthlyCostEstimator};
use crate::audit::policy::{AUDIT_POLICY_V1, AuditPolicy};
use crate::audit::recurring::RecurrenceCandidate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total_candidates: usize,
    pub estimated_monthly_cost: Decimal,
    pub estimated_annual_cost: Decimal,
    pub estimated_potential_savings: Decimal,
}

/// Summarizes candidates with the flat per-subscription estimate.
pub fn summarize(candidates: &[RecurrenceCandidate]) -> AuditSummary {
    // 25 x 12 per candidate cannot reach Decimal::MAX for any slice length.
    summarize_with(candidates, &FlatRateEstimator::default(), AUDIT_POLICY_V1)
        .unwrap_or_default()
}

/// Returns `None` when a total overflows `Decimal`.
pub fn summarize_with(
    candidates: &[RecurrenceCandidate],
    estimator: &dyn MonthlyCostEstimator,
    policy: AuditPolicy,
) -> Option<AuditSummary> {
    if candidates.is_empty() {
        return Some(AuditSummary::default());
    }

    let estimated_monthly_cost = candidates.iter().try_fold(Decimal::ZERO, |total, candidate| {
        total.checked_add(estimator.estimate_monthly_cost(candidate))
    })?;
    let estimated_annual_cost = estimated_monthly_cost.checked_mul(policy.months_per_year)?;
    let estimated_potential_savings = estimated_annual_cost.checked_mul(policy.savings_fraction)?;

    Some(AuditSummary {
        total_candidates: candidates.len(),
        estimated_monthly_cost,
        estimated_annual_cost,
        estimated_potential_savings,
    })
}
