use rust_decimal::Decimal;

use crate::audit::policy::AUDIT_POLICY_V1;
use crate::audit::recurring::RecurrenceCandidate;

/// Per-candidate monthly cost used by the audit summary.
pub trait MonthlyCostEstimator {
    fn estimate_monthly_cost(&self, candidate: &RecurrenceCandidate) -> Decimal;
}

/// Charges every candidate the same flat monthly amount, whatever it was
/// actually billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRateEstimator {
    pub monthly: Decimal,
}

impl Default for FlatRateEstimator {
    fn default() -> Self {
        Self {
            monthly: AUDIT_POLICY_V1.flat_monthly_estimate,
        }
    }
}

impl MonthlyCostEstimator for FlatRateEstimator {
    fn estimate_monthly_cost(&self, _candidate: &RecurrenceCandidate) -> Decimal {
        self.monthly
    }
}

/// Scales the group's mean observed `price.total` by its cadence.
///
/// Groups with no parseable totals are charged `fallback`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservedAverageEstimator {
    pub fallback: FlatRateEstimator,
}

impl MonthlyCostEstimator for ObservedAverageEstimator {
    fn estimate_monthly_cost(&self, candidate: &RecurrenceCandidate) -> Decimal {
        let Some(average) = candidate.average_total else {
            return self.fallback.estimate_monthly_cost(candidate);
        };
        average
            .checked_mul(candidate.frequency_label.occurrences_per_month())
            .unwrap_or_else(|| self.fallback.estimate_monthly_cost(candidate))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CostStrategy {
    #[default]
    Flat,
    Observed,
}

impl CostStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Observed => "observed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Some(Self::Flat),
            "observed" => Some(Self::Observed),
            _ => None,
        }
    }

    pub fn estimator(self) -> Box<dyn MonthlyCostEstimator> {
        match self {
            Self::Flat => Box::new(FlatRateEstimator::default()),
            Self::Observed => Box::new(ObservedAverageEstimator::default()),
        }
    }
}
