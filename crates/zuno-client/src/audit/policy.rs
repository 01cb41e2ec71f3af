use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::audit::cadence::{FrequencyLabel, RiskLevel};

/// Deterministic subscription-audit policy identifier.
///
/// Emitted with every audit so threshold changes stay visible in output diffs.
pub const AUDIT_POLICY_VERSION: &str = "subscription-audit/v1";

/// v1 subscription-audit thresholds.
///
/// Gap thresholds are inclusive upper bounds evaluated in ascending order;
/// the first bound that holds wins.
#[derive(Debug, Clone, Copy)]
pub struct AuditPolicy {
    pub min_occurrences: usize,
    pub weekly_max_gap_days: f64,
    pub biweekly_max_gap_days: f64,
    pub monthly_max_gap_days: f64,
    pub bimonthly_max_gap_days: f64,
    pub high_risk_min_occurrences: usize,
    pub medium_risk_min_occurrences: usize,
    pub risk_max_gap_days: f64,
    pub flat_monthly_estimate: Decimal,
    pub months_per_year: Decimal,
    pub savings_fraction: Decimal,
}

impl AuditPolicy {
    pub fn frequency_for_gap(self, avg_gap_days: f64) -> FrequencyLabel {
        if avg_gap_days <= self.weekly_max_gap_days {
            FrequencyLabel::Weekly
        } else if avg_gap_days <= self.biweekly_max_gap_days {
            FrequencyLabel::Biweekly
        } else if avg_gap_days <= self.monthly_max_gap_days {
            FrequencyLabel::Monthly
        } else if avg_gap_days <= self.bimonthly_max_gap_days {
            FrequencyLabel::Bimonthly
        } else {
            FrequencyLabel::Quarterly
        }
    }

    pub fn risk_for(self, occurrences: usize, avg_gap_days: f64) -> RiskLevel {
        let regular = avg_gap_days <= self.risk_max_gap_days;
        if occurrences >= self.high_risk_min_occurrences && regular {
            RiskLevel::High
        } else if occurrences >= self.medium_risk_min_occurrences && regular {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn is_recurring(self, occurrences: usize) -> bool {
        occurrences >= self.min_occurrences
    }
}

pub const AUDIT_POLICY_V1: AuditPolicy = AuditPolicy {
    min_occurrences: 2,
    weekly_max_gap_days: 7.0,
    biweekly_max_gap_days: 14.0,
    monthly_max_gap_days: 35.0,
    bimonthly_max_gap_days: 70.0,
    high_risk_min_occurrences: 6,
    medium_risk_min_occurrences: 3,
    risk_max_gap_days: 35.0,
    flat_monthly_estimate: dec!(25),
    months_per_year: dec!(12),
    savings_fraction: dec!(0.30),
};

#[cfg(test)]
mod tests {
    use crate::audit::cadence::{FrequencyLabel, RiskLevel};
    use crate::audit::policy::AUDIT_POLICY_V1;

    #[test]
    fn frequency_bounds_are_inclusive() {
        let policy = AUDIT_POLICY_V1;
        assert_eq!(policy.frequency_for_gap(0.0), FrequencyLabel::Weekly);
        assert_eq!(policy.frequency_for_gap(7.0), FrequencyLabel::Weekly);
        assert_eq!(policy.frequency_for_gap(7.01), FrequencyLabel::Biweekly);
        assert_eq!(policy.frequency_for_gap(14.0), FrequencyLabel::Biweekly);
        assert_eq!(policy.frequency_for_gap(14.5), FrequencyLabel::Monthly);
        assert_eq!(policy.frequency_for_gap(35.0), FrequencyLabel::Monthly);
        assert_eq!(policy.frequency_for_gap(35.01), FrequencyLabel::Bimonthly);
        assert_eq!(policy.frequency_for_gap(70.0), FrequencyLabel::Bimonthly);
        assert_eq!(policy.frequency_for_gap(70.01), FrequencyLabel::Quarterly);
        assert_eq!(policy.frequency_for_gap(365.0), FrequencyLabel::Quarterly);
    }

    #[test]
    fn risk_bounds_match_occurrence_and_gap_thresholds() {
        let policy = AUDIT_POLICY_V1;
        assert_eq!(policy.risk_for(6, 35.0), RiskLevel::High);
        assert_eq!(policy.risk_for(5, 35.0), RiskLevel::Medium);
        assert_eq!(policy.risk_for(3, 35.0), RiskLevel::Medium);
        assert_eq!(policy.risk_for(2, 35.0), RiskLevel::Low);
        assert_eq!(policy.risk_for(2, 100.0), RiskLevel::Low);
        assert_eq!(policy.risk_for(12, 35.01), RiskLevel::Low);
    }

    #[test]
    fn single_purchase_is_not_recurring() {
        assert!(!AUDIT_POLICY_V1.is_recurring(1));
        assert!(AUDIT_POLICY_V1.is_recurring(2));
    }
}
