use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Human-readable cadence derived from the average gap between occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum FrequencyLabel {
    Weekly,
    #[serde(rename = "Bi-weekly")]
    Biweekly,
    Monthly,
    #[serde(rename = "Bi-monthly")]
    Bimonthly,
    Quarterly,
}

impl FrequencyLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Biweekly => "Bi-weekly",
            Self::Monthly => "Monthly",
            Self::Bimonthly => "Bi-monthly",
            Self::Quarterly => "Quarterly",
        }
    }

    /// How many charges of this cadence land in an average month.
    pub fn occurrences_per_month(self) -> Decimal {
        match self {
            Self::Weekly => dec!(52) / dec!(12),
            Self::Biweekly => dec!(26) / dec!(12),
            Self::Monthly => Decimal::ONE,
            Self::Bimonthly => dec!(0.5),
            Self::Quarterly => Decimal::ONE / dec!(3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}
