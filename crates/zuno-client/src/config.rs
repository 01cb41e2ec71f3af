//! Audit settings.
//!
//! Precedence is command-line flag, then environment, then built-in default.

use crate::audit::cost::CostStrategy;
use crate::audit::normalize::MerchantNormalization;
use crate::{ClientError, ClientResult};

pub const LOOKBACK_DAYS_ENV: &str = "ZUNO_LOOKBACK_DAYS";
pub const COST_STRATEGY_ENV: &str = "ZUNO_COST_STRATEGY";
pub const MERCHANT_NORMALIZATION_ENV: &str = "ZUNO_MERCHANT_NORMALIZATION";

/// Lookback used by the transaction-sync audit endpoint when none is given.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSettings {
    /// `None` means every supplied transaction is considered.
    pub lookback_days: Option<u32>,
    pub cost_strategy: CostStrategy,
    pub normalization: MerchantNormalization,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            lookback_days: Some(DEFAULT_LOOKBACK_DAYS),
            cost_strategy: CostStrategy::Flat,
            normalization: MerchantNormalization::Verbatim,
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsOverrides {
    pub lookback_days: Option<u32>,
    pub all_history: bool,
    pub cost_strategy: Option<CostStrategy>,
    pub normalization: Option<MerchantNormalization>,
}

impl AuditSettings {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup` so callers can supply a fake environment.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = non_empty(lookup(LOOKBACK_DAYS_ENV)) {
            settings.lookback_days = match raw.trim() {
                "all" => None,
                value => Some(parse_lookback_days(value).ok_or_else(|| {
                    ClientError::config_invalid(
                        LOOKBACK_DAYS_ENV,
                        &raw,
                        "a positive integer or `all`",
                    )
                })?),
            };
        }

        if let Some(raw) = non_empty(lookup(COST_STRATEGY_ENV)) {
            settings.cost_strategy = CostStrategy::parse(&raw).ok_or_else(|| {
                ClientError::config_invalid(COST_STRATEGY_ENV, &raw, "`flat` or `observed`")
            })?;
        }

        if let Some(raw) = non_empty(lookup(MERCHANT_NORMALIZATION_ENV)) {
            settings.normalization = MerchantNormalization::parse(&raw).ok_or_else(|| {
                ClientError::config_invalid(
                    MERCHANT_NORMALIZATION_ENV,
                    &raw,
                    "`verbatim` or `canonical`",
                )
            })?;
        }

        Ok(settings)
    }

    pub fn apply(mut self, overrides: SettingsOverrides) -> Self {
        if overrides.all_history {
            self.lookback_days = None;
        } else if let Some(days) = overrides.lookback_days {
            self.lookback_days = Some(days);
        }
        if let Some(strategy) = overrides.cost_strategy {
            self.cost_strategy = strategy;
        }
        if let Some(normalization) = overrides.normalization {
            self.normalization = normalization;
        }
        self
    }
}

pub fn parse_lookback_days(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|days| *days > 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
