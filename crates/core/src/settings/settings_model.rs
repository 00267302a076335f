//! Analytics settings model.

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ALLOCATION_WARNING_THRESHOLD, DEFAULT_RISK_LOOKBACK_DAYS, MAX_ALLOCATED_PERCENTAGE,
    TRADING_DAYS_PER_YEAR,
};
use crate::errors::{Error, Result};

/// Settings handle shared between services. Hosts may update it at runtime.
pub type SharedSettings = Arc<RwLock<AnalyticsSettings>>;

/// Parameters for allocation checks and risk/performance analytics.
///
/// All values are reported in USD. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AnalyticsSettings {
    /// Annual risk-free rate as a fraction (0.02 = 2%)
    pub risk_free_rate: Decimal,
    /// Periods per year used to annualize daily statistics
    pub trading_days_per_year: u32,
    /// Default lookback window for risk metrics
    pub risk_lookback_days: u32,
    /// Percentage total above which an allocation produces a warning
    pub allocation_warning_threshold: Decimal,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: dec!(0.02),
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            risk_lookback_days: DEFAULT_RISK_LOOKBACK_DAYS,
            allocation_warning_threshold: Decimal::from(DEFAULT_ALLOCATION_WARNING_THRESHOLD),
        }
    }
}

impl AnalyticsSettings {
    /// Parses settings from a JSON document. Missing keys take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let settings: AnalyticsSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.risk_free_rate.is_sign_negative() || self.risk_free_rate >= Decimal::ONE {
            return Err(Error::InvalidConfigValue(format!(
                "riskFreeRate must be a fraction in [0, 1), got {}",
                self.risk_free_rate
            )));
        }
        if self.trading_days_per_year == 0 {
            return Err(Error::InvalidConfigValue(
                "tradingDaysPerYear must be positive".to_string(),
            ));
        }
        if self.risk_lookback_days == 0 {
            return Err(Error::InvalidConfigValue(
                "riskLookbackDays must be positive".to_string(),
            ));
        }
        if self.allocation_warning_threshold <= Decimal::ZERO
            || self.allocation_warning_threshold > Decimal::from(MAX_ALLOCATED_PERCENTAGE)
        {
            return Err(Error::InvalidConfigValue(format!(
                "allocationWarningThreshold must be in (0, 100], got {}",
                self.allocation_warning_threshold
            )));
        }
        Ok(())
    }

    /// Wraps the settings in a shareable handle.
    pub fn shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }
}

/// Returns a copy of the current settings.
///
/// A poisoned lock still holds a complete value, so it is read rather than
/// propagated.
pub fn read_settings(settings: &SharedSettings) -> AnalyticsSettings {
    match settings.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
