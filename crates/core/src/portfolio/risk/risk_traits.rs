use chrono::NaiveDate;

use super::risk_model::RiskMetrics;
use crate::errors::Result;

/// Risk analytics over stored snapshots.
pub trait RiskServiceTrait: Send + Sync {
    /// Risk profile over the trailing `lookback_days` (settings default when `None`)
    /// ending today.
    fn get_risk_metrics(
        &self,
        client_id: Option<&str>,
        lookback_days: Option<u32>,
    ) -> Result<RiskMetrics>;

    /// Risk profile over an explicit date range, inclusive.
    fn get_risk_metrics_for_range(
        &self,
        client_id: Option<&str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RiskMetrics>;
}
