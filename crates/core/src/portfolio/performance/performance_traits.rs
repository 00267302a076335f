use chrono::NaiveDate;

use super::performance_model::{Granularity, PerformanceReport};
use crate::errors::Result;

/// Historical performance over stored snapshots.
pub trait PerformanceServiceTrait: Send + Sync {
    /// Performance of a client (or the whole book when `client_id` is `None`)
    /// between two dates, inclusive.
    fn get_performance(
        &self,
        client_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
        granularity: Granularity,
    ) -> Result<PerformanceReport>;
}
