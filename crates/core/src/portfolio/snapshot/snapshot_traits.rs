//! Repository trait for portfolio snapshots.

use chrono::NaiveDate;

use super::PortfolioSnapshot;
use crate::errors::Result;

/// Read access to the historical snapshot series.
///
/// Snapshots are captured and stored by a scheduled job outside the engine.
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Get snapshots for one client (`Some`) or the whole book (`None`)
    /// within an optional inclusive date range, ordered by date.
    fn get_snapshots(
        &self,
        client_id: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>>;
}
