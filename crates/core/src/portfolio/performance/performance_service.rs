use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::performance_calculator::calculate_performance;
use super::performance_model::{Granularity, PerformanceReport};
use super::performance_traits::PerformanceServiceTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::snapshot::SnapshotRepositoryTrait;

pub struct PerformanceService {
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl PerformanceService {
    pub fn new(snapshot_repository: Arc<dyn SnapshotRepositoryTrait>) -> Self {
        Self {
            snapshot_repository,
        }
    }
}

impl PerformanceServiceTrait for PerformanceService {
    fn get_performance(
        &self,
        client_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
        granularity: Granularity,
    ) -> Result<PerformanceReport> {
        if from > to {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Start date {} is after end date {}",
                from, to
            ))));
        }

        let snapshots = self
            .snapshot_repository
            .get_snapshots(client_id, Some(from), Some(to))?;
        debug!(
            "Loaded {} snapshot(s) for {} between {} and {}",
            snapshots.len(),
            client_id.unwrap_or("book"),
            from,
            to
        );

        calculate_performance(client_id, &snapshots, from, to, granularity)
    }
}
