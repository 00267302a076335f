//! Unit tests for the performance service.

use super::*;
use crate::errors::{Error, Result};
use crate::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockSnapshotRepository {
    snapshots: Vec<PortfolioSnapshot>,
    requests: Mutex<Vec<(Option<String>, Option<NaiveDate>, Option<NaiveDate>)>>,
}

impl SnapshotRepositoryTrait for MockSnapshotRepository {
    fn get_snapshots(
        &self,
        client_id: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PortfolioSnapshot>> {
        self.requests
            .lock()
            .unwrap()
            .push((client_id.map(str::to_string), start_date, end_date));
        Ok(self
            .snapshots
            .iter()
            .filter(|s| s.client_id.as_deref() == client_id)
            .cloned()
            .collect())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn repository() -> Arc<MockSnapshotRepository> {
    let mut snapshots = Vec::new();
    for (day, value) in [(1, dec!(1000)), (2, dec!(1050)), (3, dec!(1029))] {
        snapshots.push(PortfolioSnapshot::new(
            Some("c1".to_string()),
            date(2024, 5, day),
            value,
            Decimal::ZERO,
        ));
        snapshots.push(PortfolioSnapshot::new(
            None,
            date(2024, 5, day),
            value * dec!(10),
            dec!(500),
        ));
    }
    Arc::new(MockSnapshotRepository {
        snapshots,
        ..Default::default()
    })
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_client_performance_uses_client_series() {
    let repo = repository();
    let service = PerformanceService::new(repo.clone());

    let report = service
        .get_performance(Some("c1"), date(2024, 5, 1), date(2024, 5, 3), Granularity::Daily)
        .unwrap();

    assert_eq!(report.client_id.as_deref(), Some("c1"));
    assert_eq!(report.summary.start_value, dec!(1000));
    assert_eq!(report.summary.end_value, dec!(1029));
    assert_eq!(report.summary.roi_percentage, dec!(2.9));
    assert_eq!(report.summary.best_period_return, dec!(5));
    assert_eq!(report.summary.worst_period_return, dec!(-2));

    let requests = repo.requests.lock().unwrap();
    assert_eq!(
        requests[0],
        (Some("c1".to_string()), Some(date(2024, 5, 1)), Some(date(2024, 5, 3)))
    );
}

#[test]
fn test_book_performance_when_no_client_given() {
    let service = PerformanceService::new(repository());
    let report = service
        .get_performance(None, date(2024, 5, 1), date(2024, 5, 3), Granularity::Daily)
        .unwrap();

    assert!(report.client_id.is_none());
    assert_eq!(report.summary.start_value, dec!(10500));
    assert_eq!(report.breakdown.traditional.return_percentage, Decimal::ZERO);
}

#[test]
fn test_inverted_range_is_rejected() {
    let service = PerformanceService::new(repository());
    let err = service
        .get_performance(Some("c1"), date(2024, 5, 3), date(2024, 5, 1), Granularity::Daily)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_unknown_client_has_no_data() {
    let service = PerformanceService::new(repository());
    let err = service
        .get_performance(Some("c9"), date(2024, 5, 1), date(2024, 5, 3), Granularity::Weekly)
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientData(_)));
}
