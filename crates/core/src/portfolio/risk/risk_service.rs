use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use log::debug;

use super::risk_calculator::{calculate_risk_metrics, RiskParameters};
use super::risk_model::RiskMetrics;
use super::risk_traits::RiskServiceTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::snapshot::SnapshotRepositoryTrait;
use crate::settings::{read_settings, SharedSettings};
use crate::utils::time_utils::valuation_date_today;

pub struct RiskService {
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    settings: SharedSettings,
}

impl RiskService {
    pub fn new(snapshot_repository: Arc<dyn SnapshotRepositoryTrait>, settings: SharedSettings) -> Self {
        Self {
            snapshot_repository,
            settings,
        }
    }
}

impl RiskServiceTrait for RiskService {
    fn get_risk_metrics(
        &self,
        client_id: Option<&str>,
        lookback_days: Option<u32>,
    ) -> Result<RiskMetrics> {
        let lookback =
            lookback_days.unwrap_or_else(|| read_settings(&self.settings).risk_lookback_days);
        if lookback == 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Lookback must be at least one day".to_string(),
            )));
        }
        let end_date = valuation_date_today();
        let start_date = end_date - Duration::days(i64::from(lookback));
        self.get_risk_metrics_for_range(client_id, start_date, end_date)
    }

    fn get_risk_metrics_for_range(
        &self,
        client_id: Option<&str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RiskMetrics> {
        if start_date > end_date {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Start date {} is after end date {}",
                start_date, end_date
            ))));
        }

        let settings = read_settings(&self.settings);
        let snapshots =
            self.snapshot_repository
                .get_snapshots(client_id, Some(start_date), Some(end_date))?;
        debug!(
            "Risk over {} snapshot(s) for {} from {} to {}",
            snapshots.len(),
            client_id.unwrap_or("book"),
            start_date,
            end_date
        );

        calculate_risk_metrics(
            client_id,
            &snapshots,
            RiskParameters {
                risk_free_rate: settings.risk_free_rate,
                trading_days_per_year: settings.trading_days_per_year,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::risk::RiskLevel;
    use crate::portfolio::snapshot::PortfolioSnapshot;
    use crate::settings::AnalyticsSettings;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    struct MockSnapshotRepository {
        snapshots: Vec<PortfolioSnapshot>,
        last_range: Mutex<Option<(NaiveDate, NaiveDate)>>,
    }

    impl SnapshotRepositoryTrait for MockSnapshotRepository {
        fn get_snapshots(
            &self,
            client_id: Option<&str>,
            start_date: Option<NaiveDate>,
            end_date: Option<NaiveDate>,
        ) -> Result<Vec<PortfolioSnapshot>> {
            if let (Some(start), Some(end)) = (start_date, end_date) {
                *self.last_range.lock().unwrap() = Some((start, end));
            }
            Ok(self
                .snapshots
                .iter()
                .filter(|s| s.client_id.as_deref() == client_id)
                .filter(|s| start_date.map_or(true, |d| s.snapshot_date >= d))
                .filter(|s| end_date.map_or(true, |d| s.snapshot_date <= d))
                .cloned()
                .collect())
        }
    }

    fn repository(days_back: &[(i64, Decimal)]) -> Arc<MockSnapshotRepository> {
        let today = valuation_date_today();
        Arc::new(MockSnapshotRepository {
            snapshots: days_back
                .iter()
                .map(|(back, value)| {
                    PortfolioSnapshot::new(
                        Some("c1".to_string()),
                        today - Duration::days(*back),
                        *value,
                        Decimal::ZERO,
                    )
                })
                .collect(),
            last_range: Mutex::new(None),
        })
    }

    #[test]
    fn test_default_lookback_comes_from_settings() {
        let repo = repository(&[(40, dec!(50)), (20, dec!(100)), (10, dec!(150)), (0, dec!(120))]);
        let mut settings = AnalyticsSettings::default();
        settings.risk_lookback_days = 30;
        let service = RiskService::new(repo.clone(), settings.shared());

        let metrics = service.get_risk_metrics(Some("c1"), None).unwrap();

        // The point 40 days back is outside the window.
        assert_eq!(metrics.data_points, 3);
        assert_eq!(metrics.drawdown.max_drawdown, dec!(20));
        let today = valuation_date_today();
        assert_eq!(
            *repo.last_range.lock().unwrap(),
            Some((today - Duration::days(30), today))
        );
    }

    #[test]
    fn test_explicit_lookback_overrides_settings() {
        let repo = repository(&[(5, dec!(100)), (1, dec!(101))]);
        let service = RiskService::new(repo, AnalyticsSettings::default().shared());

        let err = service.get_risk_metrics(Some("c1"), Some(3)).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));

        let metrics = service.get_risk_metrics(Some("c1"), Some(7)).unwrap();
        assert_eq!(metrics.volatility.tier, RiskLevel::Low);
    }

    #[test]
    fn test_zero_lookback_is_rejected() {
        let service = RiskService::new(repository(&[]), AnalyticsSettings::default().shared());
        assert!(matches!(
            service.get_risk_metrics(None, Some(0)),
            Err(Error::Validation(_))
        ));
    }
}
