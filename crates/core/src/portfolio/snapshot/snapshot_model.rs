//! Portfolio snapshot domain model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::valuation::{BookAllocationSummary, ClientPortfolio};

/// Valuation of one client's portfolio, or of the whole book, on a date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    /// `None` for book-wide snapshots
    pub client_id: Option<String>,
    pub snapshot_date: NaiveDate,
    pub total_value: Decimal,
    pub crypto_value: Decimal,
    pub traditional_value: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn new(
        client_id: Option<String>,
        snapshot_date: NaiveDate,
        crypto_value: Decimal,
        traditional_value: Decimal,
    ) -> Self {
        Self {
            client_id,
            snapshot_date,
            total_value: crypto_value + traditional_value,
            crypto_value,
            traditional_value,
            calculated_at: Utc::now(),
        }
    }

    /// Snapshot of a client's current portfolio valuation.
    pub fn from_client_portfolio(portfolio: &ClientPortfolio, snapshot_date: NaiveDate) -> Self {
        Self {
            client_id: Some(portfolio.client_id.clone()),
            snapshot_date,
            total_value: portfolio.total_value,
            crypto_value: portfolio.crypto_value,
            traditional_value: portfolio.traditional_value,
            calculated_at: portfolio.calculated_at,
        }
    }

    /// Book-wide snapshot: assets under management split by class.
    pub fn from_book_summary(summary: &BookAllocationSummary, snapshot_date: NaiveDate) -> Self {
        Self {
            client_id: None,
            snapshot_date,
            total_value: summary.total_aum,
            crypto_value: summary.crypto_aum,
            traditional_value: summary.traditional_aum,
            calculated_at: summary.calculated_at,
        }
    }
}
