use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sampling step for a performance series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    #[default]
    Daily,
    /// Last snapshot of each ISO week
    Weekly,
    /// Last snapshot of each calendar month
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub value: Decimal,
    /// Return since the previous point, in percent. `None` for the first
    /// point and after a zero value.
    pub period_return: Option<Decimal>,
    pub crypto_value: Decimal,
    pub traditional_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub absolute_return: Decimal,
    pub roi_percentage: Decimal,
    /// Compound annual growth rate over the requested range, in percent
    pub annualized_return: Decimal,
    pub best_period_return: Decimal,
    pub worst_period_return: Decimal,
    pub positive_periods: usize,
    pub negative_periods: usize,
    pub data_points: usize,
}

/// Return of one asset class over the same start/end pair as the total.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassPerformance {
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub return_percentage: Decimal,
    /// Share of the total return, in percentage points of the starting total
    pub contribution: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBreakdown {
    pub crypto: ClassPerformance,
    pub traditional: ClassPerformance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    /// `None` for the whole book
    pub client_id: Option<String>,
    pub granularity: Granularity,
    pub summary: PerformanceSummary,
    pub series: Vec<PerformancePoint>,
    pub breakdown: PerformanceBreakdown,
    pub calculated_at: DateTime<Utc>,
}
