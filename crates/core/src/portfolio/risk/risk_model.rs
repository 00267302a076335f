use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse risk classification used for both volatility and the overall rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityMetrics {
    /// Population standard deviation of daily returns, in percent
    pub daily_volatility: Decimal,
    /// `daily_volatility * sqrt(trading days)`
    pub annualized_volatility: Decimal,
    pub tier: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAdjustedReturns {
    /// Mean daily return times trading days, as a fraction
    pub annualized_return: Decimal,
    pub excess_return: Decimal,
    pub downside_deviation: Decimal,
    pub sharpe_ratio: Decimal,
    pub sortino_ratio: Decimal,
    pub calmar_ratio: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownMetrics {
    /// Largest peak-to-trough decline, in percent
    pub max_drawdown: Decimal,
    /// Date of the peak the largest decline started from
    pub max_drawdown_date: Option<NaiveDate>,
    pub current_drawdown: Decimal,
    pub days_in_drawdown: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// `None` for the whole book
    pub client_id: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub data_points: usize,
    pub mean_daily_return: Decimal,
    pub volatility: VolatilityMetrics,
    pub risk_adjusted: RiskAdjustedReturns,
    pub drawdown: DrawdownMetrics,
    pub risk_rating: RiskLevel,
    /// Annual risk-free rate the ratios were computed with, as a fraction
    pub risk_free_rate: Decimal,
    pub calculated_at: DateTime<Utc>,
}
