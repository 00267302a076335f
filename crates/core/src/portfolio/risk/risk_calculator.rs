//! Volatility, risk-adjusted ratios and drawdown over a snapshot series.

use chrono::{NaiveDate, Utc};
use log::warn;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::risk_model::*;
use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Error, Result};
use crate::portfolio::performance::fractional_returns;
use crate::portfolio::snapshot::PortfolioSnapshot;
use crate::utils::time_utils::days_between;

const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(15.874507866); // sqrt(252)

/// Parameters the ratios depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParameters {
    /// Annual risk-free rate as a fraction
    pub risk_free_rate: Decimal,
    pub trading_days_per_year: u32,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            risk_free_rate: dec!(0.02),
            trading_days_per_year: crate::constants::TRADING_DAYS_PER_YEAR,
        }
    }
}

/// `sqrt(trading_days)`, rounded to 9 places so scaled volatilities stay exact.
pub fn annualization_factor(trading_days: u32) -> Decimal {
    Decimal::from(trading_days)
        .sqrt()
        .map(|f| f.round_dp(9))
        .unwrap_or(SQRT_TRADING_DAYS_APPROX)
}

/// Population mean and standard deviation (divides by n). `None` when empty
/// or when the squared deviations do not fit in a `Decimal`.
pub fn population_stats(values: &[Decimal]) -> Option<(Decimal, Decimal)> {
    if values.is_empty() {
        return None;
    }
    let count = Decimal::from(values.len());
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v));
    let Some(mean) = sum.map(|total| total / count) else {
        warn!("Sum of {} values overflowed.", values.len());
        return None;
    };
    let squares = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let diff = v.checked_sub(mean)?;
        acc.checked_add(diff.checked_mul(diff)?)
    });
    let Some(variance) = squares.map(|total| total / count) else {
        warn!("Variance of {} values overflowed.", values.len());
        return None;
    };
    if variance.is_sign_negative() {
        return Some((mean, Decimal::ZERO));
    }
    Some((mean, variance.sqrt().unwrap_or(Decimal::ZERO)))
}

/// Volatility metrics from a daily standard deviation (fraction).
pub fn volatility_metrics(stddev: Decimal, trading_days: u32) -> VolatilityMetrics {
    let daily_volatility = (stddev * dec!(100)).round_dp(DECIMAL_PRECISION);
    let annualized_volatility =
        (daily_volatility * annualization_factor(trading_days)).round_dp(DECIMAL_PRECISION);
    VolatilityMetrics {
        daily_volatility,
        annualized_volatility,
        tier: volatility_tier(annualized_volatility),
    }
}

pub fn volatility_tier(annualized_volatility: Decimal) -> RiskLevel {
    if annualized_volatility < dec!(10) {
        RiskLevel::Low
    } else if annualized_volatility < dec!(25) {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Drawdown against the running peak of the series. Input must be date-ordered.
pub fn drawdown_metrics(points: &[(NaiveDate, Decimal)]) -> DrawdownMetrics {
    let Some(&(first_date, first_value)) = points.first() else {
        return DrawdownMetrics::default();
    };

    let drawdown_from = |peak: Decimal, value: Decimal| -> Decimal {
        if peak <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            ((peak - value) / peak * dec!(100)).round_dp(DECIMAL_PRECISION)
        }
    };

    let mut peak = first_value;
    let mut peak_date = first_date;
    let mut metrics = DrawdownMetrics::default();
    for &(date, value) in points {
        if value > peak {
            peak = value;
            peak_date = date;
        }
        let drawdown = drawdown_from(peak, value);
        if drawdown > metrics.max_drawdown {
            metrics.max_drawdown = drawdown;
            metrics.max_drawdown_date = Some(peak_date);
        }
    }

    if let Some(&(last_date, last_value)) = points.last() {
        metrics.current_drawdown = drawdown_from(peak, last_value);
        if last_value < peak {
            metrics.days_in_drawdown = metrics
                .max_drawdown_date
                .map(|d| days_between(d, last_date).max(0))
                .unwrap_or(0);
        }
    }
    metrics
}

/// Overall rating: Low needs low volatility and a shallow drawdown, High
/// needs high volatility and a deep one.
pub fn risk_rating(tier: RiskLevel, max_drawdown: Decimal) -> RiskLevel {
    match tier {
        RiskLevel::Low if max_drawdown < dec!(10) => RiskLevel::Low,
        RiskLevel::High if max_drawdown > dec!(25) => RiskLevel::High,
        _ => RiskLevel::Medium,
    }
}

fn or_zero(value: Option<Decimal>, name: &str) -> Decimal {
    value.unwrap_or_else(|| {
        warn!("{} overflowed. Reporting 0.", name);
        Decimal::ZERO
    })
}

/// Full risk profile of a snapshot series.
///
/// Fails with `InsufficientData` for fewer than two points, or when every
/// step starts from a zero value.
pub fn calculate_risk_metrics(
    client_id: Option<&str>,
    snapshots: &[PortfolioSnapshot],
    params: RiskParameters,
) -> Result<RiskMetrics> {
    if snapshots.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "Risk metrics need at least 2 snapshots, got {}",
            snapshots.len()
        )));
    }

    let mut ordered: Vec<&PortfolioSnapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.snapshot_date);
    let values: Vec<Decimal> = ordered.iter().map(|s| s.total_value).collect();

    let returns = fractional_returns(&values);
    let (mean, stddev) = population_stats(&returns).ok_or_else(|| {
        Error::InsufficientData("No computable returns in the snapshot series".to_string())
    })?;

    let trading_days = Decimal::from(params.trading_days_per_year);
    let sqrt_days = annualization_factor(params.trading_days_per_year);
    let volatility = volatility_metrics(stddev, params.trading_days_per_year);

    // The annual rate is brought to a daily figure and taken off the
    // annualized mean as-is.
    let annualized_return = or_zero(mean.checked_mul(trading_days), "Annualized return");
    let excess_return = or_zero(
        annualized_return.checked_sub(params.risk_free_rate / trading_days),
        "Excess return",
    );

    let negatives: Vec<Decimal> = returns
        .iter()
        .copied()
        .filter(|r| r.is_sign_negative() && !r.is_zero())
        .collect();
    let downside_deviation = population_stats(&negatives)
        .map(|(_, d)| d)
        .unwrap_or(stddev);

    let ratio = |denominator: Decimal, name: &str| -> Decimal {
        if denominator.is_zero() {
            return Decimal::ZERO;
        }
        let scaled = excess_return
            .checked_div(denominator)
            .and_then(|r| r.checked_mul(sqrt_days));
        or_zero(scaled, name).round_dp(DECIMAL_PRECISION)
    };

    let points: Vec<(NaiveDate, Decimal)> = ordered
        .iter()
        .map(|s| (s.snapshot_date, s.total_value))
        .collect();
    let drawdown = drawdown_metrics(&points);

    let calmar_ratio = if drawdown.max_drawdown.is_zero() {
        Decimal::ZERO
    } else {
        let calmar = annualized_return
            .checked_mul(dec!(100))
            .and_then(|r| r.checked_div(drawdown.max_drawdown));
        or_zero(calmar, "Calmar ratio").round_dp(DECIMAL_PRECISION)
    };

    let risk_adjusted = RiskAdjustedReturns {
        annualized_return: annualized_return.round_dp(DECIMAL_PRECISION),
        excess_return: excess_return.round_dp(DECIMAL_PRECISION),
        downside_deviation: downside_deviation.round_dp(DECIMAL_PRECISION),
        sharpe_ratio: ratio(stddev, "Sharpe ratio"),
        sortino_ratio: ratio(downside_deviation, "Sortino ratio"),
        calmar_ratio,
    };

    let risk_rating = risk_rating(volatility.tier, drawdown.max_drawdown);

    Ok(RiskMetrics {
        client_id: client_id.map(str::to_string),
        period_start: ordered[0].snapshot_date,
        period_end: ordered[ordered.len() - 1].snapshot_date,
        data_points: ordered.len(),
        mean_daily_return: mean.round_dp(DECIMAL_PRECISION),
        volatility,
        risk_adjusted,
        drawdown,
        risk_rating,
        risk_free_rate: params.risk_free_rate,
        calculated_at: Utc::now(),
    })
}
