//! Return calculations over a dated snapshot series.

use chrono::{NaiveDate, Utc};
use log::warn;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::performance_model::*;
use crate::constants::{CALENDAR_DAYS_PER_YEAR, DISPLAY_DECIMAL_PRECISION};
use crate::errors::{Error, Result};
use crate::portfolio::snapshot::PortfolioSnapshot;
use crate::utils::time_utils::{days_between, iso_week_key, month_key};

/// Fractional return of each step, skipping steps whose previous value is
/// zero or whose return does not fit in a `Decimal`.
pub fn fractional_returns(values: &[Decimal]) -> Vec<Decimal> {
    values
        .windows(2)
        .filter(|w| !w[0].is_zero())
        .filter_map(|w| {
            let step = (w[1] - w[0]).checked_div(w[0]);
            if step.is_none() {
                warn!(
                    "Return from {} to {} overflowed. Skipping the step.",
                    w[0], w[1]
                );
            }
            step
        })
        .collect()
}

/// Snapshots dated within `[from, to]`, ordered by date.
pub fn filter_snapshots(
    snapshots: &[PortfolioSnapshot],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<&PortfolioSnapshot> {
    let mut in_range: Vec<&PortfolioSnapshot> = snapshots
        .iter()
        .filter(|s| s.snapshot_date >= from && s.snapshot_date <= to)
        .collect();
    in_range.sort_by_key(|s| s.snapshot_date);
    in_range
}

/// Keeps the last snapshot of each week or month. Input must be date-ordered.
pub fn downsample<'a>(
    snapshots: &[&'a PortfolioSnapshot],
    granularity: Granularity,
) -> Vec<&'a PortfolioSnapshot> {
    let group_key: fn(NaiveDate) -> (i32, u32) = match granularity {
        Granularity::Daily => return snapshots.to_vec(),
        Granularity::Weekly => iso_week_key,
        Granularity::Monthly => month_key,
    };

    let mut grouped: Vec<&'a PortfolioSnapshot> = Vec::new();
    let mut current_key = None;
    for &snapshot in snapshots {
        let key = group_key(snapshot.snapshot_date);
        if current_key == Some(key) {
            if let Some(last) = grouped.last_mut() {
                *last = snapshot;
            }
        } else {
            grouped.push(snapshot);
            current_key = Some(key);
        }
    }
    grouped
}

/// `numerator / denominator` in percent. `None` on overflow.
fn checked_percent(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator
        .checked_div(denominator)?
        .checked_mul(dec!(100))
        .map(|p| p.round_dp(DISPLAY_DECIMAL_PRECISION))
}

fn percent_change(start: Decimal, end: Decimal) -> Decimal {
    if start.is_zero() {
        return Decimal::ZERO;
    }
    checked_percent(end - start, start).unwrap_or_else(|| {
        warn!("Change from {} to {} overflowed. Reporting 0.", start, end);
        Decimal::ZERO
    })
}

/// Compound annual growth rate in percent: `((end/start)^(365/days) - 1) * 100`.
///
/// Returns 0 when `start <= 0` or `days <= 0`, and -100 when the value was wiped out.
pub fn annualized_return(start_value: Decimal, end_value: Decimal, days: i64) -> Decimal {
    if start_value <= Decimal::ZERO || days <= 0 {
        return Decimal::ZERO;
    }

    let Some(base) = end_value.checked_div(start_value) else {
        warn!(
            "Growth from {} to {} overflowed. Reporting 0.",
            start_value, end_value
        );
        return Decimal::ZERO;
    };
    if base <= Decimal::ZERO {
        return dec!(-100);
    }

    let exponent = Decimal::from(CALENDAR_DAYS_PER_YEAR) / Decimal::from(days);
    let annualized = base
        .checked_powd(exponent)
        .and_then(|growth| (growth - Decimal::ONE).checked_mul(dec!(100)));
    match annualized {
        Some(percent) => percent.round_dp(DISPLAY_DECIMAL_PRECISION),
        None => {
            warn!(
                "Annualized return overflowed for growth {} over {} day(s). Reporting 0.",
                base, days
            );
            Decimal::ZERO
        }
    }
}

fn class_performance(start: Decimal, end: Decimal, total_start: Decimal) -> ClassPerformance {
    let contribution = if total_start.is_zero() {
        Decimal::ZERO
    } else {
        checked_percent(end - start, total_start).unwrap_or_else(|| {
            warn!(
                "Contribution of {} over a start of {} overflowed. Reporting 0.",
                end - start,
                total_start
            );
            Decimal::ZERO
        })
    };
    ClassPerformance {
        start_value: start,
        end_value: end,
        return_percentage: percent_change(start, end),
        contribution,
    }
}

fn build_series(points: &[&PortfolioSnapshot]) -> Vec<PerformancePoint> {
    let mut previous: Option<Decimal> = None;
    points
        .iter()
        .map(|snapshot| {
            let period_return = previous
                .filter(|p| !p.is_zero())
                .and_then(|p| checked_percent(snapshot.total_value - p, p));
            previous = Some(snapshot.total_value);
            PerformancePoint {
                date: snapshot.snapshot_date,
                value: snapshot.total_value,
                period_return,
                crypto_value: snapshot.crypto_value,
                traditional_value: snapshot.traditional_value,
            }
        })
        .collect()
}

/// Builds the summary, series and asset-class breakdown for `[from, to]`.
///
/// Fails with `InsufficientData` when no snapshot falls inside the range.
pub fn calculate_performance(
    client_id: Option<&str>,
    snapshots: &[PortfolioSnapshot],
    from: NaiveDate,
    to: NaiveDate,
    granularity: Granularity,
) -> Result<PerformanceReport> {
    let in_range = filter_snapshots(snapshots, from, to);
    let points = downsample(&in_range, granularity);
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(Error::InsufficientData(format!(
                "No snapshots between {} and {}",
                from, to
            )))
        }
    };

    let values: Vec<Decimal> = points.iter().map(|s| s.total_value).collect();
    let returns = fractional_returns(&values);
    let to_percent = |r: &Decimal| {
        r.checked_mul(dec!(100))
            .map(|p| p.round_dp(DISPLAY_DECIMAL_PRECISION))
    };

    let start_value = first.total_value;
    let end_value = last.total_value;

    let summary = PerformanceSummary {
        start_date: first.snapshot_date,
        end_date: last.snapshot_date,
        start_value,
        end_value,
        absolute_return: end_value - start_value,
        roi_percentage: percent_change(start_value, end_value),
        annualized_return: annualized_return(start_value, end_value, days_between(from, to)),
        best_period_return: returns.iter().max().and_then(to_percent).unwrap_or_default(),
        worst_period_return: returns.iter().min().and_then(to_percent).unwrap_or_default(),
        positive_periods: returns.iter().filter(|r| r.is_sign_positive() && !r.is_zero()).count(),
        negative_periods: returns.iter().filter(|r| r.is_sign_negative() && !r.is_zero()).count(),
        data_points: points.len(),
    };

    let breakdown = PerformanceBreakdown {
        crypto: class_performance(first.crypto_value, last.crypto_value, start_value),
        traditional: class_performance(
            first.traditional_value,
            last.traditional_value,
            start_value,
        ),
    };

    Ok(PerformanceReport {
        client_id: client_id.map(str::to_string),
        granularity,
        summary,
        series: build_series(&points),
        breakdown,
        calculated_at: Utc::now(),
    })
}
