//! Property-based integration tests for the allocation rules and analytics.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{NaiveDate, Utc};
use custodia_core::allocations::{
    Allocation, AllocationType, AllocationValidationRequest, AllocationValidator,
};
use custodia_core::custody::CustodyAssetType;
use custodia_core::portfolio::{
    calculate_concentration, fractional_returns, population_stats,
    volatility_metrics, Holding,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Generators
// =============================================================================

/// Generates a positive USD value with cent precision.
fn arb_value() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generates a percentage in (0, 100] with two decimal places.
fn arb_percentage() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn arb_holdings(max_count: usize) -> impl Strategy<Value = Vec<Holding>> {
    proptest::collection::vec(arb_value(), 1..=max_count).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Holding::new(format!("h{}", i), v))
            .collect()
    })
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn accepted(index: usize, value: Decimal) -> Allocation {
    let now = Utc::now().naive_utc();
    Allocation {
        id: format!("alloc-{}", index),
        client_id: format!("client-{}", index),
        asset_type: CustodyAssetType::Wallet,
        asset_id: "w-1".to_string(),
        allocation_type: AllocationType::Percentage,
        value,
        start_date: start_date(),
        end_date: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Accepting only validated percentage allocations never pushes an asset past 100%.
    #[test]
    fn prop_accepted_percentages_never_exceed_100(
        values in proptest::collection::vec(arb_percentage(), 1..30)
    ) {
        let validator = AllocationValidator::default();
        let mut book: Vec<Allocation> = Vec::new();

        for (i, value) in values.into_iter().enumerate() {
            let request = AllocationValidationRequest {
                client_id: format!("client-{}", i),
                asset_type: CustodyAssetType::Wallet,
                asset_id: "w-1".to_string(),
                allocation_type: AllocationType::Percentage,
                value,
                start_date: start_date(),
                exclude_allocation_id: None,
            };
            let result = validator.validate(&request, true, true, &book);
            if result.valid {
                book.push(accepted(i, value));
            }
            let total: Decimal = book.iter().map(|a| a.value).sum();
            prop_assert!(total <= dec!(100));
        }
    }

    /// The Herfindahl index stays within [0, 1] for any set of holdings.
    #[test]
    fn prop_herfindahl_is_bounded(holdings in arb_holdings(25)) {
        let metrics = calculate_concentration(&holdings);
        prop_assert!(metrics.herfindahl_index >= Decimal::ZERO);
        prop_assert!(metrics.herfindahl_index <= Decimal::ONE);
        prop_assert!(metrics.top_asset_percentage <= metrics.top5_percentage);
        prop_assert!(metrics.top5_percentage <= metrics.top10_percentage);
    }

    /// A single holding is fully concentrated.
    #[test]
    fn prop_single_holding_has_unit_index(value in arb_value()) {
        let metrics = calculate_concentration(&[Holding::new("only", value)]);
        prop_assert_eq!(metrics.herfindahl_index, Decimal::ONE);
        prop_assert_eq!(metrics.top_asset_percentage, dec!(100));
    }

    /// n equal holdings give an index of 1/n.
    #[test]
    fn prop_equal_holdings_give_one_over_n(value in arb_value(), n in 1usize..20) {
        let holdings: Vec<Holding> = (0..n).map(|i| Holding::new(format!("h{}", i), value)).collect();
        let metrics = calculate_concentration(&holdings);
        let expected = (Decimal::ONE / Decimal::from(n)).round_dp(6);
        prop_assert!((metrics.herfindahl_index - expected).abs() <= dec!(0.000001));
    }

    /// Annualized volatility is the daily figure times sqrt(252), up to the
    /// rounding of the factor and of the reported value.
    #[test]
    fn prop_annualized_volatility_scales_daily(
        values in proptest::collection::vec(arb_value(), 2..60)
    ) {
        let returns = fractional_returns(&values);
        let (_, stddev) = population_stats(&returns).unwrap();
        let volatility = volatility_metrics(stddev, 252);

        let expected = volatility.daily_volatility * dec!(15.874507866387544);
        let tolerance = dec!(0.000001) + volatility.daily_volatility * dec!(0.000000001);
        prop_assert!(
            (volatility.annualized_volatility - expected).abs() <= tolerance,
            "annualized {} vs expected {}",
            volatility.annualized_volatility,
            expected
        );
        prop_assert!(volatility.annualized_volatility.scale() <= 6);
    }
}
