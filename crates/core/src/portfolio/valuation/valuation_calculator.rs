use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::allocations::{Allocation, AllocationType};
use crate::constants::DECIMAL_PRECISION;
use crate::custody::{AssetClass, AssetKey, CustodyAsset};
use crate::portfolio::valuation::{
    AllocatedAssetValue, AssetAllocationSummary, BookAllocationSummary, ClientPortfolio,
    TokenBalance,
};

/// Value a single allocation attributes to its client, as used by the
/// per-client portfolio view.
///
/// Fixed amounts are taken at face value even when they exceed the asset's
/// current value. The book-wide view caps them instead; see
/// [`capped_allocated_value`].
pub fn client_allocated_value(allocation: &Allocation, total_asset_value: Decimal) -> Decimal {
    match allocation.allocation_type {
        AllocationType::Percentage => total_asset_value * allocation.value / dec!(100),
        AllocationType::FixedAmount => allocation.value,
    }
}

/// Value a single allocation claims in the book-wide view: fixed amounts are
/// limited to `min(value, asset value)`.
pub fn capped_allocated_value(allocation: &Allocation, total_asset_value: Decimal) -> Decimal {
    match allocation.allocation_type {
        AllocationType::Percentage => total_asset_value * allocation.value / dec!(100),
        AllocationType::FixedAmount => allocation.value.min(total_asset_value.max(Decimal::ZERO)),
    }
}

/// Values a client's portfolio from its active allocations and current balances.
///
/// Allocations whose asset is missing from `assets` are skipped with a
/// warning. Ended allocations are ignored.
pub fn calculate_client_portfolio(
    client_id: &str,
    allocations: &[Allocation],
    assets: &HashMap<AssetKey, CustodyAsset>,
    calculated_at: DateTime<Utc>,
) -> ClientPortfolio {
    let mut portfolio = ClientPortfolio::empty(client_id, calculated_at);

    for allocation in allocations
        .iter()
        .filter(|a| a.is_active() && a.client_id == client_id)
    {
        let key = allocation.asset_key();
        let Some(asset) = assets.get(&key) else {
            warn!(
                "Allocation {} references missing asset {}. Skipping.",
                allocation.id, key
            );
            continue;
        };

        let total_asset_value = asset.total_value();
        let client_value =
            client_allocated_value(allocation, total_asset_value).round_dp(DECIMAL_PRECISION);

        match asset.asset_class() {
            AssetClass::Crypto => portfolio.crypto_value += client_value,
            AssetClass::Traditional => portfolio.traditional_value += client_value,
        }

        portfolio.assets.push(AllocatedAssetValue {
            allocation_id: allocation.id.clone(),
            asset_type: asset.asset_type,
            asset_id: asset.id.clone(),
            asset_identifier: asset.identifier.clone(),
            asset_name: asset.name.clone(),
            allocation_type: allocation.allocation_type,
            allocation_value: allocation.value,
            total_asset_value,
            client_value,
            balances: asset.balances.iter().map(TokenBalance::from).collect(),
        });
    }

    portfolio.total_value = portfolio.crypto_value + portfolio.traditional_value;
    portfolio
}

/// Summarizes how much of every asset in the book is claimed by active allocations.
pub fn calculate_book_summary(
    assets: &[CustodyAsset],
    allocations: &[Allocation],
    calculated_at: DateTime<Utc>,
) -> BookAllocationSummary {
    let mut by_asset: HashMap<AssetKey, Vec<&Allocation>> = HashMap::new();
    for allocation in allocations.iter().filter(|a| a.is_active()) {
        by_asset
            .entry(allocation.asset_key())
            .or_default()
            .push(allocation);
    }

    let mut summary = BookAllocationSummary {
        assets: Vec::with_capacity(assets.len()),
        total_aum: Decimal::ZERO,
        crypto_aum: Decimal::ZERO,
        traditional_aum: Decimal::ZERO,
        allocated_value: Decimal::ZERO,
        unallocated_value: Decimal::ZERO,
        calculated_at,
    };

    for asset in assets {
        let total_value = asset.total_value();
        let claims = by_asset.get(&asset.key()).map(Vec::as_slice).unwrap_or(&[]);

        let allocated_percentage: Decimal = claims
            .iter()
            .filter(|a| a.allocation_type == AllocationType::Percentage)
            .map(|a| a.value)
            .sum();
        let fixed_amount_total: Decimal = claims
            .iter()
            .filter(|a| a.allocation_type == AllocationType::FixedAmount)
            .map(|a| capped_allocated_value(a, total_value))
            .sum();
        let claimed: Decimal = claims
            .iter()
            .map(|a| capped_allocated_value(a, total_value))
            .sum();
        let allocated_value = claimed
            .min(total_value.max(Decimal::ZERO))
            .round_dp(DECIMAL_PRECISION);
        let unallocated_value = (total_value - allocated_value).max(Decimal::ZERO);
        let client_count = claims
            .iter()
            .map(|a| a.client_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        summary.total_aum += total_value;
        match asset.asset_class() {
            AssetClass::Crypto => summary.crypto_aum += total_value,
            AssetClass::Traditional => summary.traditional_aum += total_value,
        }
        summary.allocated_value += allocated_value;
        summary.unallocated_value += unallocated_value;

        summary.assets.push(AssetAllocationSummary {
            asset_type: asset.asset_type,
            asset_id: asset.id.clone(),
            asset_identifier: asset.identifier.clone(),
            total_value,
            allocated_percentage,
            fixed_amount_total,
            allocated_value,
            unallocated_value,
            active_allocations: claims.len(),
            client_count,
        });
    }

    summary
        .assets
        .sort_by(|a, b| b.total_value.cmp(&a.total_value));
    summary
}
