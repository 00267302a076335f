//! Portfolio valuation domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocations::AllocationType;
use crate::custody::{AssetBalance, CustodyAssetType};

/// Balance line shown under an allocated asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub chain_or_currency: String,
    pub symbol: String,
    pub amount: Decimal,
    pub amount_usd: Decimal,
}

impl From<&AssetBalance> for TokenBalance {
    fn from(balance: &AssetBalance) -> Self {
        Self {
            chain_or_currency: balance.chain_or_currency.clone(),
            symbol: balance.symbol.clone(),
            amount: balance.amount,
            amount_usd: balance.amount_usd,
        }
    }
}

/// A client's share of one asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedAssetValue {
    pub allocation_id: String,
    pub asset_type: CustodyAssetType,
    pub asset_id: String,
    pub asset_identifier: String,
    pub asset_name: Option<String>,
    pub allocation_type: AllocationType,
    /// Percentage or USD amount, depending on `allocation_type`
    pub allocation_value: Decimal,
    /// Current USD value of the whole asset
    pub total_asset_value: Decimal,
    /// USD value attributed to the client
    pub client_value: Decimal,
    pub balances: Vec<TokenBalance>,
}

/// Current valuation of one client's portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientPortfolio {
    pub client_id: String,
    pub assets: Vec<AllocatedAssetValue>,
    /// Sum over wallet allocations
    pub crypto_value: Decimal,
    /// Sum over account allocations
    pub traditional_value: Decimal,
    pub total_value: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl ClientPortfolio {
    pub fn empty(client_id: &str, calculated_at: DateTime<Utc>) -> Self {
        Self {
            client_id: client_id.to_string(),
            assets: Vec::new(),
            crypto_value: Decimal::ZERO,
            traditional_value: Decimal::ZERO,
            total_value: Decimal::ZERO,
            calculated_at,
        }
    }
}

/// How much of one asset is claimed by active allocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocationSummary {
    pub asset_type: CustodyAssetType,
    pub asset_id: String,
    pub asset_identifier: String,
    pub total_value: Decimal,
    /// Sum of active percentage allocations
    pub allocated_percentage: Decimal,
    /// Sum of active fixed amounts, each capped at the asset value
    pub fixed_amount_total: Decimal,
    /// Claimed value, never more than `total_value`
    pub allocated_value: Decimal,
    pub unallocated_value: Decimal,
    pub active_allocations: usize,
    pub client_count: usize,
}

/// Book-wide view of assets under management and how much is allocated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookAllocationSummary {
    pub assets: Vec<AssetAllocationSummary>,
    pub total_aum: Decimal,
    pub crypto_aum: Decimal,
    pub traditional_aum: Decimal,
    pub allocated_value: Decimal,
    pub unallocated_value: Decimal,
    pub calculated_at: DateTime<Utc>,
}
