//! Custody asset domain models.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Broad class an asset belongs to for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Crypto,
    Traditional,
}

/// Kind of custody asset an allocation points at.
///
/// Each variant carries its own balance-resolution rule, so callers never
/// branch on the type themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustodyAssetType {
    /// Blockchain wallet holding one or more tokens
    Wallet,
    /// Traditional bank or brokerage account
    Account,
}

impl CustodyAssetType {
    pub fn asset_class(&self) -> AssetClass {
        match self {
            CustodyAssetType::Wallet => AssetClass::Crypto,
            CustodyAssetType::Account => AssetClass::Traditional,
        }
    }

    /// Value of a balance line in USD.
    ///
    /// Wallet balances carry a priced USD amount. Account balances are
    /// converted upstream, so their native amount is already in USD.
    pub fn balance_value(&self, balance: &AssetBalance) -> Decimal {
        match self {
            CustodyAssetType::Wallet => balance.amount_usd,
            CustodyAssetType::Account => balance.amount,
        }
    }

    /// Total USD value of an asset from its balances.
    pub fn total_value(&self, balances: &[AssetBalance]) -> Decimal {
        balances.iter().map(|b| self.balance_value(b)).sum()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustodyAssetType::Wallet => "WALLET",
            CustodyAssetType::Account => "ACCOUNT",
        }
    }
}

impl fmt::Display for CustodyAssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a custody asset: (asset type, asset id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetKey {
    pub asset_type: CustodyAssetType,
    pub asset_id: String,
}

impl AssetKey {
    pub fn new(asset_type: CustodyAssetType, asset_id: impl Into<String>) -> Self {
        Self {
            asset_type,
            asset_id: asset_id.into(),
        }
    }

    pub fn wallet(asset_id: impl Into<String>) -> Self {
        Self::new(CustodyAssetType::Wallet, asset_id)
    }

    pub fn account(asset_id: impl Into<String>) -> Self {
        Self::new(CustodyAssetType::Account, asset_id)
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asset_type, self.asset_id)
    }
}

/// A single balance line of a custody asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    /// Chain for wallet balances (e.g. "ethereum"), currency for account balances (e.g. "EUR")
    pub chain_or_currency: String,
    /// Token or currency symbol
    pub symbol: String,
    /// Native amount
    pub amount: Decimal,
    /// Amount in USD as last priced by the sync job
    pub amount_usd: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Domain model for a wallet or traditional account held in custody.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyAsset {
    pub id: String,
    pub asset_type: CustodyAssetType,
    /// Human-facing identifier: wallet address or masked account number
    pub identifier: String,
    pub name: Option<String>,
    pub balances: Vec<AssetBalance>,
}

impl CustodyAsset {
    pub fn key(&self) -> AssetKey {
        AssetKey::new(self.asset_type, self.id.clone())
    }

    pub fn asset_class(&self) -> AssetClass {
        self.asset_type.asset_class()
    }

    /// Total USD value of this asset's balances.
    pub fn total_value(&self) -> Decimal {
        self.asset_type.total_value(&self.balances)
    }
}
