//! Book composition and concentration models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::custody::AssetClass;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassBreakdown {
    pub asset_class: AssetClass,
    pub value: Decimal,
    pub percentage: Decimal,
}

/// Wallet balances on one chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainBreakdown {
    pub chain: String,
    pub value: Decimal,
    /// Distinct wallets holding a balance on this chain
    pub wallet_count: usize,
    pub percentage: Decimal,
}

/// Account balances in one currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBreakdown {
    pub currency: String,
    /// Amount in the currency itself
    pub amount: Decimal,
    /// Amount converted to USD
    pub value: Decimal,
    pub account_count: usize,
    pub percentage: Decimal,
}

/// Concentration of value across holdings (chain groups and currency groups).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationMetrics {
    /// Label of the largest holding, if any
    pub top_holding: Option<String>,
    pub top_asset_percentage: Decimal,
    pub top5_percentage: Decimal,
    pub top10_percentage: Decimal,
    /// Sum of squared shares, in [0, 1]
    pub herfindahl_index: Decimal,
    pub holdings_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionBreakdown {
    pub total_value: Decimal,
    pub crypto_value: Decimal,
    pub traditional_value: Decimal,
    pub asset_classes: Vec<AssetClassBreakdown>,
    pub chains: Vec<ChainBreakdown>,
    pub currencies: Vec<CurrencyBreakdown>,
    pub concentration: ConcentrationMetrics,
    pub calculated_at: DateTime<Utc>,
}

/// A single holding fed into the concentration metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub label: String,
    pub value: Decimal,
}

impl Holding {
    pub fn new(label: impl Into<String>, value: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}
