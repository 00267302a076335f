//! Allocation domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_ALLOCATED_PERCENTAGE;
use crate::custody::{AssetKey, CustodyAssetType};
use crate::errors::{Error, Result, ValidationError};

/// How an allocation value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationType {
    /// Share of the asset's live value, in percent (0, 100]
    Percentage,
    /// Constant USD amount, > 0
    FixedAmount,
}

impl AllocationType {
    /// Checks a value against this type's decoding rule.
    pub fn check_value(&self, value: Decimal) -> Result<()> {
        match self {
            AllocationType::Percentage => {
                if value <= Decimal::ZERO || value > Decimal::from(MAX_ALLOCATED_PERCENTAGE) {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "Percentage allocation must be greater than 0 and at most 100, got {}",
                        value
                    ))));
                }
            }
            AllocationType::FixedAmount => {
                if value <= Decimal::ZERO {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "Fixed amount allocation must be greater than 0, got {}",
                        value
                    ))));
                }
            }
        }
        Ok(())
    }
}

/// A client's claim on a custody asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: String,
    pub client_id: String,
    pub asset_type: CustodyAssetType,
    pub asset_id: String,
    pub allocation_type: AllocationType,
    pub value: Decimal,
    pub start_date: NaiveDate,
    /// `None` while the allocation is active. Set once when ended.
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Allocation {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn is_active_percentage(&self) -> bool {
        self.is_active() && self.allocation_type == AllocationType::Percentage
    }

    pub fn asset_key(&self) -> AssetKey {
        AssetKey::new(self.asset_type, self.asset_id.clone())
    }

    pub fn is_for_asset(&self, key: &AssetKey) -> bool {
        self.asset_type == key.asset_type && self.asset_id == key.asset_id
    }

    /// True when `date` falls inside `[start_date, end_date)`; open-ended when active.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| date < end)
    }
}

/// Input model for creating a new allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub client_id: String,
    pub asset_type: CustodyAssetType,
    pub asset_id: String,
    pub allocation_type: AllocationType,
    pub value: Decimal,
    pub start_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewAllocation {
    /// Validates the new allocation data.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "clientId".to_string(),
            )));
        }
        if self.asset_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "assetId".to_string(),
            )));
        }
        self.allocation_type.check_value(self.value)
    }

    pub fn asset_key(&self) -> AssetKey {
        AssetKey::new(self.asset_type, self.asset_id.clone())
    }
}

/// Input model for updating an active allocation.
///
/// Client and asset are fixed for the allocation's lifetime; moving a share
/// to another client or asset means ending this allocation and creating a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationUpdate {
    pub id: String,
    pub allocation_type: AllocationType,
    pub value: Decimal,
    pub start_date: NaiveDate,
    pub notes: Option<String>,
}

impl AllocationUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Allocation ID is required for updates".to_string(),
            )));
        }
        self.allocation_type.check_value(self.value)
    }
}

/// Request to end an active allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndAllocation {
    pub id: String,
    pub end_date: NaiveDate,
    /// Replaces the allocation's notes when present
    pub notes: Option<String>,
}

/// Query filter for allocation listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationFilter {
    pub client_id: Option<String>,
    pub asset: Option<AssetKey>,
    /// Only allocations with no end date
    pub active_only: bool,
}

impl AllocationFilter {
    pub fn active_for_client(client_id: &str) -> Self {
        Self {
            client_id: Some(client_id.to_string()),
            asset: None,
            active_only: true,
        }
    }

    pub fn for_asset(key: &AssetKey) -> Self {
        Self {
            client_id: None,
            asset: Some(key.clone()),
            active_only: false,
        }
    }

    pub fn all_active() -> Self {
        Self {
            client_id: None,
            asset: None,
            active_only: true,
        }
    }

    pub fn matches(&self, allocation: &Allocation) -> bool {
        if self.active_only && !allocation.is_active() {
            return false;
        }
        if let Some(client_id) = &self.client_id {
            if &allocation.client_id != client_id {
                return false;
            }
        }
        match &self.asset {
            Some(key) => allocation.is_for_asset(key),
            None => true,
        }
    }
}

/// Candidate allocation checked by the validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationValidationRequest {
    pub client_id: String,
    pub asset_type: CustodyAssetType,
    pub asset_id: String,
    pub allocation_type: AllocationType,
    pub value: Decimal,
    pub start_date: NaiveDate,
    /// Allocation being updated, left out of duplicate and total checks
    pub exclude_allocation_id: Option<String>,
}

impl AllocationValidationRequest {
    pub fn asset_key(&self) -> AssetKey {
        AssetKey::new(self.asset_type, self.asset_id.clone())
    }
}

impl From<&NewAllocation> for AllocationValidationRequest {
    fn from(new_allocation: &NewAllocation) -> Self {
        Self {
            client_id: new_allocation.client_id.clone(),
            asset_type: new_allocation.asset_type,
            asset_id: new_allocation.asset_id.clone(),
            allocation_type: new_allocation.allocation_type,
            value: new_allocation.value,
            start_date: new_allocation.start_date,
            exclude_allocation_id: None,
        }
    }
}

/// Outcome of validating a candidate allocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Sum of the other active percentage allocations on the asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_total_percentage: Option<Decimal>,
    /// Sum including the candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_total_percentage: Option<Decimal>,
}

/// An asset whose active percentage allocations add up to more than 100%.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationConflict {
    pub asset_type: CustodyAssetType,
    pub asset_id: String,
    /// Wallet address or account number; empty when the asset is gone
    pub asset_identifier: String,
    pub total_percentage: Decimal,
    pub allocations: Vec<ConflictingAllocation>,
}

/// One of the allocations contributing to a conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictingAllocation {
    pub allocation_id: String,
    pub client_id: String,
    pub client_name: String,
    pub value: Decimal,
    pub start_date: NaiveDate,
}
