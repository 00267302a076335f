//! Custody asset repository trait.

use super::custody_model::{AssetKey, CustodyAsset, CustodyAssetType};
use crate::errors::Result;

/// Read access to custody assets and their current balances.
///
/// Balances are refreshed by external sync jobs; the engine only reads them.
/// Implementations return balances already resolved to USD where applicable.
pub trait CustodyAssetRepositoryTrait: Send + Sync {
    /// Retrieves an asset with its balances. Returns `None` when it does not exist.
    fn get_by_key(&self, key: &AssetKey) -> Result<Option<CustodyAsset>>;

    /// Lists assets with their balances, optionally filtered by type.
    fn list(&self, asset_type: Option<CustodyAssetType>) -> Result<Vec<CustodyAsset>>;
}
