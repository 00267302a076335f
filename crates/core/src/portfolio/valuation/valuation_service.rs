use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::debug;

use super::valuation_calculator::{calculate_book_summary, calculate_client_portfolio};
use super::valuation_model::{BookAllocationSummary, ClientPortfolio};
use super::valuation_traits::PortfolioValuationServiceTrait;
use crate::allocations::{AllocationFilter, AllocationRepositoryTrait};
use crate::clients::ClientRepositoryTrait;
use crate::custody::{AssetKey, CustodyAsset, CustodyAssetRepositoryTrait};
use crate::errors::{Error, Result};
use crate::portfolio::snapshot::PortfolioSnapshot;

pub struct PortfolioValuationService {
    client_repository: Arc<dyn ClientRepositoryTrait>,
    asset_repository: Arc<dyn CustodyAssetRepositoryTrait>,
    allocation_repository: Arc<dyn AllocationRepositoryTrait>,
}

impl PortfolioValuationService {
    pub fn new(
        client_repository: Arc<dyn ClientRepositoryTrait>,
        asset_repository: Arc<dyn CustodyAssetRepositoryTrait>,
        allocation_repository: Arc<dyn AllocationRepositoryTrait>,
    ) -> Self {
        Self {
            client_repository,
            asset_repository,
            allocation_repository,
        }
    }
}

impl PortfolioValuationServiceTrait for PortfolioValuationService {
    fn get_client_portfolio(&self, client_id: &str) -> Result<ClientPortfolio> {
        if self.client_repository.get_by_id(client_id)?.is_none() {
            return Err(Error::NotFound(format!("Client {}", client_id)));
        }

        let allocations = self
            .allocation_repository
            .list(&AllocationFilter::active_for_client(client_id))?;
        if allocations.is_empty() {
            debug!("Client {} has no active allocations", client_id);
            return Ok(ClientPortfolio::empty(client_id, Utc::now()));
        }

        // Only fetch the assets the client is actually allocated to.
        let mut assets: HashMap<AssetKey, CustodyAsset> = HashMap::new();
        for allocation in &allocations {
            let key = allocation.asset_key();
            if assets.contains_key(&key) {
                continue;
            }
            if let Some(asset) = self.asset_repository.get_by_key(&key)? {
                assets.insert(key, asset);
            }
        }

        let portfolio = calculate_client_portfolio(client_id, &allocations, &assets, Utc::now());
        debug!(
            "Valued client {} across {} asset(s): total {}",
            client_id,
            portfolio.assets.len(),
            portfolio.total_value
        );
        Ok(portfolio)
    }

    fn get_book_allocation_summary(&self) -> Result<BookAllocationSummary> {
        let assets = self.asset_repository.list(None)?;
        let allocations = self
            .allocation_repository
            .list(&AllocationFilter::all_active())?;
        Ok(calculate_book_summary(&assets, &allocations, Utc::now()))
    }

    fn capture_snapshot(
        &self,
        client_id: Option<&str>,
        snapshot_date: NaiveDate,
    ) -> Result<PortfolioSnapshot> {
        let snapshot = match client_id {
            Some(id) => {
                PortfolioSnapshot::from_client_portfolio(&self.get_client_portfolio(id)?, snapshot_date)
            }
            None => PortfolioSnapshot::from_book_summary(
                &self.get_book_allocation_summary()?,
                snapshot_date,
            ),
        };
        debug!(
            "Captured snapshot for {} on {}: {}",
            client_id.unwrap_or("book"),
            snapshot_date,
            snapshot.total_value
        );
        Ok(snapshot)
    }
}
