use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use uuid::Uuid;

use super::allocations_errors::AllocationError;
use super::allocations_model::*;
use super::allocations_traits::{AllocationRepositoryTrait, AllocationServiceTrait};
use super::allocations_validator::AllocationValidator;
use super::asset_locks::AssetLocks;
use super::conflict_scanner::{client_name_index, find_allocation_conflicts};
use crate::clients::ClientRepositoryTrait;
use crate::custody::{AssetKey, CustodyAssetRepositoryTrait};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::settings::{read_settings, SharedSettings};
use crate::utils::time_utils::valuation_date_today;

/// Service for creating, updating and ending allocations.
pub struct AllocationService {
    allocation_repository: Arc<dyn AllocationRepositoryTrait>,
    client_repository: Arc<dyn ClientRepositoryTrait>,
    asset_repository: Arc<dyn CustodyAssetRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    settings: SharedSettings,
    asset_locks: AssetLocks,
}

impl AllocationService {
    pub fn new(
        allocation_repository: Arc<dyn AllocationRepositoryTrait>,
        client_repository: Arc<dyn ClientRepositoryTrait>,
        asset_repository: Arc<dyn CustodyAssetRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        settings: SharedSettings,
    ) -> Self {
        Self {
            allocation_repository,
            client_repository,
            asset_repository,
            event_sink,
            settings,
            asset_locks: AssetLocks::new(),
        }
    }

    fn validator(&self) -> AllocationValidator {
        AllocationValidator::new(read_settings(&self.settings).allocation_warning_threshold)
    }

    fn asset_exists(&self, key: &AssetKey) -> Result<bool> {
        Ok(self.asset_repository.get_by_key(key)?.is_some())
    }

    fn require_active_allocation(&self, allocation_id: &str) -> Result<Allocation> {
        let allocation = self.get_allocation(allocation_id)?;
        if !allocation.is_active() {
            return Err(AllocationError::AlreadyEnded(allocation_id.to_string()).into());
        }
        Ok(allocation)
    }

    /// Runs the validator against the asset's current allocations and turns
    /// errors into a rejection. Callers must hold the asset's write lock.
    fn check_candidate(&self, request: &AllocationValidationRequest) -> Result<()> {
        let allocations = self
            .allocation_repository
            .list(&AllocationFilter::for_asset(&request.asset_key()))?;

        // Existence was checked by the caller.
        let validation = self.validator().validate(request, true, true, &allocations);

        for warning in &validation.warnings {
            warn!("Allocation warning for client {}: {}", request.client_id, warning);
        }
        if !validation.valid {
            return Err(AllocationError::Rejected(validation.errors).into());
        }
        Ok(())
    }
}

#[async_trait]
impl AllocationServiceTrait for AllocationService {
    fn validate_allocation(
        &self,
        request: &AllocationValidationRequest,
    ) -> Result<AllocationValidation> {
        let key = request.asset_key();
        let client_exists = self.client_repository.get_by_id(&request.client_id)?.is_some();
        let asset_exists = self.asset_exists(&key)?;
        let allocations = if client_exists && asset_exists {
            self.allocation_repository
                .list(&AllocationFilter::for_asset(&key))?
        } else {
            Vec::new()
        };

        Ok(self
            .validator()
            .validate(request, client_exists, asset_exists, &allocations))
    }

    async fn create_allocation(&self, new_allocation: NewAllocation) -> Result<Allocation> {
        new_allocation.validate()?;

        let client = self
            .client_repository
            .get_by_id(&new_allocation.client_id)?
            .ok_or_else(|| Error::NotFound(format!("Client {}", new_allocation.client_id)))?;
        if !client.status.accepts_allocations() {
            return Err(AllocationError::ClientNotActive {
                client_id: client.id,
                status: client.status.as_str().to_string(),
            }
            .into());
        }

        let key = new_allocation.asset_key();
        if !self.asset_exists(&key)? {
            return Err(Error::NotFound(format!("Asset {}", key)));
        }

        let _guard = self.asset_locks.acquire(&key).await;
        self.check_candidate(&AllocationValidationRequest::from(&new_allocation))?;

        let mut to_insert = new_allocation;
        if to_insert.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            to_insert.id = Some(Uuid::new_v4().to_string());
        }
        let created = self.allocation_repository.create(to_insert).await?;
        debug!(
            "Created {:?} allocation {} of {} for client {} on {}",
            created.allocation_type, created.id, created.value, created.client_id, key
        );

        self.event_sink.emit(DomainEvent::allocation_created(
            created.id.clone(),
            created.client_id.clone(),
            key,
        ));
        Ok(created)
    }

    async fn update_allocation(&self, update: AllocationUpdate) -> Result<Allocation> {
        update.validate()?;

        let key = self.require_active_allocation(&update.id)?.asset_key();
        let _guard = self.asset_locks.acquire(&key).await;

        // Re-read under the lock: the allocation may have been ended meanwhile.
        let existing = self.require_active_allocation(&update.id)?;
        if self
            .client_repository
            .get_by_id(&existing.client_id)?
            .is_none()
        {
            return Err(Error::NotFound(format!("Client {}", existing.client_id)));
        }
        if !self.asset_exists(&key)? {
            return Err(Error::NotFound(format!("Asset {}", key)));
        }

        self.check_candidate(&AllocationValidationRequest {
            client_id: existing.client_id.clone(),
            asset_type: existing.asset_type,
            asset_id: existing.asset_id.clone(),
            allocation_type: update.allocation_type,
            value: update.value,
            start_date: update.start_date,
            exclude_allocation_id: Some(existing.id.clone()),
        })?;

        let updated = self.allocation_repository.update(update).await?;
        debug!("Updated allocation {} on {}", updated.id, key);

        self.event_sink.emit(DomainEvent::allocation_updated(
            updated.id.clone(),
            updated.client_id.clone(),
            key,
        ));
        Ok(updated)
    }

    async fn end_allocation(&self, request: EndAllocation) -> Result<Allocation> {
        let key = self.get_allocation(&request.id)?.asset_key();
        let _guard = self.asset_locks.acquire(&key).await;

        let existing = self.require_active_allocation(&request.id)?;
        if request.end_date < existing.start_date {
            return Err(AllocationError::EndBeforeStart {
                start_date: existing.start_date,
                end_date: request.end_date,
            }
            .into());
        }
        let today = valuation_date_today();
        if request.end_date > today {
            return Err(AllocationError::EndInFuture {
                end_date: request.end_date,
                today,
            }
            .into());
        }

        let ended = self
            .allocation_repository
            .end(&request.id, request.end_date, request.notes)
            .await?;
        debug!(
            "Ended allocation {} on {} as of {}",
            ended.id, key, request.end_date
        );

        self.event_sink.emit(DomainEvent::allocation_ended(
            ended.id.clone(),
            ended.client_id.clone(),
            key,
        ));
        Ok(ended)
    }

    fn get_allocation(&self, allocation_id: &str) -> Result<Allocation> {
        self.allocation_repository
            .get_by_id(allocation_id)?
            .ok_or_else(|| Error::NotFound(format!("Allocation {}", allocation_id)))
    }

    fn list_allocations(&self, filter: &AllocationFilter) -> Result<Vec<Allocation>> {
        self.allocation_repository.list(filter)
    }

    fn find_conflicts(&self) -> Result<Vec<AllocationConflict>> {
        let active = self
            .allocation_repository
            .list(&AllocationFilter::all_active())?;
        let client_names = client_name_index(&self.client_repository.list(None)?);
        let asset_identifiers: HashMap<AssetKey, String> = self
            .asset_repository
            .list(None)?
            .into_iter()
            .map(|asset| (asset.key(), asset.identifier))
            .collect();

        let conflicts = find_allocation_conflicts(&active, &client_names, &asset_identifiers);
        debug!(
            "Conflict scan over {} active allocation(s) found {} conflict(s)",
            active.len(),
            conflicts.len()
        );
        Ok(conflicts)
    }
}
