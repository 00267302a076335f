//! Allocation repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::allocations_model::{
    Allocation, AllocationConflict, AllocationFilter, AllocationUpdate, AllocationValidation,
    AllocationValidationRequest, EndAllocation, NewAllocation,
};
use crate::errors::Result;

/// Storage contract for allocations.
///
/// The service serializes writes per asset in-process. Implementations shared
/// by several processes should also enforce the percentage total and the
/// single-active-allocation rule transactionally (serializable isolation or a
/// check constraint) and report violations as `DatabaseError::CheckViolation`
/// or `DatabaseError::UniqueViolation`.
#[async_trait]
pub trait AllocationRepositoryTrait: Send + Sync {
    /// Inserts a new active allocation. `new_allocation.id` is always set by the service.
    async fn create(&self, new_allocation: NewAllocation) -> Result<Allocation>;

    /// Updates type, value, start date and notes of an active allocation.
    async fn update(&self, update: AllocationUpdate) -> Result<Allocation>;

    /// Sets the end date of an active allocation.
    async fn end(
        &self,
        allocation_id: &str,
        end_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Allocation>;

    /// Retrieves an allocation by ID. Returns `None` when it does not exist.
    fn get_by_id(&self, allocation_id: &str) -> Result<Option<Allocation>>;

    /// Lists allocations matching the filter.
    fn list(&self, filter: &AllocationFilter) -> Result<Vec<Allocation>>;
}

/// Allocation operations with business validation.
#[async_trait]
pub trait AllocationServiceTrait: Send + Sync {
    /// Validates a candidate allocation without writing anything.
    fn validate_allocation(
        &self,
        request: &AllocationValidationRequest,
    ) -> Result<AllocationValidation>;

    /// Creates an allocation after validation.
    async fn create_allocation(&self, new_allocation: NewAllocation) -> Result<Allocation>;

    /// Updates an active allocation after validation.
    async fn update_allocation(&self, update: AllocationUpdate) -> Result<Allocation>;

    /// Ends an active allocation.
    async fn end_allocation(&self, request: EndAllocation) -> Result<Allocation>;

    fn get_allocation(&self, allocation_id: &str) -> Result<Allocation>;

    fn list_allocations(&self, filter: &AllocationFilter) -> Result<Vec<Allocation>>;

    /// Scans all active allocations for assets allocated beyond 100%.
    fn find_conflicts(&self) -> Result<Vec<AllocationConflict>>;
}
