//! Allocations module - client claims on custody assets, their validation
//! and the book-wide over-allocation audit.

mod allocations_errors;
mod allocations_model;
mod allocations_service;
mod allocations_traits;
mod allocations_validator;
mod asset_locks;
mod conflict_scanner;

pub use allocations_errors::AllocationError;
pub use allocations_model::*;
pub use allocations_service::AllocationService;
pub use allocations_traits::{AllocationRepositoryTrait, AllocationServiceTrait};
pub use allocations_validator::AllocationValidator;
pub use asset_locks::AssetLocks;
pub use conflict_scanner::{client_name_index, find_allocation_conflicts};
