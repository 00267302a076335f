//! Portfolio snapshots - dated valuation points consumed by the
//! performance and risk analyzers.

mod snapshot_model;
mod snapshot_traits;

pub use snapshot_model::*;
pub use snapshot_traits::SnapshotRepositoryTrait;
