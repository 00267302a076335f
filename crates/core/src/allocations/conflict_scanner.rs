//! Book-wide audit for assets allocated beyond 100%.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use rust_decimal::Decimal;

use super::allocations_model::{Allocation, AllocationConflict, ConflictingAllocation};
use crate::clients::Client;
use crate::constants::MAX_ALLOCATED_PERCENTAGE;
use crate::custody::AssetKey;

/// Groups active percentage allocations by asset and reports every asset
/// whose total exceeds 100%.
///
/// `client_names` and `asset_identifiers` only enrich the report; missing
/// entries leave the name or identifier empty. An empty result is the normal
/// state of a healthy book.
pub fn find_allocation_conflicts(
    allocations: &[Allocation],
    client_names: &HashMap<String, String>,
    asset_identifiers: &HashMap<AssetKey, String>,
) -> Vec<AllocationConflict> {
    let mut by_asset: BTreeMap<AssetKey, Vec<&Allocation>> = BTreeMap::new();
    for allocation in allocations.iter().filter(|a| a.is_active_percentage()) {
        by_asset
            .entry(allocation.asset_key())
            .or_default()
            .push(allocation);
    }

    let limit = Decimal::from(MAX_ALLOCATED_PERCENTAGE);
    let mut conflicts = Vec::new();

    for (key, group) in by_asset {
        let total_percentage: Decimal = group.iter().map(|a| a.value).sum();
        if total_percentage <= limit {
            continue;
        }

        warn!(
            "Asset {} is over-allocated: {}% across {} allocation(s)",
            key,
            total_percentage,
            group.len()
        );

        let mut members: Vec<ConflictingAllocation> = group
            .iter()
            .map(|a| ConflictingAllocation {
                allocation_id: a.id.clone(),
                client_id: a.client_id.clone(),
                client_name: client_names.get(&a.client_id).cloned().unwrap_or_default(),
                value: a.value,
                start_date: a.start_date,
            })
            .collect();
        members.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.allocation_id.cmp(&b.allocation_id))
        });

        conflicts.push(AllocationConflict {
            asset_identifier: asset_identifiers.get(&key).cloned().unwrap_or_default(),
            asset_type: key.asset_type,
            asset_id: key.asset_id,
            total_percentage,
            allocations: members,
        });
    }

    conflicts
}

/// Builds the `client_id -> name` lookup used by the scanner.
pub fn client_name_index(clients: &[Client]) -> HashMap<String, String> {
    clients
        .iter()
        .map(|c| (c.id.clone(), c.name.clone()))
        .collect()
}
