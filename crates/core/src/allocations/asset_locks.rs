//! Per-asset write serialization for allocation writes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::custody::AssetKey;

/// Registry of async locks keyed by asset.
///
/// Allocation writes hold the asset's guard across read, validate and write,
/// so two writers on the same asset cannot both validate against a stale
/// percentage total. Writers on different assets never contend.
#[derive(Default)]
pub struct AssetLocks {
    locks: DashMap<AssetKey, Arc<Mutex<()>>>,
}

impl AssetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access to `key`.
    pub async fn acquire(&self, key: &AssetKey) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the DashMap shard is released before awaiting.
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Number of assets that have been written to.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_asset_is_exclusive() {
        let locks = Arc::new(AssetLocks::new());
        let key = AssetKey::wallet("w-1");

        let guard = locks.acquire(&key).await;

        let locks_clone = locks.clone();
        let key_clone = key.clone();
        let waiter = tokio::spawn(async move {
            let _guard = locks_clone.acquire(&key_clone).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_different_assets_do_not_contend() {
        let locks = AssetLocks::new();
        let _wallet = locks.acquire(&AssetKey::wallet("x")).await;
        let _account = locks.acquire(&AssetKey::account("x")).await;
        assert_eq!(locks.len(), 2);
    }
}
