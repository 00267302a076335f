//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::custody::AssetKey;

/// Domain events emitted after successful allocation writes.
///
/// Consumers use them to invalidate cached portfolio views for the affected
/// client and asset. Delivery is best-effort.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A new allocation was created.
    AllocationCreated {
        allocation_id: String,
        client_id: String,
        asset: AssetKey,
    },

    /// An active allocation changed its type, value, start date or notes.
    AllocationUpdated {
        allocation_id: String,
        client_id: String,
        asset: AssetKey,
    },

    /// An allocation was ended and no longer counts towards the portfolio.
    AllocationEnded {
        allocation_id: String,
        client_id: String,
        asset: AssetKey,
    },
}

impl DomainEvent {
    pub fn allocation_created(allocation_id: String, client_id: String, asset: AssetKey) -> Self {
        Self::AllocationCreated {
            allocation_id,
            client_id,
            asset,
        }
    }

    pub fn allocation_updated(allocation_id: String, client_id: String, asset: AssetKey) -> Self {
        Self::AllocationUpdated {
            allocation_id,
            client_id,
            asset,
        }
    }

    pub fn allocation_ended(allocation_id: String, client_id: String, asset: AssetKey) -> Self {
        Self::AllocationEnded {
            allocation_id,
            client_id,
            asset,
        }
    }

    /// Client whose portfolio view is affected.
    pub fn client_id(&self) -> &str {
        match self {
            Self::AllocationCreated { client_id, .. }
            | Self::AllocationUpdated { client_id, .. }
            | Self::AllocationEnded { client_id, .. } => client_id,
        }
    }

    /// Asset whose allocated total is affected.
    pub fn asset(&self) -> &AssetKey {
        match self {
            Self::AllocationCreated { asset, .. }
            | Self::AllocationUpdated { asset, .. }
            | Self::AllocationEnded { asset, .. } => asset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_serialization() {
        let event = DomainEvent::allocation_created(
            "alloc-1".to_string(),
            "client-1".to_string(),
            AssetKey::wallet("w-1"),
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"allocation_created\""));
        assert!(json.contains("\"assetType\":\"WALLET\""));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_accessors() {
        let event = DomainEvent::allocation_ended(
            "alloc-2".to_string(),
            "client-7".to_string(),
            AssetKey::account("a-3"),
        );
        assert_eq!(event.client_id(), "client-7");
        assert_eq!(event.asset(), &AssetKey::account("a-3"));
    }
}
