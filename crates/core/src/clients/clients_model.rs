//! Client domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl ClientStatus {
    /// Only active clients may receive new allocations.
    pub fn accepts_allocations(&self) -> bool {
        matches!(self, ClientStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "ACTIVE",
            ClientStatus::Inactive => "INACTIVE",
            ClientStatus::Suspended => "SUSPENDED",
        }
    }
}

/// Domain model representing a client whose portfolio is built from allocations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub status: ClientStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
