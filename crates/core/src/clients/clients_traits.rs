//! Client repository trait.

use super::clients_model::{Client, ClientStatus};
use crate::errors::Result;

/// Read access to clients.
///
/// Client CRUD lives outside the engine; the analytics only need lookups.
pub trait ClientRepositoryTrait: Send + Sync {
    /// Retrieves a client by its ID. Returns `None` when it does not exist.
    fn get_by_id(&self, client_id: &str) -> Result<Option<Client>>;

    /// Lists clients, optionally filtered by status.
    fn list(&self, status_filter: Option<ClientStatus>) -> Result<Vec<Client>>;
}
