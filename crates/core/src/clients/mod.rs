//! Clients module - domain models and repository traits.

mod clients_model;
mod clients_traits;

pub use clients_model::{Client, ClientStatus};
pub use clients_traits::ClientRepositoryTrait;
