//! Custodia Core - allocation and portfolio analytics for custody assets.
//!
//! This crate contains the allocation rules and the valuation, composition,
//! performance and risk analytics. It is database-agnostic and defines
//! repository traits that storage adapters implement.

pub mod allocations;
pub mod clients;
pub mod constants;
pub mod custody;
pub mod errors;
pub mod events;
pub mod fx;
pub mod portfolio;
pub mod settings;
pub mod utils;

// Re-export common types from the portfolio modules
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
