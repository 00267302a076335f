//! Custody assets module - wallets, traditional accounts and their balances.

mod custody_model;
mod custody_traits;

pub use custody_model::*;
pub use custody_traits::CustodyAssetRepositoryTrait;
