//! Book composition: asset-class, chain and currency breakdowns with
//! concentration metrics.

mod composition_calculator;
mod composition_model;
mod composition_service;
mod composition_traits;

pub use composition_calculator::{calculate_composition, calculate_concentration, percentage_of};
pub use composition_model::*;
pub use composition_service::CompositionService;
pub use composition_traits::CompositionServiceTrait;
