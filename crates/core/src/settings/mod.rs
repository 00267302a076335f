//! Analytics settings - tunable parameters shared by the services.

mod settings_model;

pub use settings_model::*;
