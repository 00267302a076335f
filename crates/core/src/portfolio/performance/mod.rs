//! Historical performance over portfolio snapshots.

mod performance_calculator;
mod performance_model;
mod performance_service;
mod performance_traits;

pub use performance_calculator::{
    annualized_return, calculate_performance, downsample, filter_snapshots, fractional_returns,
};
pub use performance_model::*;
pub use performance_service::PerformanceService;
pub use performance_traits::PerformanceServiceTrait;

#[cfg(test)]
mod performance_service_tests;
