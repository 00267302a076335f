//! Risk analytics: volatility, Sharpe/Sortino/Calmar and drawdown over
//! portfolio snapshots.

mod risk_calculator;
mod risk_model;
mod risk_service;
mod risk_traits;

pub use risk_calculator::{
    annualization_factor, calculate_risk_metrics, drawdown_metrics, population_stats,
    risk_rating, volatility_metrics, volatility_tier, RiskParameters,
};
pub use risk_model::*;
pub use risk_service::RiskService;
pub use risk_traits::RiskServiceTrait;
