//! Current portfolio valuation: per-client portfolios and the book-wide
//! allocation summary.

mod valuation_calculator;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use valuation_calculator::{
    calculate_book_summary, calculate_client_portfolio, capped_allocated_value,
    client_allocated_value,
};
pub use valuation_model::*;
pub use valuation_service::PortfolioValuationService;
pub use valuation_traits::PortfolioValuationServiceTrait;
