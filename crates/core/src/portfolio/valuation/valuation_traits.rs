use chrono::NaiveDate;

use super::valuation_model::{BookAllocationSummary, ClientPortfolio};
use crate::errors::Result;
use crate::portfolio::snapshot::PortfolioSnapshot;

/// Current portfolio valuation for clients and for the whole book.
pub trait PortfolioValuationServiceTrait: Send + Sync {
    /// Values a client's active allocations against current balances.
    ///
    /// A client with no active allocations yields an all-zero portfolio.
    fn get_client_portfolio(&self, client_id: &str) -> Result<ClientPortfolio>;

    /// Book-wide totals and per-asset allocation coverage.
    fn get_book_allocation_summary(&self) -> Result<BookAllocationSummary>;

    /// Builds a snapshot of the current valuation for `snapshot_date`.
    ///
    /// With `client_id` the snapshot covers that client's portfolio, without
    /// it the whole book. Persisting the snapshot is left to the caller.
    fn capture_snapshot(
        &self,
        client_id: Option<&str>,
        snapshot_date: NaiveDate,
    ) -> Result<PortfolioSnapshot>;
}
