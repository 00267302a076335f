use super::composition_model::CompositionBreakdown;
use crate::errors::Result;
use crate::fx::CurrencyConverter;

/// Book composition over current custody balances.
pub trait CompositionServiceTrait: Send + Sync {
    /// Book-wide composition and concentration over current balances.
    fn get_composition(&self) -> Result<CompositionBreakdown>;

    /// Replaces the exchange-rate table used for account balances.
    fn update_exchange_rates(&self, converter: CurrencyConverter);
}
