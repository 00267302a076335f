use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::constants::BASE_CURRENCY;

/// Normalizes a currency code for lookups ("usd " -> "USD").
pub fn normalize_currency_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Spot rates used to express account balances in USD.
///
/// Rates are stored as `(from, to) -> rate`. Lookups try the direct pair and
/// fall back to the inverse of the reverse pair.
#[derive(Debug, Clone, Default)]
pub struct CurrencyConverter {
    rates: HashMap<(String, String), Decimal>,
}

impl CurrencyConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a converter from `currency -> USD` rates.
    pub fn from_usd_rates<I, S>(rates: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut converter = Self::new();
        for (currency, rate) in rates {
            converter.add_rate(currency.as_ref(), BASE_CURRENCY, rate);
        }
        converter
    }

    /// Adds or replaces the rate for a currency pair.
    pub fn add_rate(&mut self, from_currency: &str, to_currency: &str, rate: Decimal) {
        let from = normalize_currency_code(from_currency);
        let to = normalize_currency_code(to_currency);
        if from == to {
            return;
        }
        self.rates.insert((from, to), rate);
    }

    /// Returns the rate converting one unit of `from_currency` into `to_currency`.
    pub fn get_rate(&self, from_currency: &str, to_currency: &str) -> Option<Decimal> {
        let from = normalize_currency_code(from_currency);
        let to = normalize_currency_code(to_currency);
        if from == to {
            return Some(Decimal::ONE);
        }

        if let Some(rate) = self.rates.get(&(from.clone(), to.clone())) {
            return Some(*rate);
        }

        match self.rates.get(&(to, from)) {
            Some(inverse_rate) if !inverse_rate.is_zero() => Some(Decimal::ONE / *inverse_rate),
            _ => None,
        }
    }

    /// Converts an amount, returning `None` when no usable rate exists.
    pub fn convert_amount(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
    ) -> Option<Decimal> {
        let rate = self.get_rate(from_currency, to_currency);
        if rate.is_none() {
            warn!(
                "FX rate missing for {}->{}. Inverse lookup also failed or rate was zero.",
                from_currency, to_currency
            );
        }
        rate.map(|r| amount * r)
    }

    /// Converts an amount to USD.
    pub fn to_usd(&self, amount: Decimal, currency: &str) -> Option<Decimal> {
        self.convert_amount(amount, currency, BASE_CURRENCY)
    }
}
