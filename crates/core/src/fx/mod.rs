//! FX module - spot rate table for converting account balances to USD.

pub mod currency_converter;

pub use currency_converter::{normalize_currency_code, CurrencyConverter};
