use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::composition_model::*;
use crate::constants::{BASE_CURRENCY, DECIMAL_PRECISION, DISPLAY_DECIMAL_PRECISION};
use crate::custody::{AssetBalance, AssetClass, CustodyAsset, CustodyAssetType};
use crate::fx::{normalize_currency_code, CurrencyConverter};

/// `part / total` as a percentage, 0 when `total` is not positive.
pub fn percentage_of(part: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part / total * dec!(100)).round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Top-N shares and the Herfindahl index over a set of holdings.
///
/// Non-positive holdings are ignored. A zero total gives all-zero metrics.
pub fn calculate_concentration(holdings: &[Holding]) -> ConcentrationMetrics {
    let mut positive: Vec<&Holding> = holdings
        .iter()
        .filter(|h| h.value > Decimal::ZERO)
        .collect();
    positive.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));

    let total: Decimal = positive.iter().map(|h| h.value).sum();
    if total.is_zero() {
        return ConcentrationMetrics {
            holdings_count: positive.len(),
            ..Default::default()
        };
    }

    let top_n = |n: usize| -> Decimal { positive.iter().take(n).map(|h| h.value).sum() };
    let herfindahl_index: Decimal = positive
        .iter()
        .map(|h| {
            let share = h.value / total;
            share * share
        })
        .sum();

    ConcentrationMetrics {
        top_holding: positive.first().map(|h| h.label.clone()),
        top_asset_percentage: percentage_of(top_n(1), total),
        top5_percentage: percentage_of(top_n(5), total),
        top10_percentage: percentage_of(top_n(10), total),
        // Rounding can push a single dominant share a hair past 1.
        herfindahl_index: herfindahl_index.round_dp(DECIMAL_PRECISION).min(Decimal::ONE),
        holdings_count: positive.len(),
    }
}

/// Keeps the most recent balance per currency for one account.
fn latest_account_balances(asset: &CustodyAsset) -> Vec<&AssetBalance> {
    let mut latest: HashMap<String, &AssetBalance> = HashMap::new();
    for balance in &asset.balances {
        let currency = normalize_currency_code(&balance.chain_or_currency);
        match latest.get(&currency) {
            Some(existing) if existing.last_updated >= balance.last_updated => {}
            _ => {
                latest.insert(currency, balance);
            }
        }
    }
    latest.into_values().collect()
}

fn account_balance_usd(balance: &AssetBalance, converter: &CurrencyConverter) -> Decimal {
    let currency = normalize_currency_code(&balance.chain_or_currency);
    if currency == BASE_CURRENCY {
        return balance.amount;
    }
    match converter.to_usd(balance.amount, &currency) {
        Some(value) => value,
        None => {
            warn!(
                "No {} rate for {}. Using recorded USD amount {}.",
                BASE_CURRENCY, currency, balance.amount_usd
            );
            balance.amount_usd
        }
    }
}

#[derive(Default)]
struct ChainAccumulator<'a> {
    value: Decimal,
    wallets: HashSet<&'a str>,
}

#[derive(Default)]
struct CurrencyAccumulator<'a> {
    amount: Decimal,
    value: Decimal,
    accounts: HashSet<&'a str>,
}

/// Book-wide composition: asset-class split, per-chain wallet totals,
/// per-currency account totals and the concentration across those groups.
pub fn calculate_composition(
    assets: &[CustodyAsset],
    converter: &CurrencyConverter,
    calculated_at: DateTime<Utc>,
) -> CompositionBreakdown {
    let mut chains: BTreeMap<String, ChainAccumulator> = BTreeMap::new();
    let mut currencies: BTreeMap<String, CurrencyAccumulator> = BTreeMap::new();

    for asset in assets {
        match asset.asset_type {
            CustodyAssetType::Wallet => {
                for balance in &asset.balances {
                    let entry = chains
                        .entry(balance.chain_or_currency.trim().to_lowercase())
                        .or_default();
                    entry.value += asset.asset_type.balance_value(balance);
                    entry.wallets.insert(asset.id.as_str());
                }
            }
            CustodyAssetType::Account => {
                for balance in latest_account_balances(asset) {
                    let entry = currencies
                        .entry(normalize_currency_code(&balance.chain_or_currency))
                        .or_default();
                    entry.amount += balance.amount;
                    entry.value += account_balance_usd(balance, converter);
                    entry.accounts.insert(asset.id.as_str());
                }
            }
        }
    }

    let crypto_value: Decimal = chains.values().map(|c| c.value).sum();
    let traditional_value: Decimal = currencies.values().map(|c| c.value).sum();
    let total_value = crypto_value + traditional_value;

    let asset_classes = vec![
        AssetClassBreakdown {
            asset_class: AssetClass::Crypto,
            value: crypto_value,
            percentage: percentage_of(crypto_value, total_value),
        },
        AssetClassBreakdown {
            asset_class: AssetClass::Traditional,
            value: traditional_value,
            percentage: percentage_of(traditional_value, total_value),
        },
    ];

    let mut chain_rows: Vec<ChainBreakdown> = chains
        .into_iter()
        .map(|(chain, acc)| ChainBreakdown {
            percentage: percentage_of(acc.value, total_value),
            chain,
            value: acc.value,
            wallet_count: acc.wallets.len(),
        })
        .collect();
    chain_rows.sort_by(|a, b| b.value.cmp(&a.value));

    let mut currency_rows: Vec<CurrencyBreakdown> = currencies
        .into_iter()
        .map(|(currency, acc)| CurrencyBreakdown {
            percentage: percentage_of(acc.value, total_value),
            currency,
            amount: acc.amount,
            value: acc.value,
            account_count: acc.accounts.len(),
        })
        .collect();
    currency_rows.sort_by(|a, b| b.value.cmp(&a.value));

    let holdings: Vec<Holding> = chain_rows
        .iter()
        .map(|c| Holding::new(c.chain.clone(), c.value))
        .chain(
            currency_rows
                .iter()
                .map(|c| Holding::new(c.currency.clone(), c.value)),
        )
        .collect();

    CompositionBreakdown {
        total_value,
        crypto_value,
        traditional_value,
        asset_classes,
        chains: chain_rows,
        currencies: currency_rows,
        concentration: calculate_concentration(&holdings),
        calculated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn balance(chain_or_currency: &str, amount: Decimal, amount_usd: Decimal) -> AssetBalance {
        AssetBalance {
            chain_or_currency: chain_or_currency.to_string(),
            symbol: chain_or_currency.to_uppercase(),
            amount,
            amount_usd,
            last_updated: Utc::now(),
        }
    }

    fn asset(asset_type: CustodyAssetType, id: &str, balances: Vec<AssetBalance>) -> CustodyAsset {
        CustodyAsset {
            id: id.to_string(),
            asset_type,
            identifier: id.to_string(),
            name: None,
            balances,
        }
    }

    #[test]
    fn test_single_holding_is_fully_concentrated() {
        let assets = vec![asset(
            CustodyAssetType::Wallet,
            "w1",
            vec![balance("ethereum", dec!(0.5), dec!(1000))],
        )];
        let composition = calculate_composition(&assets, &CurrencyConverter::new(), Utc::now());

        assert_eq!(composition.total_value, dec!(1000));
        assert_eq!(composition.concentration.herfindahl_index, dec!(1.0));
        assert_eq!(composition.concentration.top_asset_percentage, dec!(100.0));
        assert_eq!(composition.concentration.top_holding.as_deref(), Some("ethereum"));
    }

    #[test]
    fn test_empty_book_has_zero_metrics() {
        let composition = calculate_composition(&[], &CurrencyConverter::new(), Utc::now());
        assert_eq!(composition.total_value, Decimal::ZERO);
        assert!(composition
            .asset_classes
            .iter()
            .all(|c| c.percentage.is_zero()));
        assert_eq!(composition.concentration, ConcentrationMetrics::default());
    }

    #[test]
    fn test_equal_holdings_approach_one_over_n() {
        let holdings: Vec<Holding> = (0..4)
            .map(|i| Holding::new(format!("h{}", i), dec!(250)))
            .collect();
        let metrics = calculate_concentration(&holdings);
        assert_eq!(metrics.herfindahl_index, dec!(0.25));
        assert_eq!(metrics.top_asset_percentage, dec!(25));
        assert_eq!(metrics.top5_percentage, dec!(100));
        assert_eq!(metrics.holdings_count, 4);
    }

    #[test]
    fn test_chains_count_distinct_wallets() {
        let assets = vec![
            asset(
                CustodyAssetType::Wallet,
                "w1",
                vec![
                    balance("ethereum", dec!(1), dec!(3000)),
                    balance("Ethereum", dec!(500), dec!(500)),
                ],
            ),
            asset(
                CustodyAssetType::Wallet,
                "w2",
                vec![
                    balance("ethereum", dec!(0.5), dec!(1500)),
                    balance("bitcoin", dec!(0.1), dec!(5000)),
                ],
            ),
        ];
        let composition = calculate_composition(&assets, &CurrencyConverter::new(), Utc::now());

        assert_eq!(composition.chains.len(), 2);
        assert_eq!(composition.chains[0].chain, "bitcoin");
        let eth = &composition.chains[1];
        assert_eq!(eth.value, dec!(5000));
        assert_eq!(eth.wallet_count, 2);
        assert_eq!(eth.percentage, dec!(50));
        assert_eq!(composition.crypto_value, dec!(10000));
        assert_eq!(composition.traditional_value, Decimal::ZERO);
    }

    #[test]
    fn test_accounts_convert_latest_balance_per_currency() {
        let mut stale = balance("EUR", dec!(100), dec!(100));
        stale.last_updated = Utc::now() - Duration::days(2);
        let accounts = vec![
            asset(
                CustodyAssetType::Account,
                "a1",
                vec![stale, balance("EUR", dec!(1000), dec!(0))],
            ),
            asset(
                CustodyAssetType::Account,
                "a2",
                vec![balance("usd", dec!(500), dec!(500))],
            ),
            // No CHF rate: falls back to the recorded USD amount.
            asset(
                CustodyAssetType::Account,
                "a3",
                vec![balance("CHF", dec!(100), dec!(112))],
            ),
        ];
        let converter = CurrencyConverter::from_usd_rates([("EUR", dec!(1.1))]);
        let composition = calculate_composition(&accounts, &converter, Utc::now());

        let eur = composition
            .currencies
            .iter()
            .find(|c| c.currency == "EUR")
            .unwrap();
        assert_eq!(eur.amount, dec!(1000));
        assert_eq!(eur.value, dec!(1100));
        assert_eq!(eur.account_count, 1);

        let chf = composition
            .currencies
            .iter()
            .find(|c| c.currency == "CHF")
            .unwrap();
        assert_eq!(chf.value, dec!(112));
        assert_eq!(composition.traditional_value, dec!(1712));
        assert_eq!(composition.concentration.holdings_count, 3);
    }
}
