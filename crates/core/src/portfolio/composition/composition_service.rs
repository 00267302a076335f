use std::sync::{Arc, RwLock};

use chrono::Utc;
use log::{debug, warn};

use super::composition_calculator::calculate_composition;
use super::composition_model::CompositionBreakdown;
use super::composition_traits::CompositionServiceTrait;
use crate::custody::CustodyAssetRepositoryTrait;
use crate::errors::Result;
use crate::fx::CurrencyConverter;

pub struct CompositionService {
    asset_repository: Arc<dyn CustodyAssetRepositoryTrait>,
    converter: RwLock<CurrencyConverter>,
}

impl CompositionService {
    pub fn new(
        asset_repository: Arc<dyn CustodyAssetRepositoryTrait>,
        converter: CurrencyConverter,
    ) -> Self {
        Self {
            asset_repository,
            converter: RwLock::new(converter),
        }
    }
}

impl CompositionServiceTrait for CompositionService {
    fn get_composition(&self) -> Result<CompositionBreakdown> {
        let assets = self.asset_repository.list(None)?;
        let composition = {
            let converter = self.converter.read().unwrap_or_else(|poisoned| {
                warn!("Exchange-rate table lock poisoned. Using last written rates.");
                poisoned.into_inner()
            });
            calculate_composition(&assets, &converter, Utc::now())
        };
        debug!(
            "Composition over {} asset(s): total {}, HHI {}",
            assets.len(),
            composition.total_value,
            composition.concentration.herfindahl_index
        );
        Ok(composition)
    }

    fn update_exchange_rates(&self, converter: CurrencyConverter) {
        let mut guard = self
            .converter
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = converter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::{AssetBalance, AssetKey, CustodyAsset, CustodyAssetType};
    use rust_decimal_macros::dec;

    struct MockAssetRepository {
        assets: Vec<CustodyAsset>,
    }

    impl CustodyAssetRepositoryTrait for MockAssetRepository {
        fn get_by_key(&self, key: &AssetKey) -> Result<Option<CustodyAsset>> {
            Ok(self.assets.iter().find(|a| &a.key() == key).cloned())
        }

        fn list(&self, asset_type: Option<CustodyAssetType>) -> Result<Vec<CustodyAsset>> {
            Ok(self
                .assets
                .iter()
                .filter(|a| asset_type.map_or(true, |t| a.asset_type == t))
                .cloned()
                .collect())
        }
    }

    fn service() -> CompositionService {
        let assets = vec![
            CustodyAsset {
                id: "w1".to_string(),
                asset_type: CustodyAssetType::Wallet,
                identifier: "0xw1".to_string(),
                name: None,
                balances: vec![AssetBalance {
                    chain_or_currency: "ethereum".to_string(),
                    symbol: "ETH".to_string(),
                    amount: dec!(1),
                    amount_usd: dec!(3000),
                    last_updated: Utc::now(),
                }],
            },
            CustodyAsset {
                id: "a1".to_string(),
                asset_type: CustodyAssetType::Account,
                identifier: "GB00".to_string(),
                name: None,
                balances: vec![AssetBalance {
                    chain_or_currency: "GBP".to_string(),
                    symbol: "GBP".to_string(),
                    amount: dec!(1000),
                    amount_usd: dec!(1200),
                    last_updated: Utc::now(),
                }],
            },
        ];
        CompositionService::new(
            Arc::new(MockAssetRepository { assets }),
            CurrencyConverter::new(),
        )
    }

    #[test]
    fn test_missing_rate_uses_recorded_usd_amount() {
        let composition = service().get_composition().unwrap();
        assert_eq!(composition.traditional_value, dec!(1200));
        assert_eq!(composition.total_value, dec!(4200));
    }

    #[test]
    fn test_updated_rates_apply_to_next_read() {
        let svc = service();
        svc.update_exchange_rates(CurrencyConverter::from_usd_rates([("GBP", dec!(1.25))]));

        let composition = svc.get_composition().unwrap();
        assert_eq!(composition.traditional_value, dec!(1250));
        assert_eq!(composition.asset_classes[1].value, dec!(1250));
    }
}
