//! Validation of a candidate allocation against the allocations already on its asset.

use log::debug;
use rust_decimal::Decimal;

use super::allocations_model::{
    Allocation, AllocationType, AllocationValidation, AllocationValidationRequest,
};
use crate::constants::{DEFAULT_ALLOCATION_WARNING_THRESHOLD, MAX_ALLOCATED_PERCENTAGE};

/// Checks a candidate allocation against the rules for its asset: active
/// percentage allocations may not sum past 100, and a client holds at most
/// one active allocation per asset.
///
/// This is the single implementation of those rules; write paths call it
/// before touching storage.
#[derive(Debug, Clone)]
pub struct AllocationValidator {
    warning_threshold: Decimal,
}

impl Default for AllocationValidator {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_ALLOCATION_WARNING_THRESHOLD))
    }
}

impl AllocationValidator {
    pub fn new(warning_threshold: Decimal) -> Self {
        Self { warning_threshold }
    }

    /// Validates `request`.
    ///
    /// `asset_allocations` must hold every allocation (any client, any status)
    /// recorded on the request's asset. When the client or the asset is
    /// missing, the result carries that error alone.
    pub fn validate(
        &self,
        request: &AllocationValidationRequest,
        client_exists: bool,
        asset_exists: bool,
        asset_allocations: &[Allocation],
    ) -> AllocationValidation {
        let mut result = AllocationValidation::default();

        if !client_exists {
            result
                .errors
                .push(format!("Client {} not found", request.client_id));
        }
        if !asset_exists {
            result
                .errors
                .push(format!("Asset {} not found", request.asset_key()));
        }
        if !result.errors.is_empty() {
            return result;
        }

        let key = request.asset_key();
        let others: Vec<&Allocation> = asset_allocations
            .iter()
            .filter(|a| a.is_for_asset(&key))
            .filter(|a| request.exclude_allocation_id.as_deref() != Some(a.id.as_str()))
            .collect();

        if let Some(duplicate) = others
            .iter()
            .find(|a| a.is_active() && a.client_id == request.client_id)
        {
            result.errors.push(format!(
                "An active allocation already exists for client {} on asset {} ({})",
                request.client_id, key, duplicate.id
            ));
        }

        if request.allocation_type == AllocationType::Percentage {
            let current_total: Decimal = others
                .iter()
                .filter(|a| a.is_active_percentage())
                .map(|a| a.value)
                .sum();
            let new_total = current_total + request.value;

            if new_total > Decimal::from(MAX_ALLOCATED_PERCENTAGE) {
                result.errors.push(format!(
                    "Total allocation would exceed 100%: current total is {}%, new total would be {}%",
                    current_total.normalize(),
                    new_total.normalize()
                ));
            } else if new_total > self.warning_threshold {
                result.warnings.push(format!(
                    "Asset {} will be {}% allocated, above the {}% warning threshold",
                    key,
                    new_total.normalize(),
                    self.warning_threshold.normalize()
                ));
            }

            result.current_total_percentage = Some(current_total);
            result.new_total_percentage = Some(new_total);
        }

        for overlapping in others
            .iter()
            .filter(|a| a.client_id == request.client_id && a.covers_date(request.start_date))
        {
            result.warnings.push(format!(
                "Allocation {} for client {} on asset {} already covers start date {}",
                overlapping.id, request.client_id, key, request.start_date
            ));
        }

        result.valid = result.errors.is_empty();
        debug!(
            "Validated allocation for client {} on {}: valid={}, {} error(s), {} warning(s)",
            request.client_id,
            key,
            result.valid,
            result.errors.len(),
            result.warnings.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::CustodyAssetType;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn allocation(id: &str, client_id: &str, value: Decimal, end: Option<NaiveDate>) -> Allocation {
        Allocation {
            id: id.to_string(),
            client_id: client_id.to_string(),
            asset_type: CustodyAssetType::Wallet,
            asset_id: "w-1".to_string(),
            allocation_type: AllocationType::Percentage,
            value,
            start_date: date(2024, 1, 1),
            end_date: end,
            notes: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn request(client_id: &str, value: Decimal) -> AllocationValidationRequest {
        AllocationValidationRequest {
            client_id: client_id.to_string(),
            asset_type: CustodyAssetType::Wallet,
            asset_id: "w-1".to_string(),
            allocation_type: AllocationType::Percentage,
            value,
            start_date: date(2024, 6, 1),
            exclude_allocation_id: None,
        }
    }

    #[test]
    fn test_third_allocation_over_100_is_rejected() {
        let existing = vec![
            allocation("a1", "c1", dec!(60), None),
            allocation("a2", "c2", dec!(30), None),
        ];
        let result = AllocationValidator::default().validate(&request("c3", dec!(20)), true, true, &existing);

        assert!(!result.valid);
        assert_eq!(result.current_total_percentage, Some(dec!(90)));
        assert_eq!(result.new_total_percentage, Some(dec!(110)));
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("90"));
        assert!(result.errors[0].contains("110"));
    }

    #[test]
    fn test_total_above_threshold_only_warns() {
        let existing = vec![allocation("a1", "c1", dec!(60), None)];
        let result = AllocationValidator::default().validate(&request("c2", dec!(35)), true, true, &existing);

        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.new_total_percentage, Some(dec!(95)));
    }

    #[test]
    fn test_exactly_100_is_allowed() {
        let existing = vec![allocation("a1", "c1", dec!(60), None)];
        let result = AllocationValidator::default().validate(&request("c2", dec!(40)), true, true, &existing);
        assert!(result.valid);
        assert_eq!(result.new_total_percentage, Some(dec!(100)));
    }

    #[test]
    fn test_ended_allocations_do_not_count() {
        let existing = vec![
            allocation("a1", "c1", dec!(80), Some(date(2024, 3, 1))),
            allocation("a2", "c2", dec!(50), None),
        ];
        let result = AllocationValidator::default().validate(&request("c3", dec!(50)), true, true, &existing);
        assert!(result.valid);
        assert_eq!(result.current_total_percentage, Some(dec!(50)));
    }

    #[test]
    fn test_duplicate_active_allocation_is_error() {
        let existing = vec![allocation("a1", "c1", dec!(10), None)];
        let result = AllocationValidator::default().validate(&request("c1", dec!(10)), true, true, &existing);

        assert!(!result.valid);
        assert!(result.errors[0].contains("active allocation already exists"));
        // The open-ended allocation also covers the new start date.
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_update_excludes_itself() {
        let existing = vec![
            allocation("a1", "c1", dec!(60), None),
            allocation("a2", "c2", dec!(30), None),
        ];
        let mut req = request("c1", dec!(70));
        req.exclude_allocation_id = Some("a1".to_string());

        let result = AllocationValidator::default().validate(&req, true, true, &existing);
        assert!(result.valid);
        assert_eq!(result.current_total_percentage, Some(dec!(30)));
        assert_eq!(result.new_total_percentage, Some(dec!(100)));
        assert!(result.warnings.iter().all(|w| !w.contains("a1")));
    }

    #[test]
    fn test_overlap_with_ended_allocation_warns() {
        let existing = vec![allocation("a1", "c1", dec!(10), Some(date(2024, 12, 31)))];
        let result = AllocationValidator::default().validate(&request("c1", dec!(10)), true, true, &existing);

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("a1"));
    }

    #[test]
    fn test_missing_client_or_asset_short_circuits() {
        let existing = vec![allocation("a1", "c1", dec!(100), None)];
        let result = AllocationValidator::default().validate(&request("c9", dec!(50)), false, false, &existing);

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.current_total_percentage.is_none());
    }

    #[test]
    fn test_fixed_amount_skips_percentage_totals() {
        let existing = vec![allocation("a1", "c1", dec!(100), None)];
        let mut req = request("c2", dec!(5000));
        req.allocation_type = AllocationType::FixedAmount;

        let result = AllocationValidator::default().validate(&req, true, true, &existing);
        assert!(result.valid);
        assert!(result.new_total_percentage.is_none());
    }
}
