/// Decimal precision for analytics calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display percentages
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Upper bound for the sum of active percentage allocations on one asset
pub const MAX_ALLOCATED_PERCENTAGE: u32 = 100;

/// Default sum above which a percentage allocation raises a warning
pub const DEFAULT_ALLOCATION_WARNING_THRESHOLD: u32 = 90;

/// Trading days used to annualize daily statistics
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Calendar days used for compound annualization
pub const CALENDAR_DAYS_PER_YEAR: u32 = 365;

/// Default lookback window for risk metrics, in days
pub const DEFAULT_RISK_LOOKBACK_DAYS: u32 = 30;

/// Currency every resolved balance is denominated in
pub const BASE_CURRENCY: &str = "USD";
