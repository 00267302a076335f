use chrono::{Datelike, NaiveDate, Utc};

/// Business date for "today". Custody balances and allocations are dated in UTC.
pub fn valuation_date_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Number of calendar days from `start` to `end`; negative when `end` is earlier.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// (ISO year, ISO week) bucket of a date.
pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// (year, month) bucket of a date.
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_week_crosses_calendar_year() {
        // 2024-12-30 is Monday of ISO week 1 of 2025.
        assert_eq!(iso_week_key(date(2024, 12, 30)), (2025, 1));
        assert_eq!(iso_week_key(date(2025, 1, 5)), (2025, 1));
        assert_eq!(iso_week_key(date(2025, 1, 6)), (2025, 2));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 12, 31)), 365);
        assert_eq!(days_between(date(2024, 1, 2), date(2024, 1, 1)), -1);
        assert_eq!(month_key(date(2024, 2, 29)), (2024, 2));
    }
}
