//! Calendar helpers for reporting periods.

use chrono::{NaiveDate, NaiveDateTime};

use crate::server::error::Error;

/// Midnight at the start of the given month.
///
/// # Arguments
/// - `year` - Calendar year
/// - `month` - Month of the year, 1-12
///
/// # Returns
/// - `Ok(NaiveDateTime)` - First day of the month at 00:00:00
/// - `Err(Error::ParseError)` - The year and month do not form a valid date
pub fn month_start(year: i32, month: u32) -> Result<NaiveDateTime, Error> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::ParseError(format!("Invalid year and month {}-{:02}", year, month)))
}

/// Midnight at the start of the month following the given one
pub fn next_month_start(year: i32, month: u32) -> Result<NaiveDateTime, Error> {
    if month == 12 {
        month_start(year + 1, 1)
    } else {
        month_start(year, month + 1)
    }
}

/// Whole days from `today` until `date`, negative once `date` has passed
pub fn days_until(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Adds days to a date, failing instead of overflowing the calendar
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, Error> {
    date.checked_add_signed(chrono::Duration::days(days))
        .ok_or_else(|| Error::ParseError(format!("Date {} plus {} days is out of range", date, days)))
}

#[cfg(test)]
mod tests {
    mod month_start {
        use chrono::NaiveDate;

        use crate::server::util::time::{month_start, next_month_start};

        /// Expect December to roll over into January of the next year
        #[test]
        fn next_month_rolls_over_year() {
            let start = next_month_start(2025, 12).unwrap();

            assert_eq!(
                start,
                NaiveDate::from_ymd_opt(2026, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            );
        }

        /// Expect an error for month 13
        #[test]
        fn rejects_invalid_month() {
            assert!(month_start(2025, 13).is_err());
        }
    }

    mod days_until {
        use chrono::NaiveDate;

        use crate::server::util::time::days_until;

        /// Expect negative days for dates in the past
        #[test]
        fn negative_for_past_dates() {
            let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

            assert_eq!(days_until(today, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()), -1);
            assert_eq!(days_until(today, NaiveDate::from_ymd_opt(2025, 4, 9).unwrap()), 30);
        }
    }
}
