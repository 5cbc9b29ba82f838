//! Calendar date helpers.
//!
//! The feed is keyed by day of year only, so [`format_for_feed`] throws the
//! year away: 2021-07-04 and 2030-07-04 request exactly the same page.

use chrono::{Datelike, Days, Local, Months, NaiveDate};

use crate::error::DateInputError;

/// Month and day path parameters for the feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedDate {
    /// Two-digit month, `"01"`..=`"12"`.
    pub month: String,
    /// Two-digit day of month, `"01"`..=`"31"`.
    pub day: String,
}

/// Convert a calendar date into zero-padded feed parameters.
pub fn format_for_feed(date: NaiveDate) -> FeedDate {
    FeedDate {
        month: format!("{:02}", date.month()),
        day: format!("{:02}", date.day()),
    }
}

/// Today's date in the host's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a typed `YYYY-MM-DD` date.
pub fn parse_date_input(input: &str) -> Result<NaiveDate, DateInputError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| DateInputError::Malformed(trimmed.to_string()))
}

/// Move `date` by `delta` days. Out-of-range results leave the date as is.
pub fn step_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let days = Days::new(delta.unsigned_abs());
    let stepped = if delta >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };
    stepped.unwrap_or(date)
}

/// Move `date` by `delta` months, clamping the day to the target month's
/// length (January 31 + 1 month is February 28 or 29).
pub fn step_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let stepped = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    stepped.unwrap_or(date)
}

/// Long form used in the header, e.g. `February 29, 2024`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
