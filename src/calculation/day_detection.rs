//! Day classification resolution.
//!
//! Raw attendance sources signal rest days and holidays in two ways: the
//! calendar itself (Saturday and Sunday) and explicit markers on the row.
//! This module folds those signals into a single [`DayClassification`] at
//! the ingestion boundary.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::trace;

use crate::models::DayClassification;

/// Returns true when the date falls on a Saturday or Sunday.
///
/// # Example
///
/// ```
/// use overtime_ledger::calculation::is_calendar_weekend;
/// use chrono::NaiveDate;
///
/// // 2025-08-02 is a Saturday
/// assert!(is_calendar_weekend(NaiveDate::from_ymd_opt(2025, 8, 2).unwrap()));
/// // 2025-08-04 is a Monday
/// assert!(!is_calendar_weekend(NaiveDate::from_ymd_opt(2025, 8, 4).unwrap()));
/// ```
pub fn is_calendar_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Resolves the day classification from the calendar date and source markers.
///
/// A day is a rest day when it falls on a weekend OR the source marks it as
/// one. The rest-day check runs first, so a holiday marker on a weekend still
/// resolves to [`DayClassification::Restday`].
///
/// # Arguments
///
/// * `date` - The calendar day
/// * `rest_day_marker` - The source explicitly flags the day as a rest day
/// * `holiday_marker` - The source flags the day as a statutory holiday
///
/// # Example
///
/// ```
/// use overtime_ledger::calculation::classify_day;
/// use overtime_ledger::models::DayClassification;
/// use chrono::NaiveDate;
///
/// let friday = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// assert_eq!(classify_day(friday, false, false), DayClassification::Weekday);
/// assert_eq!(classify_day(friday, true, false), DayClassification::Restday);
/// assert_eq!(classify_day(friday, false, true), DayClassification::StatutoryHoliday);
/// ```
pub fn classify_day(
    date: NaiveDate,
    rest_day_marker: bool,
    holiday_marker: bool,
) -> DayClassification {
    let weekend = is_calendar_weekend(date);

    let classification = if weekend || rest_day_marker {
        DayClassification::Restday
    } else if holiday_marker {
        DayClassification::StatutoryHoliday
    } else {
        DayClassification::Weekday
    };

    trace!(
        date = %date,
        weekend,
        rest_day_marker,
        holiday_marker,
        classification = %classification,
        "Resolved day classification"
    );

    classification
}
