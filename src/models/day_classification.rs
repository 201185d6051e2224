//! Day classification model.

use serde::{Deserialize, Serialize};

/// The classification of a worked day, selecting which multiplier tier table applies.
///
/// Resolved once at the ingestion boundary (see
/// [`classify_day`](crate::calculation::classify_day)) and carried as a closed
/// enum from then on.
///
/// # Example
///
/// ```
/// use overtime_ledger::models::DayClassification;
///
/// let json = serde_json::to_string(&DayClassification::StatutoryHoliday).unwrap();
/// assert_eq!(json, "\"STATUTORY_HOLIDAY\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayClassification {
    /// A regular working day. Overtime starts after the buffer band.
    Weekday,
    /// A rest day (calendar weekend or explicitly marked). Every hour counts.
    Restday,
    /// A statutory holiday. Paid at holiday multipliers, never redeemable as leave.
    StatutoryHoliday,
}

impl DayClassification {
    /// Resolves a classification from the calendar date and source markers.
    ///
    /// Shorthand for [`classify_day`](crate::calculation::classify_day).
    pub fn resolve(date: chrono::NaiveDate, rest_day_marker: bool, holiday_marker: bool) -> Self {
        crate::calculation::classify_day(date, rest_day_marker, holiday_marker)
    }
}

impl std::fmt::Display for DayClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayClassification::Weekday => write!(f, "Weekday"),
            DayClassification::Restday => write!(f, "Rest day"),
            DayClassification::StatutoryHoliday => write!(f, "Statutory holiday"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&DayClassification::Weekday).unwrap(),
            "\"WEEKDAY\""
        );
        assert_eq!(
            serde_json::to_string(&DayClassification::Restday).unwrap(),
            "\"RESTDAY\""
        );
    }

    #[test]
    fn test_deserialization() {
        let parsed: DayClassification = serde_json::from_str("\"STATUTORY_HOLIDAY\"").unwrap();
        assert_eq!(parsed, DayClassification::StatutoryHoliday);
    }

    #[test]
    fn test_display() {
        assert_eq!(DayClassification::Restday.to_string(), "Rest day");
    }
}
