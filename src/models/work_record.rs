//! Daily work record model.
//!
//! This module defines the normalized per-day attendance record produced by
//! the ingestion layer and consumed by the segmenter and the ledger.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::day_span_end;
use crate::error::{EngineError, EngineResult};

use super::DayClassification;

/// One employee's attendance total for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWorkRecord {
    /// The employee who worked.
    pub employee_id: String,
    /// The calendar day the work is attributed to.
    pub date: NaiveDate,
    /// Which tier table applies.
    pub day_classification: DayClassification,
    /// The earliest clock-in of the day.
    pub clock_in: NaiveDateTime,
    /// Total worked hours for the day.
    pub total_worked_hours: Decimal,
    /// Opaque pointer back into the raw source (e.g. the month tab it came from).
    #[serde(default)]
    pub source_reference: Option<String>,
}

impl DailyWorkRecord {
    /// Checks the record for internal consistency.
    ///
    /// A record is rejected when the employee id is blank, the worked hours are
    /// negative or exceed `max_daily_hours`, the clock-in falls on a
    /// different calendar day than `date`, or the worked span would run past
    /// the end of the representable calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime_ledger::models::{DailyWorkRecord, DayClassification};
    /// use chrono::{NaiveDate, NaiveDateTime};
    /// use rust_decimal::Decimal;
    ///
    /// let record = DailyWorkRecord {
    ///     employee_id: "E001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
    ///     day_classification: DayClassification::Weekday,
    ///     clock_in: NaiveDateTime::parse_from_str("2025-08-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     total_worked_hours: Decimal::new(95, 1),
    ///     source_reference: None,
    /// };
    /// assert!(record.validate(Decimal::from(24)).is_ok());
    /// ```
    pub fn validate(&self, max_daily_hours: Decimal) -> EngineResult<()> {
        if self.employee_id.trim().is_empty() {
            return Err(EngineError::validation(
                "employee_id",
                format!("record for {} has no employee id", self.date),
            ));
        }

        if self.total_worked_hours < Decimal::ZERO {
            return Err(EngineError::validation(
                &self.employee_id,
                format!(
                    "total worked hours {} on {} is negative",
                    self.total_worked_hours, self.date
                ),
            ));
        }

        if self.total_worked_hours > max_daily_hours {
            return Err(EngineError::validation(
                &self.employee_id,
                format!(
                    "total worked hours {} on {} exceeds the daily maximum of {}",
                    self.total_worked_hours, self.date, max_daily_hours
                ),
            ));
        }

        if self.clock_in.date() != self.date {
            return Err(EngineError::validation(
                &self.employee_id,
                format!(
                    "clock-in {} does not fall on record date {}",
                    self.clock_in, self.date
                ),
            ));
        }

        if day_span_end(self.clock_in, self.total_worked_hours).is_none() {
            return Err(EngineError::validation(
                &self.employee_id,
                format!(
                    "clock-in {} plus {} hours is out of calendar range",
                    self.clock_in, self.total_worked_hours
                ),
            ));
        }

        Ok(())
    }

    /// Returns the source reference, defaulting to the `YYYY-MM` of the record date.
    pub fn source_reference(&self) -> String {
        self.source_reference
            .clone()
            .unwrap_or_else(|| self.date.format("%Y-%m").to_string())
    }
}
