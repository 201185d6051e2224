//! Request types for the overtime ledger API.
//!
//! `POST /credits` takes a [`DailyWorkRecord`](crate::models::DailyWorkRecord)
//! and `POST /leave` a [`LeaveSubmission`](crate::batch::LeaveSubmission)
//! directly; only `POST /segment` has its own body.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::day_span_end;
use crate::error::{EngineError, EngineResult};
use crate::models::DayClassification;

/// Request body for the `/segment` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRequest {
    /// Selects the tier table.
    pub day_classification: DayClassification,
    /// The day's earliest clock-in.
    pub clock_in: NaiveDateTime,
    /// The day's total worked hours.
    pub total_worked_hours: Decimal,
}

impl SegmentRequest {
    /// Rejects hours outside `0..=max_daily_hours` and clock-ins whose span
    /// runs past the end of the calendar.
    pub fn validate(&self, max_daily_hours: Decimal) -> EngineResult<()> {
        if self.total_worked_hours.is_sign_negative() || self.total_worked_hours > max_daily_hours {
            return Err(EngineError::validation(
                "total_worked_hours",
                format!(
                    "must be between 0 and {}, got {}",
                    max_daily_hours, self.total_worked_hours
                ),
            ));
        }

        if day_span_end(self.clock_in, self.total_worked_hours).is_none() {
            return Err(EngineError::validation(
                "clock_in",
                format!(
                    "{} plus {} hours is out of calendar range",
                    self.clock_in, self.total_worked_hours
                ),
            ));
        }

        Ok(())
    }
}
