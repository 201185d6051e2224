//! Compensatory leave request model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CreditId, LeaveId};

/// The recorded result of allocating a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveOutcome {
    /// Registered, not yet allocated.
    Pending,
    /// Fully covered by overtime credit.
    Allocated,
    /// Not covered; see `error_reason`.
    Rejected,
}

/// An employee's claim against accumulated overtime credit.
///
/// Once `outcome` leaves [`LeaveOutcome::Pending`] the request is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// `LV-<YYYYMMDD of application>-<employeeId>-<seq>`.
    pub id: LeaveId,
    /// The requesting employee.
    pub employee_id: String,
    /// Hours of compensatory leave requested.
    pub requested_hours: Decimal,
    /// When the request was filed.
    pub application_date: NaiveDate,
    /// The day the leave is taken.
    pub leave_date: NaiveDate,
    /// Free-text note from the request.
    #[serde(default)]
    pub note: String,
    /// Allocation outcome.
    pub outcome: LeaveOutcome,
    /// Credits the request drew from, oldest first.
    #[serde(default)]
    pub consumed_credit_ids: Vec<CreditId>,
    /// Why allocation failed, if it did.
    #[serde(default)]
    pub error_reason: Option<String>,
}

impl LeaveRequest {
    /// Whether an outcome has been recorded.
    pub fn is_finalized(&self) -> bool {
        self.outcome != LeaveOutcome::Pending
    }
}
