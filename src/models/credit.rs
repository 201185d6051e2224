//! Overtime credit ledger entry model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{CreditId, DayClassification, LeaveId};

/// Consumption state of an overtime credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditStatus {
    /// Nothing consumed yet.
    Open,
    /// Some, but not all, hours consumed.
    PartiallyConsumed,
    /// Every earned hour consumed.
    FullyConsumed,
    /// Holiday-sourced credit; paid out, never redeemable as leave.
    NotRedeemable,
}

impl CreditStatus {
    /// Derives the status of a redeemable credit from its consumption.
    pub fn from_consumption(consumed: Decimal, earned: Decimal) -> Self {
        if consumed == Decimal::ZERO {
            CreditStatus::Open
        } else if consumed < earned {
            CreditStatus::PartiallyConsumed
        } else {
            CreditStatus::FullyConsumed
        }
    }

    /// Whether the allocator may draw from a credit in this state.
    pub fn is_consumable(self) -> bool {
        matches!(self, CreditStatus::Open | CreditStatus::PartiallyConsumed)
    }
}

/// One employee's overtime credit for one day.
///
/// Credits are append-only: once created only the consumption fields, the
/// status, the list of consuming leave ids and the diagnostic annotation change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeCredit {
    /// `OT-<YYYYMMDD>-<employeeId>-<seq>`.
    pub id: CreditId,
    /// The employee who earned the credit.
    pub employee_id: String,
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// The classification of that day.
    pub day_classification: DayClassification,
    /// Sum of the day's segment hours.
    pub earned_hours: Decimal,
    /// Hours already taken as compensatory leave.
    pub consumed_hours: Decimal,
    /// Hours still redeemable.
    pub remaining_hours: Decimal,
    /// Consumption state.
    pub status: CreditStatus,
    /// Leave requests that drew from this credit, in first-use order.
    #[serde(default)]
    pub consuming_leave_ids: Vec<LeaveId>,
    /// Opaque pointer back into the raw source for reconciliation.
    pub source_reference: String,
    /// Reconciliation annotation; `None` when the last check agreed.
    #[serde(default)]
    pub diagnostic: Option<String>,
}

impl OvertimeCredit {
    /// Returns true when `earned == consumed + remaining`.
    ///
    /// Holiday credits are created with `remaining = 0` and never consumed, so
    /// they are intentionally unbalanced.
    pub fn is_balanced(&self) -> bool {
        self.earned_hours == self.consumed_hours + self.remaining_hours
    }

    /// Whether this credit can still contribute hours to a leave request.
    pub fn is_available(&self) -> bool {
        self.status.is_consumable() && self.remaining_hours > Decimal::ZERO
    }

    /// Draws `delta` hours from this credit on behalf of `leave_id`.
    ///
    /// All checks run before any field is touched, so a rejected call leaves
    /// the credit exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LedgerInvariantViolation`] when the credit is not
    /// redeemable, `delta` is not positive, or `remaining - delta` would be negative.
    pub fn apply_consumption(&mut self, delta: Decimal, leave_id: &LeaveId) -> EngineResult<()> {
        let credit_id = self.id.to_string();

        if self.status == CreditStatus::NotRedeemable {
            return Err(EngineError::invariant(
                credit_id,
                "credit is not redeemable as compensatory leave",
            ));
        }

        if delta <= Decimal::ZERO {
            return Err(EngineError::invariant(
                credit_id,
                format!("consumption delta must be positive, got {}", delta),
            ));
        }

        let remaining = self.remaining_hours - delta;
        if remaining < Decimal::ZERO {
            return Err(EngineError::invariant(
                credit_id,
                format!(
                    "consuming {} hours would leave remaining hours at {}",
                    delta, remaining
                ),
            ));
        }

        self.consumed_hours += delta;
        self.remaining_hours = remaining;
        self.status = CreditStatus::from_consumption(self.consumed_hours, self.earned_hours);
        if !self.consuming_leave_ids.contains(leave_id) {
            self.consuming_leave_ids.push(leave_id.clone());
        }

        Ok(())
    }
}
