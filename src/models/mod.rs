//! Core data models for the overtime ledger engine.
//!
//! This module contains all the domain models used throughout the engine.

mod credit;
mod day_classification;
mod ids;
mod leave;
mod segment;
mod work_record;

pub use credit::{CreditStatus, OvertimeCredit};
pub use day_classification::DayClassification;
pub use ids::{CreditId, LeaveId};
pub use leave::{LeaveOutcome, LeaveRequest};
pub use segment::{Multiplier, OvertimeSegment};
pub use work_record::DailyWorkRecord;
