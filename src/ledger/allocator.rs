//! Compensatory leave allocation.
//!
//! A leave request is matched against an employee's redeemable credits,
//! oldest date first, ties broken by credit id. Each credit gives up
//! `min(outstanding, remaining)` hours until the request is covered or the
//! credits run out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AllocationMode;
use crate::error::{EngineError, EngineResult};
use crate::models::{CreditId, LeaveId};

use super::Ledger;

/// Hours taken from one credit for one leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAllocation {
    /// The credit drawn from.
    pub credit_id: CreditId,
    /// Hours taken.
    pub hours: Decimal,
}

/// The outcome of [`allocate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The leave request being covered.
    pub leave_id: LeaveId,
    /// The requesting employee.
    pub employee_id: String,
    /// Hours requested.
    pub requested_hours: Decimal,
    /// Whether the request was fully covered.
    pub success: bool,
    /// Credits drawn from, oldest first. Empty unless `success`.
    pub consumed_credit_ids: Vec<CreditId>,
    /// Hours applied per credit.
    ///
    /// In partial-commit mode a failed request still lists what was applied.
    pub allocations: Vec<CreditAllocation>,
    /// The unmet portion when `success` is false.
    pub shortfall_hours: Option<Decimal>,
    /// Human-readable failure reason.
    pub error: Option<String>,
}

impl AllocationResult {
    /// Converts a failed result into an [`EngineError::AllocationShortfall`].
    pub fn shortfall_error(&self) -> Option<EngineError> {
        self.shortfall_hours
            .map(|shortfall| EngineError::AllocationShortfall {
                employee_id: self.employee_id.clone(),
                shortfall,
            })
    }
}

/// The reason string recorded on a leave request that could not be covered.
pub fn shortfall_message(shortfall: Decimal) -> String {
    format!(
        "leave hours exceed available overtime credit (short by {} hours)",
        shortfall.normalize()
    )
}

/// Allocates a leave request against an employee's overtime credits.
///
/// # Arguments
///
/// * `ledger` - The ledger to draw from
/// * `employee_id` - Whose credits to use
/// * `requested_hours` - Hours of leave requested; must be positive
/// * `leave_id` - Recorded on every credit touched
/// * `mode` - [`AllocationMode::Atomic`] plans first and mutates nothing on a
///   shortfall; [`AllocationMode::PartialCommit`] keeps consumption applied
///   before the credits ran out
///
/// # Returns
///
/// A shortfall is reported in the result (`success == false`), not as an
/// error.
///
/// # Errors
///
/// - [`EngineError::Validation`] for a non-positive request or a leave id
///   issued to another employee
/// - [`EngineError::LedgerInvariantViolation`] if a ledger mutation is rejected
///
/// # Example
///
/// ```
/// use overtime_ledger::calculation::segment;
/// use overtime_ledger::config::AllocationMode;
/// use overtime_ledger::ledger::{allocate, Ledger};
/// use overtime_ledger::models::{DailyWorkRecord, DayClassification, LeaveId};
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let record = DailyWorkRecord {
///     employee_id: "E001".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
///     day_classification: DayClassification::Weekday,
///     clock_in: NaiveDateTime::parse_from_str("2025-08-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
///     total_worked_hours: Decimal::new(1225, 2),
///     source_reference: None,
/// };
/// let mut ledger = Ledger::new();
/// let segments = segment(record.day_classification, record.clock_in, record.total_worked_hours);
/// let credit = ledger.create(&record, &segments).unwrap().credit;
/// assert_eq!(credit.remaining_hours, Decimal::from(5));
///
/// let leave_id = LeaveId::new(NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(), "E001", 1);
/// let result = allocate(&mut ledger, "E001", Decimal::from(8), &leave_id, AllocationMode::Atomic).unwrap();
///
/// assert!(!result.success);
/// assert_eq!(result.shortfall_hours, Some(Decimal::from(3)));
/// assert!(result.consumed_credit_ids.is_empty());
/// ```
pub fn allocate(
    ledger: &mut Ledger,
    employee_id: &str,
    requested_hours: Decimal,
    leave_id: &LeaveId,
    mode: AllocationMode,
) -> EngineResult<AllocationResult> {
    if requested_hours <= Decimal::ZERO {
        return Err(EngineError::validation(
            leave_id.to_string(),
            format!("requested hours must be positive, got {}", requested_hours),
        ));
    }

    if leave_id.employee_id() != employee_id {
        return Err(EngineError::validation(
            leave_id.to_string(),
            format!("leave id was not issued to employee '{}'", employee_id),
        ));
    }

    let candidates: Vec<(CreditId, Decimal)> = ledger
        .credits_for(employee_id)
        .into_iter()
        .filter(|c| c.is_available())
        .map(|c| (c.id.clone(), c.remaining_hours))
        .collect();

    let mut outstanding = requested_hours;
    let mut allocations = Vec::new();

    for (credit_id, remaining) in candidates {
        if outstanding <= Decimal::ZERO {
            break;
        }

        let take = outstanding.min(remaining);
        if mode == AllocationMode::PartialCommit {
            ledger.mutate_consumption(&credit_id, take, leave_id)?;
        }
        allocations.push(CreditAllocation {
            credit_id,
            hours: take,
        });
        outstanding -= take;
    }

    if outstanding > Decimal::ZERO {
        let message = shortfall_message(outstanding);
        warn!(
            employee_id,
            leave_id = %leave_id,
            requested_hours = %requested_hours,
            shortfall_hours = %outstanding,
            mode = ?mode,
            "Leave request exceeds available overtime credit"
        );

        if mode == AllocationMode::Atomic {
            allocations.clear();
        }

        return Ok(AllocationResult {
            leave_id: leave_id.clone(),
            employee_id: employee_id.to_string(),
            requested_hours,
            success: false,
            consumed_credit_ids: Vec::new(),
            allocations,
            shortfall_hours: Some(outstanding),
            error: Some(message),
        });
    }

    if mode == AllocationMode::Atomic {
        for allocation in &allocations {
            ledger.mutate_consumption(&allocation.credit_id, allocation.hours, leave_id)?;
        }
    }

    info!(
        employee_id,
        leave_id = %leave_id,
        requested_hours = %requested_hours,
        credits = allocations.len(),
        "Allocated leave against overtime credit"
    );

    Ok(AllocationResult {
        leave_id: leave_id.clone(),
        employee_id: employee_id.to_string(),
        requested_hours,
        success: true,
        consumed_credit_ids: allocations.iter().map(|a| a.credit_id.clone()).collect(),
        allocations,
        shortfall_hours: None,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::segment;
    use crate::models::{CreditStatus, DailyWorkRecord, DayClassification, OvertimeCredit};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    /// Imports a redeemable credit worth exactly `hours`.
    fn add_credit(ledger: &mut Ledger, employee_id: &str, date_str: &str, hours: &str) -> CreditId {
        let date = make_date(date_str);
        let id = CreditId::new(date, employee_id, 1);
        ledger
            .import(OvertimeCredit {
                id: id.clone(),
                employee_id: employee_id.to_string(),
                date,
                day_classification: DayClassification::Restday,
                earned_hours: dec(hours),
                consumed_hours: Decimal::ZERO,
                remaining_hours: dec(hours),
                status: CreditStatus::Open,
                consuming_leave_ids: Vec::new(),
                source_reference: date.format("%Y-%m").to_string(),
                diagnostic: None,
            })
            .unwrap();
        id
    }

    fn add_holiday(ledger: &mut Ledger, employee_id: &str, date_str: &str, hours: &str) -> CreditId {
        let record = DailyWorkRecord {
            employee_id: employee_id.to_string(),
            date: make_date(date_str),
            day_classification: DayClassification::StatutoryHoliday,
            clock_in: NaiveDateTime::parse_from_str(
                &format!("{} 08:00:00", date_str),
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap(),
            total_worked_hours: dec(hours),
            source_reference: None,
        };
        let segments = segment(
            record.day_classification,
            record.clock_in,
            record.total_worked_hours,
        );
        ledger.create(&record, &segments).unwrap().credit.id
    }

    fn leave(employee_id: &str, seq: u32) -> LeaveId {
        LeaveId::new(make_date("2025-08-20"), employee_id, seq)
    }

    #[test]
    fn test_oldest_credit_consumed_first() {
        let mut ledger = Ledger::new();
        let newer = add_credit(&mut ledger, "E001", "2025-08-05", "8");
        let older = add_credit(&mut ledger, "E001", "2025-08-01", "10");

        let result = allocate(
            &mut ledger,
            "E001",
            dec("12"),
            &leave("E001", 1),
            AllocationMode::Atomic,
        )
        .unwrap();

        assert!(result.success);
        assert_eq!(result.consumed_credit_ids, vec![older.clone(), newer.clone()]);
        assert_eq!(
            result.allocations,
            vec![
                CreditAllocation { credit_id: older.clone(), hours: dec("10") },
                CreditAllocation { credit_id: newer.clone(), hours: dec("2") },
            ]
        );

        let first = ledger.get(&older).unwrap();
        assert_eq!(first.status, CreditStatus::FullyConsumed);
        assert_eq!(first.remaining_hours, Decimal::ZERO);

        let second = ledger.get(&newer).unwrap();
        assert_eq!(second.status, CreditStatus::PartiallyConsumed);
        assert_eq!(second.remaining_hours, dec("6"));
        assert!(second.consuming_leave_ids.contains(&leave("E001", 1)));
    }

    #[test]
    fn test_exact_fit_stops_at_first_credit() {
        let mut ledger = Ledger::new();
        let first = add_credit(&mut ledger, "E001", "2025-08-01", "4");
        let second = add_credit(&mut ledger, "E001", "2025-08-02", "4");

        let result = allocate(
            &mut ledger,
            "E001",
            dec("4"),
            &leave("E001", 1),
            AllocationMode::Atomic,
        )
        .unwrap();

        assert_eq!(result.consumed_credit_ids, vec![first]);
        assert_eq!(ledger.get(&second).unwrap().status, CreditStatus::Open);
    }

    #[test]
    fn test_shortfall_atomic_mutates_nothing() {
        let mut ledger = Ledger::new();
        let id = add_credit(&mut ledger, "E001", "2025-08-01", "5");

        let result = allocate(
            &mut ledger,
            "E001",
            dec("8"),
            &leave("E001", 1),
            AllocationMode::Atomic,
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.shortfall_hours, Some(dec("3")));
        assert!(result.consumed_credit_ids.is_empty());
        assert!(result.allocations.is_empty());
        assert_eq!(
            result.error.as_deref(),
            Some("leave hours exceed available overtime credit (short by 3 hours)")
        );

        let credit = ledger.get(&id).unwrap();
        assert_eq!(credit.remaining_hours, dec("5"));
        assert_eq!(credit.status, CreditStatus::Open);
        assert!(credit.consuming_leave_ids.is_empty());
    }

    #[test]
    fn test_shortfall_partial_commit_keeps_applied_consumption() {
        let mut ledger = Ledger::new();
        let id = add_credit(&mut ledger, "E001", "2025-08-01", "5");

        let result = allocate(
            &mut ledger,
            "E001",
            dec("8"),
            &leave("E001", 1),
            AllocationMode::PartialCommit,
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.shortfall_hours, Some(dec("3")));
        assert!(result.consumed_credit_ids.is_empty());
        assert_eq!(result.allocations.len(), 1);

        let credit = ledger.get(&id).unwrap();
        assert_eq!(credit.remaining_hours, Decimal::ZERO);
        assert_eq!(credit.status, CreditStatus::FullyConsumed);
    }

    #[test]
    fn test_shortfall_error_conversion() {
        let mut ledger = Ledger::new();
        add_credit(&mut ledger, "E001", "2025-08-01", "5");

        let result = allocate(
            &mut ledger,
            "E001",
            dec("8"),
            &leave("E001", 1),
            AllocationMode::Atomic,
        )
        .unwrap();

        let err = result.shortfall_error().unwrap();
        assert!(matches!(err, EngineError::AllocationShortfall { shortfall, .. } if shortfall == dec("3")));
    }

    #[test]
    fn test_holiday_credits_are_never_candidates() {
        let mut ledger = Ledger::new();
        add_holiday(&mut ledger, "E001", "2025-10-06", "8");

        let result = allocate(
            &mut ledger,
            "E001",
            dec("1"),
            &leave("E001", 1),
            AllocationMode::Atomic,
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.shortfall_hours, Some(dec("1")));
    }

    #[test]
    fn test_other_employees_credits_untouched() {
        let mut ledger = Ledger::new();
        let theirs = add_credit(&mut ledger, "E002", "2025-08-01", "10");

        let result = allocate(
            &mut ledger,
            "E001",
            dec("2"),
            &leave("E001", 1),
            AllocationMode::Atomic,
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(ledger.get(&theirs).unwrap().remaining_hours, dec("10"));
    }

    #[test]
    fn test_fully_consumed_credits_skipped_by_later_requests() {
        let mut ledger = Ledger::new();
        let first = add_credit(&mut ledger, "E001", "2025-08-01", "3");
        let second = add_credit(&mut ledger, "E001", "2025-08-02", "3");

        allocate(&mut ledger, "E001", dec("3"), &leave("E001", 1), AllocationMode::Atomic).unwrap();
        let result =
            allocate(&mut ledger, "E001", dec("2"), &leave("E001", 2), AllocationMode::Atomic)
                .unwrap();

        assert_eq!(result.consumed_credit_ids, vec![second]);
        assert_eq!(
            ledger.get(&first).unwrap().consuming_leave_ids,
            vec![leave("E001", 1)]
        );
    }

    #[test]
    fn test_non_positive_request_rejected() {
        let mut ledger = Ledger::new();
        for hours in ["0", "-1"] {
            let err = allocate(
                &mut ledger,
                "E001",
                dec(hours),
                &leave("E001", 1),
                AllocationMode::Atomic,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::Validation { .. }));
        }
    }

    #[test]
    fn test_leave_id_for_other_employee_rejected() {
        let mut ledger = Ledger::new();
        let err = allocate(
            &mut ledger,
            "E001",
            dec("1"),
            &leave("E002", 1),
            AllocationMode::Atomic,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn test_shortfall_message_normalizes_trailing_zeros() {
        assert_eq!(
            shortfall_message(dec("3.00")),
            "leave hours exceed available overtime credit (short by 3 hours)"
        );
        assert_eq!(
            shortfall_message(dec("0.50")),
            "leave hours exceed available overtime credit (short by 0.5 hours)"
        );
    }
}
