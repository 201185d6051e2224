//! Registry of compensatory leave requests and their outcomes.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveId, LeaveOutcome, LeaveRequest};

use super::{AllocationResult, SequenceCounter};

/// Holds every leave request the engine has seen.
///
/// A request's outcome is recorded once; after that the request is immutable.
#[derive(Debug, Clone, Default)]
pub struct LeaveBook {
    requests: Vec<LeaveRequest>,
    by_id: HashMap<LeaveId, usize>,
}

impl LeaveBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new pending request and issues its id.
    ///
    /// The id sequence comes from `counter`, keyed by employee and
    /// application date.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Validation`] for a blank employee id or non-positive hours
    /// - [`EngineError::DuplicateId`] when the counter issues an id already in the book
    ///
    /// # Example
    ///
    /// ```
    /// use overtime_ledger::ledger::{LeaveBook, SequenceCounter};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut book = LeaveBook::new();
    /// let mut counter = SequenceCounter::default();
    /// let applied = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
    /// let taken = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
    ///
    /// let id = book
    ///     .register("E001", Decimal::from(4), applied, taken, "dentist", &mut counter)
    ///     .unwrap();
    /// assert_eq!(id.to_string(), "LV-20250810-E001-1");
    /// ```
    pub fn register(
        &mut self,
        employee_id: &str,
        requested_hours: Decimal,
        application_date: NaiveDate,
        leave_date: NaiveDate,
        note: &str,
        counter: &mut SequenceCounter,
    ) -> EngineResult<LeaveId> {
        if employee_id.trim().is_empty() {
            return Err(EngineError::validation(
                "employee_id",
                format!("leave request filed {} has no employee id", application_date),
            ));
        }

        if requested_hours <= Decimal::ZERO {
            return Err(EngineError::validation(
                employee_id,
                format!("requested hours must be positive, got {}", requested_hours),
            ));
        }

        let sequence = counter.next(employee_id, application_date);
        let id = LeaveId::new(application_date, employee_id, sequence);
        if self.by_id.contains_key(&id) {
            return Err(EngineError::DuplicateId { id: id.to_string() });
        }

        info!(
            employee_id,
            leave_id = %id,
            requested_hours = %requested_hours,
            "Registered leave request"
        );

        self.by_id.insert(id.clone(), self.requests.len());
        self.requests.push(LeaveRequest {
            id: id.clone(),
            employee_id: employee_id.to_string(),
            requested_hours,
            application_date,
            leave_date,
            note: note.to_string(),
            outcome: LeaveOutcome::Pending,
            consumed_credit_ids: Vec::new(),
            error_reason: None,
        });

        Ok(id)
    }

    /// Records the allocation outcome of a pending request.
    ///
    /// # Errors
    ///
    /// - [`EngineError::LeaveNotFound`] for an unknown id
    /// - [`EngineError::LeaveAlreadyFinalized`] when an outcome was already recorded
    pub fn record_outcome(
        &mut self,
        leave_id: &LeaveId,
        result: &AllocationResult,
    ) -> EngineResult<&LeaveRequest> {
        let request = self.pending_mut(leave_id)?;

        if result.success {
            request.outcome = LeaveOutcome::Allocated;
            request.consumed_credit_ids = result.consumed_credit_ids.clone();
            request.error_reason = None;
        } else {
            request.outcome = LeaveOutcome::Rejected;
            request.consumed_credit_ids = Vec::new();
            request.error_reason = result.error.clone();
        }

        info!(leave_id = %leave_id, outcome = ?request.outcome, "Recorded leave outcome");
        Ok(request)
    }

    /// Rejects a pending request that could not be allocated at all.
    ///
    /// # Errors
    ///
    /// Same as [`record_outcome`](Self::record_outcome).
    pub fn record_rejection(&mut self, leave_id: &LeaveId, reason: &str) -> EngineResult<&LeaveRequest> {
        let request = self.pending_mut(leave_id)?;
        request.outcome = LeaveOutcome::Rejected;
        request.error_reason = Some(reason.to_string());

        info!(leave_id = %leave_id, reason, "Rejected leave request");
        Ok(request)
    }

    /// Looks up a request by id.
    pub fn get(&self, leave_id: &LeaveId) -> Option<&LeaveRequest> {
        self.by_id.get(leave_id).map(|&index| &self.requests[index])
    }

    /// An employee's requests in registration order.
    pub fn requests_for(&self, employee_id: &str) -> Vec<&LeaveRequest> {
        self.requests
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .collect()
    }

    /// Requests still awaiting an outcome.
    pub fn pending(&self) -> Vec<&LeaveRequest> {
        self.requests.iter().filter(|r| !r.is_finalized()).collect()
    }

    /// Number of requests held.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn pending_mut(&mut self, leave_id: &LeaveId) -> EngineResult<&mut LeaveRequest> {
        let index = self
            .by_id
            .get(leave_id)
            .copied()
            .ok_or_else(|| EngineError::LeaveNotFound {
                leave_id: leave_id.to_string(),
            })?;

        let request = &mut self.requests[index];
        if request.is_finalized() {
            return Err(EngineError::LeaveAlreadyFinalized {
                leave_id: leave_id.to_string(),
            });
        }

        Ok(request)
    }
}
