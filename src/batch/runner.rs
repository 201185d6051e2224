//! Batch orchestration.
//!
//! One run ingests every listed employee's attendance, allocates the
//! submitted leave requests and optionally reconciles the ledger. Failures are
//! isolated: a bad record is skipped, a failing employee is reported, and a
//! rejected leave request never stops the others.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::calculation::segment_with_policy;
use crate::config::{ConfigLoader, PolicyConfig};
use crate::error::EngineResult;
use crate::ledger::{
    AllocationResult, CreationStatus, CreditCreation, ExternalLookup, LeaveBook, Ledger,
    SequenceCounter, allocate, validate,
};
use crate::models::{DailyWorkRecord, LeaveRequest};

use super::AttendanceSource;

/// A leave request as submitted, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveSubmission {
    /// The requesting employee.
    pub employee_id: String,
    /// Hours of leave requested.
    pub requested_hours: Decimal,
    /// When the request was filed.
    pub application_date: NaiveDate,
    /// The day the leave is taken.
    pub leave_date: NaiveDate,
    /// Free-text note.
    #[serde(default)]
    pub note: String,
}

/// The ledger, the leave book and the policy they run under.
///
/// The policy arrives through a [`ConfigLoader`], so it has passed the same
/// range checks as `policy.yaml`.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ConfigLoader,
    ledger: Ledger,
    leave_book: LeaveBook,
}

impl Engine {
    /// Creates an engine with an empty ledger and leave book.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config,
            ledger: Ledger::new(),
            leave_book: LeaveBook::new(),
        }
    }

    /// The validated configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The policy in force.
    pub fn policy(&self) -> &PolicyConfig {
        self.config.policy()
    }

    /// The credit ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable access to the credit ledger, e.g. for importing persisted credits.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// The leave book.
    pub fn leave_book(&self) -> &LeaveBook {
        &self.leave_book
    }

    /// Validates, segments and records one day of attendance.
    ///
    /// Returns `Ok(None)` when the day carries no overtime.
    pub fn ingest_record(&mut self, record: &DailyWorkRecord) -> EngineResult<Option<CreditCreation>> {
        let policy = self.config.policy();
        record.validate(policy.max_daily_hours)?;

        let segments = segment_with_policy(
            policy,
            record.day_classification,
            record.clock_in,
            record.total_worked_hours,
        );
        if segments.is_empty() {
            return Ok(None);
        }

        self.ledger.create(record, &segments).map(Some)
    }

    /// Registers a leave request, allocates it and records the outcome.
    ///
    /// A shortfall is a normal outcome, reported through the returned
    /// [`AllocationResult`]. Errors from the allocator mark the request as
    /// rejected before being returned.
    pub fn submit_leave(
        &mut self,
        submission: &LeaveSubmission,
        counter: &mut SequenceCounter,
    ) -> EngineResult<(LeaveRequest, AllocationResult)> {
        let leave_id = self.leave_book.register(
            &submission.employee_id,
            submission.requested_hours,
            submission.application_date,
            submission.leave_date,
            &submission.note,
            counter,
        )?;

        let result = match allocate(
            &mut self.ledger,
            &submission.employee_id,
            submission.requested_hours,
            &leave_id,
            self.config.policy().allocation_mode,
        ) {
            Ok(result) => result,
            Err(e) => {
                self.leave_book.record_rejection(&leave_id, &e.to_string())?;
                return Err(e);
            }
        };

        let request = self.leave_book.record_outcome(&leave_id, &result)?.clone();
        Ok((request, result))
    }

    /// Reconciles every credit against `lookup`; returns the divergence count.
    pub fn reconcile(&mut self, lookup: &dyn ExternalLookup) -> usize {
        validate(&mut self.ledger, lookup)
    }
}

/// One isolated failure within a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// The employee (or leave request) the failure belongs to.
    pub subject: String,
    /// What went wrong.
    pub message: String,
}

/// Summary of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Correlates the run's log lines.
    pub run_id: Uuid,
    /// Employees whose records were read.
    pub employees_processed: usize,
    /// Employees whose records could not be read.
    pub employees_failed: usize,
    /// Records rejected by validation.
    pub records_skipped: usize,
    /// Records within the buffer band.
    pub records_without_overtime: usize,
    /// New credits appended to the ledger.
    pub credits_created: usize,
    /// Records whose credit already existed.
    pub credits_existing: usize,
    /// Leave requests fully covered.
    pub leave_allocated: usize,
    /// Leave requests rejected.
    pub leave_rejected: usize,
    /// Reconciliation divergences; `None` when no lookup was supplied.
    pub divergences: Option<usize>,
    /// Every isolated failure, in the order it happened.
    pub errors: Vec<BatchError>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl BatchReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            employees_processed: 0,
            employees_failed: 0,
            records_skipped: 0,
            records_without_overtime: 0,
            credits_created: 0,
            credits_existing: 0,
            leave_allocated: 0,
            leave_rejected: 0,
            divergences: None,
            errors: Vec::new(),
            duration_ms: 0,
        }
    }

    fn push_error(&mut self, subject: &str, message: String) {
        self.errors.push(BatchError {
            subject: subject.to_string(),
            message,
        });
    }
}

/// Runs one batch.
///
/// # Arguments
///
/// * `engine` - Holds the ledger and leave book the run mutates
/// * `source` - Supplies each employee's daily records
/// * `employees` - Employees to ingest, in processing order
/// * `leave_submissions` - Requests to allocate, in submission order
/// * `lookup` - When present, the ledger is reconciled at the end of the run
/// * `counter` - Leave-id sequences carried over from the previous run
///
/// # Returns
///
/// The run report and the advanced leave-id counter for the next run.
pub fn run_batch(
    engine: &mut Engine,
    source: &mut dyn AttendanceSource,
    employees: &[String],
    leave_submissions: &[LeaveSubmission],
    lookup: Option<&dyn ExternalLookup>,
    mut counter: SequenceCounter,
) -> (BatchReport, SequenceCounter) {
    let started = Instant::now();
    let mut report = BatchReport::new(Uuid::new_v4());
    let span = info_span!("batch", run_id = %report.run_id);
    let _guard = span.enter();

    info!(
        employees = employees.len(),
        leave_submissions = leave_submissions.len(),
        "Batch run started"
    );

    for employee_id in employees {
        ingest_employee(engine, source, employee_id, &mut report);
    }

    for submission in leave_submissions {
        match engine.submit_leave(submission, &mut counter) {
            Ok((_, result)) if result.success => report.leave_allocated += 1,
            Ok((request, result)) => {
                report.leave_rejected += 1;
                report.push_error(
                    &request.id.to_string(),
                    result.error.unwrap_or_default(),
                );
            }
            Err(e) => {
                warn!(employee_id = %submission.employee_id, error = %e, "Leave request failed");
                report.leave_rejected += 1;
                report.push_error(&submission.employee_id, e.to_string());
            }
        }
    }

    if let Some(lookup) = lookup {
        report.divergences = Some(engine.reconcile(lookup));
    }

    report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    info!(
        employees_processed = report.employees_processed,
        employees_failed = report.employees_failed,
        credits_created = report.credits_created,
        leave_allocated = report.leave_allocated,
        leave_rejected = report.leave_rejected,
        errors = report.errors.len(),
        duration_ms = report.duration_ms,
        "Batch run finished"
    );

    (report, counter)
}

fn ingest_employee(
    engine: &mut Engine,
    source: &mut dyn AttendanceSource,
    employee_id: &str,
    report: &mut BatchReport,
) {
    let records = match source.next_records_for(employee_id) {
        Ok(records) => records,
        Err(e) => {
            warn!(employee_id, error = %e, "Could not read attendance");
            report.employees_failed += 1;
            report.push_error(employee_id, e.to_string());
            return;
        }
    };

    for record in &records {
        match engine.ingest_record(record) {
            Ok(Some(creation)) => match creation.status {
                CreationStatus::Created => report.credits_created += 1,
                CreationStatus::AlreadyExists => report.credits_existing += 1,
            },
            Ok(None) => report.records_without_overtime += 1,
            Err(e) => {
                warn!(employee_id, date = %record.date, error = %e, "Skipping record");
                report.records_skipped += 1;
                report.push_error(employee_id, e.to_string());
            }
        }
    }

    report.employees_processed += 1;
}
