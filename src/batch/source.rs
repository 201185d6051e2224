//! Attendance sources and in-memory collaborators.
//!
//! The engine never reads raw attendance layouts itself. An
//! [`AttendanceSource`] hands it normalized [`DailyWorkRecord`]s per employee.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::calculation::segment_with_policy;
use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::ExternalLookup;
use crate::models::DailyWorkRecord;

/// Supplies normalized daily work records for one employee at a time.
pub trait AttendanceSource {
    /// Returns the employee's daily records for this run.
    ///
    /// An error isolates the employee; the batch carries on with the next one.
    fn next_records_for(&mut self, employee_id: &str) -> EngineResult<Vec<DailyWorkRecord>>;
}

/// An [`AttendanceSource`] backed by a map of records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttendanceSource {
    records: HashMap<String, Vec<DailyWorkRecord>>,
    unavailable: HashMap<String, String>,
}

impl InMemoryAttendanceSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source holding `records`, grouped by employee.
    pub fn with_records(records: impl IntoIterator<Item = DailyWorkRecord>) -> Self {
        let mut source = Self::new();
        for record in records {
            source.push(record);
        }
        source
    }

    /// Adds one record.
    pub fn push(&mut self, record: DailyWorkRecord) {
        self.records
            .entry(record.employee_id.clone())
            .or_default()
            .push(record);
    }

    /// Makes reads for `employee_id` fail with `message`.
    pub fn mark_unavailable(&mut self, employee_id: &str, message: &str) {
        self.unavailable
            .insert(employee_id.to_string(), message.to_string());
    }

    /// Every record held, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &DailyWorkRecord> {
        self.records.values().flatten()
    }
}

impl AttendanceSource for InMemoryAttendanceSource {
    fn next_records_for(&mut self, employee_id: &str) -> EngineResult<Vec<DailyWorkRecord>> {
        if let Some(message) = self.unavailable.get(employee_id) {
            return Err(EngineError::SourceUnavailable {
                employee_id: employee_id.to_string(),
                message: message.clone(),
            });
        }

        Ok(self.records.get(employee_id).cloned().unwrap_or_default())
    }
}

/// An [`ExternalLookup`] that confirms a fixed set of `(employee, source, date)` entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLookup {
    confirmed: HashSet<(String, String, NaiveDate)>,
    unreachable: HashSet<String>,
}

impl InMemoryLookup {
    /// Creates a lookup that confirms nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirms every record that carries overtime under `policy`.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a DailyWorkRecord>,
        policy: &PolicyConfig,
    ) -> Self {
        let mut lookup = Self::new();
        for record in records {
            let segments = segment_with_policy(
                policy,
                record.day_classification,
                record.clock_in,
                record.total_worked_hours,
            );
            if !segments.is_empty() {
                lookup.confirm_day(&record.employee_id, &record.source_reference(), record.date);
            }
        }
        lookup
    }

    /// Adds a confirmed entry.
    pub fn confirm_day(&mut self, employee_id: &str, source_reference: &str, date: NaiveDate) {
        self.confirmed.insert((
            employee_id.to_string(),
            source_reference.to_string(),
            date,
        ));
    }

    /// Makes lookups for `employee_id` fail.
    pub fn mark_unreachable(&mut self, employee_id: &str) {
        self.unreachable.insert(employee_id.to_string());
    }
}

impl ExternalLookup for InMemoryLookup {
    fn confirm(
        &self,
        employee_id: &str,
        source_reference: &str,
        date: NaiveDate,
    ) -> EngineResult<bool> {
        if self.unreachable.contains(employee_id) {
            return Err(EngineError::LookupFailed {
                employee_id: employee_id.to_string(),
                date,
                message: "source unreachable".to_string(),
            });
        }

        Ok(self.confirmed.contains(&(
            employee_id.to_string(),
            source_reference.to_string(),
            date,
        )))
    }
}
