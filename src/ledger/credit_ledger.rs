//! The overtime credit ledger.
//!
//! Credits live in an append-only arena indexed by credit id and by
//! `(employee_id, date)`. Only [`Ledger::mutate_consumption`] changes hours
//! and status; only [`Ledger::annotate`] changes the diagnostic.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CreditId, CreditStatus, DailyWorkRecord, DayClassification, LeaveId, OvertimeCredit,
    OvertimeSegment,
};

use super::SequenceCounter;

/// Whether [`Ledger::create`] added a credit or found one already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationStatus {
    /// A new credit was appended.
    Created,
    /// A credit for the same employee and date already existed and was left untouched.
    AlreadyExists,
}

/// The outcome of [`Ledger::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCreation {
    /// Created or already present.
    pub status: CreationStatus,
    /// The credit now stored for the key.
    pub credit: OvertimeCredit,
}

/// Holds one overtime credit per `(employee_id, date)`.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    credits: Vec<OvertimeCredit>,
    by_id: HashMap<CreditId, usize>,
    by_day: HashMap<(String, NaiveDate), usize>,
    sequences: SequenceCounter,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the overtime earned on one day.
    ///
    /// Idempotent on `(employee_id, date)`: when a credit already exists for
    /// the key it is returned unchanged with [`CreationStatus::AlreadyExists`].
    /// Statutory-holiday credits are created with no remaining hours and
    /// status [`CreditStatus::NotRedeemable`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] when `segments` is empty, any
    /// segment's date differs from the record's, or any segment carries no
    /// hours.
    ///
    /// # Example
    ///
    /// ```
    /// use overtime_ledger::calculation::segment;
    /// use overtime_ledger::ledger::{CreationStatus, Ledger};
    /// use overtime_ledger::models::{CreditStatus, DailyWorkRecord, DayClassification};
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
    /// let segments = segment(record.day_classification, record.clock_in, record.total_worked_hours);
    ///
    /// let mut ledger = Ledger::new();
    /// let creation = ledger.create(&record, &segments).unwrap();
    /// assert_eq!(creation.status, CreationStatus::Created);
    /// assert_eq!(creation.credit.id.to_string(), "OT-20250801-E001-1");
    /// assert_eq!(creation.credit.earned_hours, Decimal::new(225, 2));
    /// assert_eq!(creation.credit.status, CreditStatus::Open);
    ///
    /// let again = ledger.create(&record, &segments).unwrap();
    /// assert_eq!(again.status, CreationStatus::AlreadyExists);
    /// assert_eq!(ledger.len(), 1);
    /// ```
    pub fn create(
        &mut self,
        record: &DailyWorkRecord,
        segments: &[OvertimeSegment],
    ) -> EngineResult<CreditCreation> {
        if segments.is_empty() {
            return Err(EngineError::validation(
                &record.employee_id,
                format!("no overtime segments for {}", record.date),
            ));
        }

        if let Some(segment) = segments.iter().find(|s| s.date != record.date) {
            return Err(EngineError::validation(
                &record.employee_id,
                format!(
                    "segment dated {} does not belong to record date {}",
                    segment.date, record.date
                ),
            ));
        }

        if let Some(segment) = segments.iter().find(|s| s.hours <= Decimal::ZERO) {
            return Err(EngineError::validation(
                &record.employee_id,
                format!(
                    "segment starting {} carries {} hours on {}",
                    segment.start, segment.hours, record.date
                ),
            ));
        }

        let key = (record.employee_id.clone(), record.date);
        if let Some(&index) = self.by_day.get(&key) {
            let existing = &self.credits[index];
            info!(
                employee_id = %record.employee_id,
                credit_id = %existing.id,
                "Credit already exists for date, skipping"
            );
            return Ok(CreditCreation {
                status: CreationStatus::AlreadyExists,
                credit: existing.clone(),
            });
        }

        let sequence = self.sequences.next(&record.employee_id, record.date);
        let id = CreditId::new(record.date, &record.employee_id, sequence);
        let earned_hours: Decimal = segments.iter().map(|s| s.hours).sum();

        let (remaining_hours, status) = match record.day_classification {
            DayClassification::StatutoryHoliday => (Decimal::ZERO, CreditStatus::NotRedeemable),
            DayClassification::Weekday | DayClassification::Restday => {
                (earned_hours, CreditStatus::Open)
            }
        };

        let credit = OvertimeCredit {
            id: id.clone(),
            employee_id: record.employee_id.clone(),
            date: record.date,
            day_classification: record.day_classification,
            earned_hours,
            consumed_hours: Decimal::ZERO,
            remaining_hours,
            status,
            consuming_leave_ids: Vec::new(),
            source_reference: record.source_reference(),
            diagnostic: None,
        };

        info!(
            employee_id = %credit.employee_id,
            credit_id = %credit.id,
            earned_hours = %credit.earned_hours,
            status = ?credit.status,
            "Created overtime credit"
        );

        self.insert(key, credit.clone());

        Ok(CreditCreation {
            status: CreationStatus::Created,
            credit,
        })
    }

    /// Draws `delta_hours` from a credit on behalf of a leave request.
    ///
    /// The credit is left unchanged when the call fails.
    ///
    /// # Errors
    ///
    /// - [`EngineError::CreditNotFound`] for an unknown id
    /// - [`EngineError::LedgerInvariantViolation`] when the credit is not
    ///   redeemable, the delta is not positive or remaining hours would go negative
    pub fn mutate_consumption(
        &mut self,
        credit_id: &CreditId,
        delta_hours: Decimal,
        leave_id: &LeaveId,
    ) -> EngineResult<&OvertimeCredit> {
        let index = self.index_of(credit_id)?;
        let credit = &mut self.credits[index];
        credit.apply_consumption(delta_hours, leave_id)?;

        debug!(
            credit_id = %credit.id,
            leave_id = %leave_id,
            delta_hours = %delta_hours,
            remaining_hours = %credit.remaining_hours,
            status = ?credit.status,
            "Consumed overtime credit"
        );

        Ok(credit)
    }

    /// Loads a previously persisted credit.
    ///
    /// The credit sequence counter advances past the imported id.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DuplicateId`] when the id or its `(employee_id, date)` key is taken
    /// - [`EngineError::Validation`] when the id disagrees with the credit's employee or date
    /// - [`EngineError::LedgerInvariantViolation`] when a redeemable credit is
    ///   unbalanced or has negative remaining hours
    pub fn import(&mut self, credit: OvertimeCredit) -> EngineResult<()> {
        if credit.id.employee_id() != credit.employee_id || credit.id.date() != credit.date {
            return Err(EngineError::validation(
                credit.id.to_string(),
                format!(
                    "id does not match employee '{}' and date {}",
                    credit.employee_id, credit.date
                ),
            ));
        }

        let key = (credit.employee_id.clone(), credit.date);
        if self.by_id.contains_key(&credit.id) || self.by_day.contains_key(&key) {
            return Err(EngineError::DuplicateId {
                id: credit.id.to_string(),
            });
        }

        if credit.status != CreditStatus::NotRedeemable
            && (credit.remaining_hours < Decimal::ZERO || !credit.is_balanced())
        {
            return Err(EngineError::invariant(
                credit.id.to_string(),
                format!(
                    "earned {} != consumed {} + remaining {}",
                    credit.earned_hours, credit.consumed_hours, credit.remaining_hours
                ),
            ));
        }

        self.sequences
            .observe(&credit.employee_id, credit.date, credit.id.sequence());
        debug!(credit_id = %credit.id, "Imported overtime credit");
        self.insert(key, credit);

        Ok(())
    }

    /// Sets or clears a credit's reconciliation annotation.
    ///
    /// Hours and status are never touched.
    pub fn annotate(&mut self, credit_id: &CreditId, diagnostic: Option<String>) -> EngineResult<()> {
        let index = self.index_of(credit_id)?;
        self.credits[index].diagnostic = diagnostic;
        Ok(())
    }

    /// Looks up a credit by id.
    pub fn get(&self, credit_id: &CreditId) -> Option<&OvertimeCredit> {
        self.by_id.get(credit_id).map(|&index| &self.credits[index])
    }

    /// Looks up the credit for an employee on a date.
    pub fn get_for_day(&self, employee_id: &str, date: NaiveDate) -> Option<&OvertimeCredit> {
        self.by_day
            .get(&(employee_id.to_string(), date))
            .map(|&index| &self.credits[index])
    }

    /// Returns an employee's credits, oldest date first, ties by credit id.
    pub fn credits_for(&self, employee_id: &str) -> Vec<&OvertimeCredit> {
        let mut credits: Vec<&OvertimeCredit> = self
            .credits
            .iter()
            .filter(|c| c.employee_id == employee_id)
            .collect();
        credits.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        credits
    }

    /// Every credit in insertion order.
    pub fn credits(&self) -> &[OvertimeCredit] {
        &self.credits
    }

    /// Total hours an employee can still redeem.
    pub fn available_hours(&self, employee_id: &str) -> Decimal {
        self.credits
            .iter()
            .filter(|c| c.employee_id == employee_id && c.is_available())
            .map(|c| c.remaining_hours)
            .sum()
    }

    /// Number of credits held.
    pub fn len(&self) -> usize {
        self.credits.len()
    }

    /// Whether the ledger holds no credits.
    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    fn index_of(&self, credit_id: &CreditId) -> EngineResult<usize> {
        self.by_id
            .get(credit_id)
            .copied()
            .ok_or_else(|| EngineError::CreditNotFound {
                credit_id: credit_id.to_string(),
            })
    }

    fn insert(&mut self, key: (String, NaiveDate), credit: OvertimeCredit) {
        let index = self.credits.len();
        self.by_id.insert(credit.id.clone(), index);
        self.by_day.insert(key, index);
        self.credits.push(credit);
    }
}
