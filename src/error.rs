//! Error types for the overtime ledger engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while segmenting overtime,
//! maintaining the credit ledger and allocating compensatory leave.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the overtime ledger engine.
///
/// All fallible operations in the engine return this error type. Batch
/// processing catches these per employee so that no error crosses an
/// employee boundary.
///
/// # Example
///
/// ```
/// use overtime_ledger::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds an out-of-range value.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A daily work record or request was malformed or inconsistent.
    #[error("Validation failed for '{subject}': {message}")]
    Validation {
        /// What was being validated (employee id, credit id, field name).
        subject: String,
        /// A description of the problem.
        message: String,
    },

    /// The requested leave hours exceed the available remaining credit.
    #[error(
        "leave hours exceed available overtime credit (short by {shortfall} hours) for employee '{employee_id}'"
    )]
    AllocationShortfall {
        /// The employee whose credit was insufficient.
        employee_id: String,
        /// The unmet portion of the request.
        shortfall: Decimal,
    },

    /// A ledger mutation would break a ledger invariant.
    #[error("Ledger invariant violated on credit '{credit_id}': {message}")]
    LedgerInvariantViolation {
        /// The credit the mutation targeted.
        credit_id: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// No credit exists with the given id.
    #[error("Overtime credit not found: {credit_id}")]
    CreditNotFound {
        /// The missing credit id.
        credit_id: String,
    },

    /// No leave request exists with the given id.
    #[error("Leave request not found: {leave_id}")]
    LeaveNotFound {
        /// The missing leave id.
        leave_id: String,
    },

    /// A leave request already carries a recorded outcome.
    #[error("Leave request '{leave_id}' already has a recorded outcome")]
    LeaveAlreadyFinalized {
        /// The immutable leave id.
        leave_id: String,
    },

    /// An identifier was issued or imported twice.
    #[error("Duplicate identifier: {id}")]
    DuplicateId {
        /// The duplicated id.
        id: String,
    },

    /// An identifier string did not match the persisted format.
    #[error("Malformed identifier '{id}': expected {expected}")]
    MalformedId {
        /// The rejected string.
        id: String,
        /// The expected layout.
        expected: String,
    },

    /// The attendance source could not deliver records for an employee.
    #[error("Attendance source unavailable for employee '{employee_id}': {message}")]
    SourceUnavailable {
        /// The employee whose records could not be read.
        employee_id: String,
        /// A description of the failure.
        message: String,
    },

    /// The external confirmation lookup failed.
    #[error("External lookup failed for employee '{employee_id}' on {date}: {message}")]
    LookupFailed {
        /// The employee being confirmed.
        employee_id: String,
        /// The credit date being confirmed.
        date: NaiveDate,
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(subject: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::LedgerInvariantViolation`] error.
    pub fn invariant(credit_id: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::LedgerInvariantViolation {
            credit_id: credit_id.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
