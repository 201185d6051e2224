//! Persisted identifiers for overtime credits and leave requests.
//!
//! Both identifiers share the layout `<PREFIX>-<YYYYMMDD>-<employeeId>-<sequence>`
//! with the sequence starting at 1. The employee id may itself contain dashes;
//! the sequence is always the segment after the last dash.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const DATE_KEY_FORMAT: &str = "%Y%m%d";

fn format_id(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    date: NaiveDate,
    employee_id: &str,
    sequence: u32,
) -> fmt::Result {
    write!(
        f,
        "{}-{}-{}-{}",
        prefix,
        date.format(DATE_KEY_FORMAT),
        employee_id,
        sequence
    )
}

fn parse_id(prefix: &str, s: &str) -> EngineResult<(NaiveDate, String, u32)> {
    let malformed = || EngineError::MalformedId {
        id: s.to_string(),
        expected: format!("{}-<YYYYMMDD>-<employeeId>-<sequence>", prefix),
    };

    let rest = s
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix('-'))
        .ok_or_else(malformed)?;
    let (date_part, rest) = rest.split_once('-').ok_or_else(malformed)?;
    let (employee_id, sequence) = rest.rsplit_once('-').ok_or_else(malformed)?;

    if date_part.len() != 8 || employee_id.is_empty() {
        return Err(malformed());
    }
    let date = NaiveDate::parse_from_str(date_part, DATE_KEY_FORMAT).map_err(|_| malformed())?;
    let sequence: u32 = sequence.parse().map_err(|_| malformed())?;
    if sequence == 0 {
        return Err(malformed());
    }

    Ok((date, employee_id.to_string(), sequence))
}

/// Identifier of an overtime credit: `OT-<YYYYMMDD>-<employeeId>-<sequence>`.
///
/// Ordering is by date, then employee, then numeric sequence, so that
/// `…-10` sorts after `…-2`.
///
/// # Example
///
/// ```
/// use overtime_ledger::models::CreditId;
/// use chrono::NaiveDate;
///
/// let id = CreditId::new(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(), "E001", 1);
/// assert_eq!(id.to_string(), "OT-20250801-E001-1");
/// assert_eq!("OT-20250801-E001-1".parse::<CreditId>().unwrap(), id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CreditId {
    date: NaiveDate,
    employee_id: String,
    sequence: u32,
}

impl CreditId {
    /// The identifier prefix.
    pub const PREFIX: &'static str = "OT";

    /// Builds a credit id from its parts.
    pub fn new(date: NaiveDate, employee_id: impl Into<String>, sequence: u32) -> Self {
        Self {
            date,
            employee_id: employee_id.into(),
            sequence,
        }
    }

    /// The date the overtime was earned.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The owning employee.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// The same-day disambiguating sequence (starting at 1).
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for CreditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_id(f, Self::PREFIX, self.date, &self.employee_id, self.sequence)
    }
}

impl FromStr for CreditId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, employee_id, sequence) = parse_id(Self::PREFIX, s)?;
        Ok(Self::new(date, employee_id, sequence))
    }
}

impl From<CreditId> for String {
    fn from(id: CreditId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CreditId {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Identifier of a leave request: `LV-<YYYYMMDD of application>-<employeeId>-<sequence>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LeaveId {
    application_date: NaiveDate,
    employee_id: String,
    sequence: u32,
}

impl LeaveId {
    /// The identifier prefix.
    pub const PREFIX: &'static str = "LV";

    /// Builds a leave id from its parts.
    pub fn new(application_date: NaiveDate, employee_id: impl Into<String>, sequence: u32) -> Self {
        Self {
            application_date,
            employee_id: employee_id.into(),
            sequence,
        }
    }

    /// The date the leave was applied for.
    pub fn application_date(&self) -> NaiveDate {
        self.application_date
    }

    /// The requesting employee.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// The same-day disambiguating sequence (starting at 1).
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for LeaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_id(
            f,
            Self::PREFIX,
            self.application_date,
            &self.employee_id,
            self.sequence,
        )
    }
}

impl FromStr for LeaveId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, employee_id, sequence) = parse_id(Self::PREFIX, s)?;
        Ok(Self::new(date, employee_id, sequence))
    }
}

impl From<LeaveId> for String {
    fn from(id: LeaveId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for LeaveId {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
