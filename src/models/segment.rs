//! Overtime segment and multiplier models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::DayClassification;

/// A statutory overtime pay-rate multiplier.
///
/// The set of multipliers is closed and each value is a fixed decimal
/// constant. Variants are declared in ascending order so the derived `Ord`
/// matches numeric order.
///
/// # Example
///
/// ```
/// use overtime_ledger::models::Multiplier;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(Multiplier::OneAndOneThird.value(), Decimal::from_str("1.34").unwrap());
/// assert!(Multiplier::Single < Multiplier::DoubleAndTwoThirds);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "Decimal", try_from = "Decimal")]
pub enum Multiplier {
    /// 1.00
    Single,
    /// 1.34
    OneAndOneThird,
    /// 1.67
    OneAndTwoThirds,
    /// 2.00
    Double,
    /// 2.33
    DoubleAndOneThird,
    /// 2.67
    DoubleAndTwoThirds,
}

const SINGLE: Decimal = Decimal::from_parts(100, 0, 0, false, 2);
const ONE_AND_ONE_THIRD: Decimal = Decimal::from_parts(134, 0, 0, false, 2);
const ONE_AND_TWO_THIRDS: Decimal = Decimal::from_parts(167, 0, 0, false, 2);
const DOUBLE: Decimal = Decimal::from_parts(200, 0, 0, false, 2);
const DOUBLE_AND_ONE_THIRD: Decimal = Decimal::from_parts(233, 0, 0, false, 2);
const DOUBLE_AND_TWO_THIRDS: Decimal = Decimal::from_parts(267, 0, 0, false, 2);

impl Multiplier {
    /// All multipliers in ascending order.
    pub const ALL: [Multiplier; 6] = [
        Multiplier::Single,
        Multiplier::OneAndOneThird,
        Multiplier::OneAndTwoThirds,
        Multiplier::Double,
        Multiplier::DoubleAndOneThird,
        Multiplier::DoubleAndTwoThirds,
    ];

    /// The exact decimal value of this multiplier.
    pub fn value(self) -> Decimal {
        match self {
            Multiplier::Single => SINGLE,
            Multiplier::OneAndOneThird => ONE_AND_ONE_THIRD,
            Multiplier::OneAndTwoThirds => ONE_AND_TWO_THIRDS,
            Multiplier::Double => DOUBLE,
            Multiplier::DoubleAndOneThird => DOUBLE_AND_ONE_THIRD,
            Multiplier::DoubleAndTwoThirds => DOUBLE_AND_TWO_THIRDS,
        }
    }
}

impl std::fmt::Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl From<Multiplier> for Decimal {
    fn from(multiplier: Multiplier) -> Self {
        multiplier.value()
    }
}

impl TryFrom<Decimal> for Multiplier {
    type Error = EngineError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Multiplier::ALL
            .into_iter()
            .find(|m| m.value() == value)
            .ok_or_else(|| {
                EngineError::validation("multiplier", format!("{} is not a statutory multiplier", value))
            })
    }
}

/// One contiguous block of overtime within a day, paid at a single multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeSegment {
    /// The day the overtime belongs to.
    pub date: NaiveDate,
    /// When this block starts.
    pub start: NaiveDateTime,
    /// When this block ends.
    pub end: NaiveDateTime,
    /// Length of the block in hours, rounded to 2 decimal places.
    pub hours: Decimal,
    /// The multiplier applied to this block.
    pub multiplier: Multiplier,
    /// The classification of the day the block was worked on.
    pub day_classification: DayClassification,
}
