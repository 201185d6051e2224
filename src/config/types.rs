//! Configuration types for overtime policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `policy.yaml`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default grace band after clock-in within which no weekday overtime is recognized.
pub const DEFAULT_BUFFER_HOURS: Decimal = Decimal::from_parts(725, 0, 0, false, 2);

/// Default upper bound on a single day's worked hours.
pub const DEFAULT_MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// How the allocator behaves when a leave request cannot be fully covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Plan the whole allocation first and apply it only if fully satisfiable.
    #[default]
    Atomic,
    /// Apply consumption credit by credit; a shortfall keeps what was applied.
    PartialCommit,
}

/// Overtime and allocation policy, from `policy.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hours after clock-in before weekday overtime starts.
    #[serde(default = "default_buffer_hours")]
    pub buffer_hours: Decimal,
    /// Records claiming more worked hours than this are rejected.
    #[serde(default = "default_max_daily_hours")]
    pub max_daily_hours: Decimal,
    /// Shortfall behavior of the allocator.
    #[serde(default)]
    pub allocation_mode: AllocationMode,
}

fn default_buffer_hours() -> Decimal {
    DEFAULT_BUFFER_HOURS
}

fn default_max_daily_hours() -> Decimal {
    DEFAULT_MAX_DAILY_HOURS
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            buffer_hours: DEFAULT_BUFFER_HOURS,
            max_daily_hours: DEFAULT_MAX_DAILY_HOURS,
            allocation_mode: AllocationMode::Atomic,
        }
    }
}
