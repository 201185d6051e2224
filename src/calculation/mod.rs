//! Calculation logic for the overtime ledger engine.
//!
//! This module contains the pure functions of the engine: resolving a day's
//! classification from its calendar date and source markers, and splitting a
//! day's worked hours into tiered overtime segments.

mod day_detection;
mod segmenter;

pub use day_detection::{classify_day, is_calendar_weekend};
pub use segmenter::{BUFFER_HOURS, day_span_end, segment, segment_with_policy};
