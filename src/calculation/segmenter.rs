//! Overtime segmentation.
//!
//! This module splits one day's total worked hours into tiered overtime
//! segments, each paid at a fixed statutory multiplier.
//!
//! ## Tier Structure
//!
//! Nothing is recognized while total worked hours are within the buffer band
//! (7.25 hours by default), whatever the day classification.
//!
//! **Weekday** (segments start at clock-in + buffer):
//! - buffer to 8 hours: 1.00
//! - 8 to 10 hours: 1.34
//! - beyond 10 hours: 1.67
//!
//! **Rest day** (segments start at clock-in):
//! - first 2 hours: 1.34
//! - next 6 hours: 1.67
//! - next 4 hours at most: 2.67
//!
//! **Statutory holiday** (segments start at clock-in):
//! - first 8 hours: 2.00
//! - next 2 hours: 2.33
//! - next 2 hours at most: 2.67

use chrono::{Duration, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::{DEFAULT_BUFFER_HOURS, PolicyConfig};
use crate::models::{DayClassification, Multiplier, OvertimeSegment};

/// Worked hours at or below this produce no overtime.
pub const BUFFER_HOURS: Decimal = DEFAULT_BUFFER_HOURS;

const WEEKDAY_TIER_1_END: Decimal = Decimal::from_parts(8, 0, 0, false, 0);
const WEEKDAY_TIER_2_END: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

const REST_DAY_TIER_1_HOURS: Decimal = Decimal::from_parts(2, 0, 0, false, 0);
const REST_DAY_TIER_2_END: Decimal = Decimal::from_parts(8, 0, 0, false, 0);
const REST_DAY_TIER_3_CAP: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

const HOLIDAY_TIER_1_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);
const HOLIDAY_TIER_2_END: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
const HOLIDAY_TIER_3_CAP: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Splits a day's worked hours into overtime segments using the default buffer.
///
/// # Arguments
///
/// * `day_classification` - Selects the tier table
/// * `clock_in` - The day's earliest clock-in; segment instants chain from it
/// * `total_worked_hours` - The day's total worked hours
///
/// # Returns
///
/// Segments in chronological order. Each segment's hours are rounded to 2
/// decimal places independently; start/end instants advance by the unrounded
/// length. A tier that rounds to zero hours is left out. Instants saturate at
/// the end of the representable calendar; use [`day_span_end`] to reject such
/// clock-ins up front.
///
/// # Examples
///
/// ## Weekday, 9.5 hours worked
///
/// ```
/// use overtime_ledger::calculation::segment;
/// use overtime_ledger::models::{DayClassification, Multiplier};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let clock_in = NaiveDateTime::parse_from_str("2025-08-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let segments = segment(DayClassification::Weekday, clock_in, Decimal::from_str("9.5").unwrap());
///
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].hours, Decimal::from_str("0.75").unwrap());
/// assert_eq!(segments[0].multiplier, Multiplier::Single);
/// assert_eq!(segments[1].hours, Decimal::from_str("1.5").unwrap());
/// assert_eq!(segments[1].multiplier, Multiplier::OneAndOneThird);
/// ```
///
/// ## Within the buffer band
///
/// ```
/// use overtime_ledger::calculation::segment;
/// use overtime_ledger::models::DayClassification;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let clock_in = NaiveDateTime::parse_from_str("2025-08-02 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let segments = segment(DayClassification::Restday, clock_in, Decimal::from_str("7.25").unwrap());
/// assert!(segments.is_empty());
/// ```
pub fn segment(
    day_classification: DayClassification,
    clock_in: NaiveDateTime,
    total_worked_hours: Decimal,
) -> Vec<OvertimeSegment> {
    segment_with_buffer(BUFFER_HOURS, day_classification, clock_in, total_worked_hours)
}

/// Splits a day's worked hours into overtime segments using the policy's buffer.
///
/// With a non-default buffer the first weekday tier covers `buffer..8`.
pub fn segment_with_policy(
    policy: &PolicyConfig,
    day_classification: DayClassification,
    clock_in: NaiveDateTime,
    total_worked_hours: Decimal,
) -> Vec<OvertimeSegment> {
    segment_with_buffer(
        policy.buffer_hours,
        day_classification,
        clock_in,
        total_worked_hours,
    )
}

/// Returns the instant `hours` after `clock_in`, or `None` when it lies past
/// the end of the representable calendar.
///
/// # Examples
///
/// ```
/// use overtime_ledger::calculation::day_span_end;
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let clock_in = NaiveDateTime::parse_from_str("2025-08-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(
///     day_span_end(clock_in, Decimal::new(95, 1)),
///     NaiveDateTime::parse_from_str("2025-08-01 18:30:00", "%Y-%m-%d %H:%M:%S").ok()
/// );
///
/// let last_day = NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap();
/// assert!(day_span_end(last_day, Decimal::from(10)).is_none());
/// ```
pub fn day_span_end(clock_in: NaiveDateTime, hours: Decimal) -> Option<NaiveDateTime> {
    hours_to_duration(hours).and_then(|span| clock_in.checked_add_signed(span))
}

fn segment_with_buffer(
    buffer_hours: Decimal,
    day_classification: DayClassification,
    clock_in: NaiveDateTime,
    total_worked_hours: Decimal,
) -> Vec<OvertimeSegment> {
    if total_worked_hours <= buffer_hours {
        debug!(
            clock_in = %clock_in,
            total_worked_hours = %total_worked_hours,
            "Worked hours within buffer band, no overtime"
        );
        return Vec::new();
    }

    let (origin, tiers) = match day_classification {
        DayClassification::Weekday => (
            advance(clock_in, buffer_hours),
            weekday_tiers(buffer_hours, total_worked_hours),
        ),
        DayClassification::Restday => (clock_in, rest_day_tiers(total_worked_hours)),
        DayClassification::StatutoryHoliday => (clock_in, holiday_tiers(total_worked_hours)),
    };

    let mut segments = Vec::with_capacity(tiers.len());
    let mut start = origin;

    for (hours, multiplier) in tiers {
        if hours <= Decimal::ZERO {
            continue;
        }

        let end = advance(start, hours);
        let rounded = round_hours(hours);
        if !rounded.is_zero() {
            segments.push(OvertimeSegment {
                date: clock_in.date(),
                start,
                end,
                hours: rounded,
                multiplier,
                day_classification,
            });
        }
        start = end;
    }

    debug!(
        day_classification = %day_classification,
        total_worked_hours = %total_worked_hours,
        segments = segments.len(),
        "Segmented overtime"
    );

    segments
}

fn weekday_tiers(buffer_hours: Decimal, worked: Decimal) -> Vec<(Decimal, Multiplier)> {
    let first_tier = WEEKDAY_TIER_1_END - buffer_hours;

    if worked <= WEEKDAY_TIER_1_END {
        vec![(worked - buffer_hours, Multiplier::Single)]
    } else if worked <= WEEKDAY_TIER_2_END {
        vec![
            (first_tier, Multiplier::Single),
            (worked - WEEKDAY_TIER_1_END, Multiplier::OneAndOneThird),
        ]
    } else {
        vec![
            (first_tier, Multiplier::Single),
            (
                WEEKDAY_TIER_2_END - WEEKDAY_TIER_1_END,
                Multiplier::OneAndOneThird,
            ),
            (worked - WEEKDAY_TIER_2_END, Multiplier::OneAndTwoThirds),
        ]
    }
}

fn rest_day_tiers(worked: Decimal) -> Vec<(Decimal, Multiplier)> {
    if worked <= REST_DAY_TIER_1_HOURS {
        vec![(worked, Multiplier::OneAndOneThird)]
    } else if worked <= REST_DAY_TIER_2_END {
        vec![
            (REST_DAY_TIER_1_HOURS, Multiplier::OneAndOneThird),
            (worked - REST_DAY_TIER_1_HOURS, Multiplier::OneAndTwoThirds),
        ]
    } else {
        vec![
            (REST_DAY_TIER_1_HOURS, Multiplier::OneAndOneThird),
            (
                REST_DAY_TIER_2_END - REST_DAY_TIER_1_HOURS,
                Multiplier::OneAndTwoThirds,
            ),
            (
                (worked - REST_DAY_TIER_2_END).min(REST_DAY_TIER_3_CAP),
                Multiplier::DoubleAndTwoThirds,
            ),
        ]
    }
}

fn holiday_tiers(worked: Decimal) -> Vec<(Decimal, Multiplier)> {
    if worked <= HOLIDAY_TIER_1_HOURS {
        vec![(worked, Multiplier::Double)]
    } else if worked <= HOLIDAY_TIER_2_END {
        vec![
            (HOLIDAY_TIER_1_HOURS, Multiplier::Double),
            (worked - HOLIDAY_TIER_1_HOURS, Multiplier::DoubleAndOneThird),
        ]
    } else {
        vec![
            (HOLIDAY_TIER_1_HOURS, Multiplier::Double),
            (
                HOLIDAY_TIER_2_END - HOLIDAY_TIER_1_HOURS,
                Multiplier::DoubleAndOneThird,
            ),
            (
                (worked - HOLIDAY_TIER_2_END).min(HOLIDAY_TIER_3_CAP),
                Multiplier::DoubleAndTwoThirds,
            ),
        ]
    }
}

/// Rounds an hour value to 2 decimal places, halves away from zero.
fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Moves `from` forward by `hours`, saturating at the calendar maximum.
fn advance(from: NaiveDateTime, hours: Decimal) -> NaiveDateTime {
    day_span_end(from, hours).unwrap_or(NaiveDateTime::MAX)
}

/// Converts decimal hours to a duration, to the nearest whole second.
fn hours_to_duration(hours: Decimal) -> Option<Duration> {
    hours
        .checked_mul(SECONDS_PER_HOUR)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .and_then(Duration::try_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn nine_am() -> NaiveDateTime {
        make_datetime("2025-08-01", "09:00:00")
    }

    fn shape(segments: &[OvertimeSegment]) -> Vec<(Decimal, Multiplier)> {
        segments.iter().map(|s| (s.hours, s.multiplier)).collect()
    }

    fn total(segments: &[OvertimeSegment]) -> Decimal {
        segments.iter().map(|s| s.hours).sum()
    }

    // ==========================================================================
    // Buffer band
    // ==========================================================================
    #[test]
    fn test_buffer_band_yields_nothing_for_every_classification() {
        for classification in [
            DayClassification::Weekday,
            DayClassification::Restday,
            DayClassification::StatutoryHoliday,
        ] {
            for hours in ["0", "1.5", "2", "7", "7.25"] {
                assert!(
                    segment(classification, nine_am(), dec(hours)).is_empty(),
                    "{} hours on {:?} should produce no overtime",
                    hours,
                    classification
                );
            }
        }
    }

    #[test]
    fn test_negative_hours_fall_under_buffer_rule() {
        assert!(segment(DayClassification::Weekday, nine_am(), dec("-3")).is_empty());
    }

    // ==========================================================================
    // Weekday tiers
    // ==========================================================================
    #[test]
    fn test_weekday_7_5h_single_tier() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("7.5"));
        assert_eq!(shape(&segments), vec![(dec("0.25"), Multiplier::Single)]);
        assert_eq!(segments[0].start, make_datetime("2025-08-01", "16:15:00"));
        assert_eq!(segments[0].end, make_datetime("2025-08-01", "16:30:00"));
    }

    #[test]
    fn test_weekday_8h_boundary_stays_in_first_band() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("8"));
        assert_eq!(shape(&segments), vec![(dec("0.75"), Multiplier::Single)]);
    }

    #[test]
    fn test_weekday_9_5h_two_tiers() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("9.5"));

        assert_eq!(
            shape(&segments),
            vec![
                (dec("0.75"), Multiplier::Single),
                (dec("1.5"), Multiplier::OneAndOneThird),
            ]
        );
        assert_eq!(total(&segments), dec("2.25"));

        assert_eq!(segments[0].start, make_datetime("2025-08-01", "16:15:00"));
        assert_eq!(segments[0].end, make_datetime("2025-08-01", "17:00:00"));
        assert_eq!(segments[1].start, segments[0].end);
        assert_eq!(segments[1].end, make_datetime("2025-08-01", "18:30:00"));
    }

    #[test]
    fn test_weekday_10h_boundary_stays_in_second_band() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("10"));
        assert_eq!(
            shape(&segments),
            vec![
                (dec("0.75"), Multiplier::Single),
                (dec("2"), Multiplier::OneAndOneThird),
            ]
        );
    }

    #[test]
    fn test_weekday_12h_three_tiers() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("12"));
        assert_eq!(
            shape(&segments),
            vec![
                (dec("0.75"), Multiplier::Single),
                (dec("2"), Multiplier::OneAndOneThird),
                (dec("2"), Multiplier::OneAndTwoThirds),
            ]
        );
        assert_eq!(segments[2].end, make_datetime("2025-08-01", "21:00:00"));
    }

    #[test]
    fn test_weekday_last_tier_is_uncapped() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("14"));
        assert_eq!(segments[2].hours, dec("4"));
        assert_eq!(total(&segments), dec("6.75"));
    }

    // ==========================================================================
    // Rest-day tiers
    // ==========================================================================
    #[test]
    fn test_rest_day_10h_three_tiers_from_clock_in() {
        let segments = segment(DayClassification::Restday, nine_am(), dec("10"));

        assert_eq!(
            shape(&segments),
            vec![
                (dec("2"), Multiplier::OneAndOneThird),
                (dec("6"), Multiplier::OneAndTwoThirds),
                (dec("2"), Multiplier::DoubleAndTwoThirds),
            ]
        );
        assert_eq!(total(&segments), dec("10"));
        assert_eq!(segments[0].start, nine_am());
        assert_eq!(segments[1].start, make_datetime("2025-08-01", "11:00:00"));
        assert_eq!(segments[2].start, make_datetime("2025-08-01", "17:00:00"));
        assert_eq!(segments[2].end, make_datetime("2025-08-01", "19:00:00"));
    }

    #[test]
    fn test_rest_day_8h_boundary() {
        let segments = segment(DayClassification::Restday, nine_am(), dec("8"));
        assert_eq!(
            shape(&segments),
            vec![
                (dec("2"), Multiplier::OneAndOneThird),
                (dec("6"), Multiplier::OneAndTwoThirds),
            ]
        );
    }

    #[test]
    fn test_rest_day_third_tier_capped_at_4h() {
        let segments = segment(DayClassification::Restday, nine_am(), dec("13"));
        assert_eq!(segments[2].hours, dec("4"));
        assert_eq!(total(&segments), dec("12"));
        assert_eq!(segments[2].end, make_datetime("2025-08-01", "21:00:00"));
    }

    // ==========================================================================
    // Statutory-holiday tiers
    // ==========================================================================
    #[test]
    fn test_holiday_8h_single_tier() {
        let segments = segment(DayClassification::StatutoryHoliday, nine_am(), dec("8"));
        assert_eq!(shape(&segments), vec![(dec("8"), Multiplier::Double)]);
        assert_eq!(segments[0].end, make_datetime("2025-08-01", "17:00:00"));
    }

    #[test]
    fn test_holiday_9h_two_tiers() {
        let segments = segment(DayClassification::StatutoryHoliday, nine_am(), dec("9"));
        assert_eq!(
            shape(&segments),
            vec![
                (dec("8"), Multiplier::Double),
                (dec("1"), Multiplier::DoubleAndOneThird),
            ]
        );
    }

    #[test]
    fn test_holiday_11_5h_three_tiers() {
        let segments = segment(DayClassification::StatutoryHoliday, nine_am(), dec("11.5"));
        assert_eq!(
            shape(&segments),
            vec![
                (dec("8"), Multiplier::Double),
                (dec("2"), Multiplier::DoubleAndOneThird),
                (dec("1.5"), Multiplier::DoubleAndTwoThirds),
            ]
        );
        assert_eq!(total(&segments), dec("11.5"));
    }

    #[test]
    fn test_holiday_third_tier_capped_at_2h() {
        let segments = segment(DayClassification::StatutoryHoliday, nine_am(), dec("15"));
        assert_eq!(segments[2].hours, dec("2"));
        assert_eq!(total(&segments), dec("12"));
    }

    // ==========================================================================
    // Rounding and instants
    // ==========================================================================
    #[test]
    fn test_hours_round_to_two_places_independently() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("9.333"));
        assert_eq!(segments[1].hours, dec("1.33"));
        // 1.333h = 4798.8s, rounded to 4799s
        assert_eq!(segments[1].end, make_datetime("2025-08-01", "18:19:59"));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("8.005"));
        assert_eq!(segments[1].hours, dec("0.01"));
    }

    #[test]
    fn test_segments_carry_date_and_classification() {
        let segments = segment(DayClassification::Restday, nine_am(), dec("9"));
        for s in &segments {
            assert_eq!(s.date, nine_am().date());
            assert_eq!(s.day_classification, DayClassification::Restday);
        }
    }

    #[test]
    fn test_segments_are_contiguous() {
        let segments = segment(DayClassification::Weekday, nine_am(), dec("11.75"));
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    // ==========================================================================
    // Policy buffer
    // ==========================================================================
    #[test]
    fn test_policy_buffer_shifts_weekday_origin_and_first_tier() {
        let policy = PolicyConfig {
            buffer_hours: dec("7"),
            ..PolicyConfig::default()
        };
        let segments =
            segment_with_policy(&policy, DayClassification::Weekday, nine_am(), dec("9"));

        assert_eq!(
            shape(&segments),
            vec![
                (dec("1"), Multiplier::Single),
                (dec("1"), Multiplier::OneAndOneThird),
            ]
        );
        assert_eq!(segments[0].start, make_datetime("2025-08-01", "16:00:00"));
    }

    #[test]
    fn test_default_policy_matches_plain_segment() {
        let policy = PolicyConfig::default();
        for hours in ["7.3", "9.5", "12.25"] {
            assert_eq!(
                segment_with_policy(&policy, DayClassification::Weekday, nine_am(), dec(hours)),
                segment(DayClassification::Weekday, nine_am(), dec(hours))
            );
        }
    }

    // ==========================================================================
    // Sub-hundredth tiers and calendar edge
    // ==========================================================================
    #[test]
    fn test_tier_rounding_to_zero_is_dropped() {
        assert!(segment(DayClassification::Weekday, nine_am(), dec("7.254")).is_empty());

        let segments = segment(DayClassification::Weekday, nine_am(), dec("10.004"));
        assert_eq!(
            shape(&segments),
            vec![
                (dec("0.75"), Multiplier::Single),
                (dec("2"), Multiplier::OneAndOneThird),
            ]
        );
    }

    #[test]
    fn test_clock_in_at_calendar_end_saturates() {
        let last_day = NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap();
        let segments = segment(DayClassification::Weekday, last_day, dec("10"));

        assert_eq!(total(&segments), dec("2.75"));
        assert_eq!(segments[0].start, NaiveDateTime::MAX);
        assert_eq!(segments.last().unwrap().end, NaiveDateTime::MAX);
    }

    #[test]
    fn test_day_span_end() {
        assert_eq!(
            day_span_end(nine_am(), dec("9.5")),
            Some(make_datetime("2025-08-01", "18:30:00"))
        );
        assert!(day_span_end(NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap(), dec("1")).is_none());
    }
}
