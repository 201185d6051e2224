//! Per-(employee, date) identifier sequences.

use std::collections::HashMap;

use chrono::NaiveDate;

/// Monotonic sequence numbers keyed by `(employee_id, date)`.
///
/// Sequences start at 1. The ledger owns one for credit ids; leave-request ids
/// use a request-scoped counter that callers pass into and get back from each
/// batch run.
///
/// # Example
///
/// ```
/// use overtime_ledger::ledger::SequenceCounter;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
/// let mut counter = SequenceCounter::default();
/// assert_eq!(counter.next("E001", date), 1);
/// assert_eq!(counter.next("E001", date), 2);
/// assert_eq!(counter.next("E002", date), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceCounter {
    last: HashMap<(String, NaiveDate), u32>,
}

impl SequenceCounter {
    /// Issues the next sequence for the key.
    pub fn next(&mut self, employee_id: &str, date: NaiveDate) -> u32 {
        let slot = self.last.entry((employee_id.to_string(), date)).or_insert(0);
        *slot += 1;
        *slot
    }

    /// Records that `sequence` is taken, so later calls to [`next`](Self::next) skip past it.
    pub fn observe(&mut self, employee_id: &str, date: NaiveDate, sequence: u32) {
        let slot = self.last.entry((employee_id.to_string(), date)).or_insert(0);
        if sequence > *slot {
            *slot = sequence;
        }
    }

    /// The last issued or observed sequence for the key.
    pub fn last(&self, employee_id: &str, date: NaiveDate) -> Option<u32> {
        self.last.get(&(employee_id.to_string(), date)).copied()
    }
}
