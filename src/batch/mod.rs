//! Batch pipeline: attendance in, credits and leave outcomes out.
//!
//! # Example
//!
//! ```
//! use overtime_ledger::batch::{Engine, InMemoryAttendanceSource, run_batch};
//! use overtime_ledger::config::ConfigLoader;
//! use overtime_ledger::ledger::SequenceCounter;
//!
//! let mut engine = Engine::new(ConfigLoader::default());
//! let mut source = InMemoryAttendanceSource::new();
//! let (report, _counter) = run_batch(
//!     &mut engine,
//!     &mut source,
//!     &["E001".to_string()],
//!     &[],
//!     None,
//!     SequenceCounter::default(),
//! );
//! assert_eq!(report.employees_processed, 1);
//! assert_eq!(report.credits_created, 0);
//! ```

mod runner;
mod source;

pub use runner::{BatchError, BatchReport, Engine, LeaveSubmission, run_batch};
pub use source::{AttendanceSource, InMemoryAttendanceSource, InMemoryLookup};
