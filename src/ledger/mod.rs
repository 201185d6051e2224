//! The overtime credit ledger and the operations that act on it.
//!
//! - [`Ledger`] stores one credit per employee and date
//! - [`allocate`] draws leave requests against those credits
//! - [`validate`] reconciles credits with an [`ExternalLookup`]
//! - [`LeaveBook`] records leave requests and their outcomes

mod allocator;
mod credit_ledger;
mod leave_book;
mod sequence;
mod validator;

pub use allocator::{AllocationResult, CreditAllocation, allocate, shortfall_message};
pub use credit_ledger::{CreationStatus, CreditCreation, Ledger};
pub use leave_book::LeaveBook;
pub use sequence::SequenceCounter;
pub use validator::{ExternalLookup, validate, validate_employee};
