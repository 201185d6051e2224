//! HTTP API module for the overtime ledger engine.
//!
//! This module exposes segmentation, credit recording, leave allocation and
//! the per-employee read accessors as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::SegmentRequest;
pub use response::{ApiError, ApiErrorResponse, CreditResponse, LeaveResponse};
pub use state::{AppState, Workspace};
