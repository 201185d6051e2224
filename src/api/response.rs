//! Response types for the overtime ledger API.
//!
//! This module defines the success bodies and the error response structures
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::{AllocationResult, CreationStatus};
use crate::models::{LeaveRequest, OvertimeCredit};

/// Body of `POST /credits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditResponse {
    /// Whether the credit was created by this call.
    pub status: CreationStatus,
    /// The credit stored for the employee and date.
    pub credit: OvertimeCredit,
}

/// Body of `POST /leave`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveResponse {
    /// The registered request with its recorded outcome.
    pub request: LeaveRequest,
    /// Allocation detail.
    pub allocation: AllocationResult,
    /// Present when the request could not be covered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// API error response structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a not found error response.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::Validation { subject, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("The request for '{}' contains invalid information", subject),
                ),
            ),
            EngineError::MalformedId { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(message),
            ),
            EngineError::AllocationShortfall { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("ALLOCATION_SHORTFALL", message),
            ),
            EngineError::LedgerInvariantViolation { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("LEDGER_INVARIANT_VIOLATION", message),
            ),
            EngineError::CreditNotFound { .. } | EngineError::LeaveNotFound { .. } => {
                ApiErrorResponse::new(StatusCode::NOT_FOUND, ApiError::not_found(message))
            }
            EngineError::LeaveAlreadyFinalized { .. } | EngineError::DuplicateId { .. } => {
                ApiErrorResponse::new(StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
            }
            EngineError::SourceUnavailable { .. } | EngineError::LookupFailed { .. } => {
                ApiErrorResponse::new(
                    StatusCode::BAD_GATEWAY,
                    ApiError::new("UPSTREAM_ERROR", message),
                )
            }
        }
    }
}
