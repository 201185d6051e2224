//! HTTP request handlers for the overtime ledger API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::batch::LeaveSubmission;
use crate::calculation::segment_with_policy;
use crate::error::EngineError;
use crate::ledger::CreationStatus;
use crate::models::{CreditId, DailyWorkRecord, LeaveRequest, OvertimeCredit};

use super::request::SegmentRequest;
use super::response::{ApiError, ApiErrorResponse, CreditResponse, LeaveResponse};
use super::state::{AppState, Workspace};

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/segment", post(segment_handler))
        .route("/credits", post(create_credit_handler))
        .route("/credits/:credit_id", get(get_credit_handler))
        .route("/leave", post(submit_leave_handler))
        .route("/employees/:employee_id/credits", get(employee_credits_handler))
        .route("/employees/:employee_id/leave", get(employee_leave_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a body extraction failure to an error response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}

fn engine_error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    ApiErrorResponse::from(error).into_response()
}

/// Handler for POST /segment.
///
/// Returns the overtime segments for one day without touching the ledger.
async fn segment_handler(
    State(state): State<AppState>,
    payload: Result<Json<SegmentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing segment request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let policy = state.config().policy();
    if let Err(e) = request.validate(policy.max_daily_hours) {
        return engine_error_response(correlation_id, e);
    }

    let start_time = Instant::now();
    let segments = segment_with_policy(
        policy,
        request.day_classification,
        request.clock_in,
        request.total_worked_hours,
    );

    info!(
        correlation_id = %correlation_id,
        day_classification = %request.day_classification,
        segments = segments.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Segmentation completed"
    );

    json_response(StatusCode::OK, segments)
}

/// Handler for POST /credits.
///
/// Records one day of attendance. Responds 201 when a credit is created and
/// 200 when one already existed for the employee and date.
async fn create_credit_handler(
    State(state): State<AppState>,
    payload: Result<Json<DailyWorkRecord>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing credit request");

    let record = match payload {
        Ok(Json(record)) => record,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let outcome = state.workspace().engine.ingest_record(&record);

    match outcome {
        Ok(Some(creation)) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %record.employee_id,
                credit_id = %creation.credit.id,
                status = ?creation.status,
                "Credit request completed"
            );
            let status = match creation.status {
                CreationStatus::Created => StatusCode::CREATED,
                CreationStatus::AlreadyExists => StatusCode::OK,
            };
            json_response(
                status,
                CreditResponse {
                    status: creation.status,
                    credit: creation.credit,
                },
            )
        }
        Ok(None) => engine_error_response(
            correlation_id,
            EngineError::validation(
                &record.employee_id,
                format!(
                    "{} worked hours on {} carry no overtime beyond the buffer band",
                    record.total_worked_hours, record.date
                ),
            ),
        ),
        Err(e) => engine_error_response(correlation_id, e),
    }
}

/// Handler for GET /credits/:credit_id.
async fn get_credit_handler(
    State(state): State<AppState>,
    Path(credit_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let id = match credit_id.parse::<CreditId>() {
        Ok(id) => id,
        Err(e) => return engine_error_response(correlation_id, e),
    };

    let credit = state.workspace().engine.ledger().get(&id).cloned();
    match credit {
        Some(credit) => json_response(StatusCode::OK, credit),
        None => engine_error_response(correlation_id, EngineError::CreditNotFound { credit_id }),
    }
}

/// Handler for POST /leave.
///
/// Registers and allocates a leave request. Responds 200 when it is fully
/// covered and 409 on a shortfall; both bodies carry the recorded request.
async fn submit_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveSubmission>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave request");

    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let outcome = {
        let mut workspace = state.workspace();
        let Workspace {
            engine,
            leave_counter,
        } = &mut *workspace;
        engine.submit_leave(&submission, leave_counter)
    };

    match outcome {
        Ok((request, allocation)) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                leave_id = %request.id,
                outcome = ?request.outcome,
                "Leave request completed"
            );

            if allocation.success {
                json_response(
                    StatusCode::OK,
                    LeaveResponse {
                        request,
                        allocation,
                        error: None,
                    },
                )
            } else {
                let error = allocation
                    .shortfall_error()
                    .map(|e| ApiErrorResponse::from(e).error);
                json_response(
                    StatusCode::CONFLICT,
                    LeaveResponse {
                        request,
                        allocation,
                        error,
                    },
                )
            }
        }
        Err(e) => engine_error_response(correlation_id, e),
    }
}

/// Handler for GET /employees/:employee_id/credits.
async fn employee_credits_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let credits: Vec<OvertimeCredit> = state
        .workspace()
        .engine
        .ledger()
        .credits_for(&employee_id)
        .into_iter()
        .cloned()
        .collect();

    json_response(StatusCode::OK, credits)
}

/// Handler for GET /employees/:employee_id/leave.
async fn employee_leave_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let requests: Vec<LeaveRequest> = state
        .workspace()
        .engine
        .leave_book()
        .requests_for(&employee_id)
        .into_iter()
        .cloned()
        .collect();

    json_response(StatusCode::OK, requests)
}
