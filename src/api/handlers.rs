//! HTTP request handlers for the tax engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    compute_company_tax, compute_gst, compute_payroll, compute_personal_tax, compute_portfolio,
};
use crate::error::{EngineError, EngineResult};

use super::request::{
    CorporateTaxRequest, GstRequest, PayrollRequest, PersonalTaxRequest, PortfolioRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, CalculationResponse, GstDisplay, PayrollDisplay,
    PortfolioDisplay, ReportDisplay,
};
use super::state::AppState;

const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tax/personal", post(personal_tax_handler))
        .route("/tax/corporate", post(corporate_tax_handler))
        .route("/payroll", post(payroll_handler))
        .route("/gst", post(gst_handler))
        .route("/portfolio", post(portfolio_handler))
        .with_state(state)
}

/// Handler for POST /tax/personal.
async fn personal_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<PersonalTaxRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "/tax/personal", "Processing personal tax request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = request.jurisdiction().and_then(|jurisdiction| {
        compute_personal_tax(
            &request.income,
            &request.deductions,
            jurisdiction,
            state.tables(),
        )
    });
    respond(&state, correlation_id, start_time, outcome, ReportDisplay::new)
}

/// Handler for POST /tax/corporate.
async fn corporate_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<CorporateTaxRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "/tax/corporate", "Processing corporate tax request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = request.jurisdiction().and_then(|jurisdiction| {
        compute_company_tax(&request.financials(), jurisdiction, state.tables())
    });
    respond(&state, correlation_id, start_time, outcome, ReportDisplay::new)
}

/// Handler for POST /payroll.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "/payroll", "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = compute_payroll(
        request.ctc,
        request.basic_percent,
        request.hra_percent,
        request.other_allowances,
        state.tables(),
    );
    respond(&state, correlation_id, start_time, outcome, PayrollDisplay::new)
}

/// Handler for POST /gst.
async fn gst_handler(
    State(state): State<AppState>,
    payload: Result<Json<GstRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "/gst", "Processing GST request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = request
        .direction()
        .and_then(|direction| compute_gst(request.amount, request.rate, direction, state.tables()));
    respond(&state, correlation_id, start_time, outcome, GstDisplay::new)
}

/// Handler for POST /portfolio.
async fn portfolio_handler(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, endpoint = "/portfolio", "Processing portfolio request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let batch_state = state.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        request
            .into_profiles()
            .and_then(|companies| compute_portfolio(&companies, batch_state.tables()))
    })
    .await
    .unwrap_or_else(|join_error| {
        Err(EngineError::ComputationInvariant {
            message: format!("portfolio batch did not complete: {}", join_error),
        })
    });
    respond(&state, correlation_id, start_time, outcome, PortfolioDisplay::new)
}

/// Wraps a calculation outcome in the response envelope, or maps its error.
fn respond<T, D>(
    state: &AppState,
    correlation_id: Uuid,
    start_time: Instant,
    outcome: EngineResult<T>,
    display: impl FnOnce(&T) -> D,
) -> Response
where
    T: Serialize,
    D: Serialize,
{
    match outcome {
        Ok(result) => {
            let duration_us = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);
            info!(
                correlation_id = %correlation_id,
                duration_us,
                "Calculation completed successfully"
            );
            let body = CalculationResponse {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: ENGINE_VERSION.to_string(),
                fiscal_year: state.tables().metadata().fiscal_year.clone(),
                duration_us,
                display: display(&result),
                result,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Maps a JSON extraction failure to a 400 response.
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

    ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    }
    .into_response()
}
