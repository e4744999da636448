//! HTTP request handlers for the payroll engine API.
//!
//! Every handler tags its log lines with a fresh correlation id, runs one
//! engine unit of work against the shared database and maps engine errors
//! to [`ApiErrorResponse`]s.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::PayrollConfigInput;
use crate::service::{
    active_schedule, assign_salary, create_item, deactivate_salary, generate_due_payrolls,
    payroll_detail, preview_for_employee, process_cycle, replace_config, retire_active_config,
    update_payroll_status,
};
use crate::store::PayrollStore;

use super::request::{
    PayrollConfigRequest, PayrollItemRequest, PreviewRequest, SalaryRequest, StatusUpdateRequest,
};
use super::response::ApiErrorResponse;
use super::state::AppState;

type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/payroll-config",
            post(replace_config_handler)
                .get(get_config_handler)
                .delete(retire_config_handler),
        )
        .route("/payroll-cycles", get(list_cycles_handler))
        .route("/payroll-cycles/:id/process", post(process_cycle_handler))
        .route("/salary", post(assign_salary_handler))
        .route("/salary/:id", delete(deactivate_salary_handler))
        .route("/payroll-items", post(create_item_handler))
        .route("/payrolls/generate", post(generate_handler))
        .route("/payrolls/preview", post(preview_handler))
        .route("/payrolls/:id", get(get_payroll_handler))
        .route("/payrolls/:id/status", put(update_status_handler))
        .with_state(state)
}

fn respond<T: Serialize>(status: StatusCode, body: T) -> ApiResult {
    Ok((status, Json(body)).into_response())
}

fn rejected(correlation_id: Uuid, error: impl Into<ApiErrorResponse>) -> ApiErrorResponse {
    let response = error.into();
    warn!(
        correlation_id = %correlation_id,
        code = %response.error.code,
        error = %response.error.message,
        "Request rejected"
    );
    response
}

fn failed(correlation_id: Uuid, error: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        retryable = error.is_retryable(),
        "Request failed"
    );
    error.into()
}

/// Handler for POST /payroll-config.
///
/// Replaces the active configuration and returns it with its 24 cycles.
async fn replace_config_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollConfigRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll config replacement");

    let Json(request) = payload.map_err(|e| rejected(correlation_id, e))?;
    let input = PayrollConfigInput::try_from(request).map_err(|e| rejected(correlation_id, e))?;

    let now = state.clock().now();
    let schedule = state
        .db()
        .transaction(|tx| replace_config(tx, input, now))
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        config_id = %schedule.config.id,
        cycles = schedule.cycles.len(),
        "Payroll config replaced"
    );
    respond(StatusCode::CREATED, schedule)
}

/// Handler for GET /payroll-config.
async fn get_config_handler(State(state): State<AppState>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let schedule = state
        .db()
        .read(|tables| active_schedule(tables))
        .map_err(|e| failed(correlation_id, e))?
        .ok_or_else(|| {
            rejected(
                correlation_id,
                EngineError::NotFound {
                    entity: "active payroll config",
                    id: "none".to_string(),
                },
            )
        })?;
    respond(StatusCode::OK, schedule)
}

/// Handler for DELETE /payroll-config.
///
/// Retires the active configuration and its cycles.
async fn retire_config_handler(State(state): State<AppState>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();
    let config = state
        .db()
        .transaction(|tx| retire_active_config(tx, now))
        .map_err(|e| failed(correlation_id, e))?;

    info!(correlation_id = %correlation_id, config_id = %config.id, "Payroll config retired");
    respond(StatusCode::OK, config)
}

/// Handler for GET /payroll-cycles.
async fn list_cycles_handler(State(state): State<AppState>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let cycles = state
        .db()
        .read(|tables| tables.find_active_cycles())
        .map_err(|e| failed(correlation_id, e))?;
    respond(StatusCode::OK, cycles)
}

/// Handler for POST /payroll-cycles/:id/process.
async fn process_cycle_handler(
    State(state): State<AppState>,
    cycle_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Path(cycle_id) = cycle_id.map_err(|e| rejected(correlation_id, e))?;
    info!(correlation_id = %correlation_id, cycle_id = %cycle_id, "Processing payroll cycle");

    let scale = state.policy().amount_scale;
    let report = state
        .db()
        .transaction(|tx| process_cycle(tx, cycle_id, scale))
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        cycle_id = %cycle_id,
        processed = report.processed.len(),
        "Payroll cycle processed"
    );
    respond(StatusCode::OK, report)
}

/// Handler for POST /salary.
///
/// Creates the employee's salary, superseding the active one if present.
async fn assign_salary_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalaryRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|e| rejected(correlation_id, e))?;
    let (employee_id, input) = request.into_parts();

    let scale = state.policy().amount_scale;
    let salary = state
        .db()
        .transaction(|tx| assign_salary(tx, employee_id, input, scale))
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        salary_id = %salary.id,
        "Salary assigned"
    );
    respond(StatusCode::CREATED, salary)
}

/// Handler for DELETE /salary/:id.
///
/// Deactivates the salary; later generation passes skip it.
async fn deactivate_salary_handler(
    State(state): State<AppState>,
    salary_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Path(salary_id) = salary_id.map_err(|e| rejected(correlation_id, e))?;

    let salary = state
        .db()
        .transaction(|tx| deactivate_salary(tx, salary_id))
        .map_err(|e| failed(correlation_id, e))?;

    info!(correlation_id = %correlation_id, salary_id = %salary_id, "Salary deactivated");
    respond(StatusCode::OK, salary)
}

/// Handler for POST /payroll-items.
async fn create_item_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollItemRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|e| rejected(correlation_id, e))?;

    let scale = state.policy().amount_scale;
    let item = state
        .db()
        .transaction(|tx| create_item(tx, request.into(), scale))
        .map_err(|e| failed(correlation_id, e))?;

    info!(correlation_id = %correlation_id, item_id = %item.id, "Payroll item created");
    respond(StatusCode::CREATED, item)
}

/// Handler for POST /payrolls/generate.
///
/// Runs a generation pass over all active salaries using the server clock.
async fn generate_handler(State(state): State<AppState>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Starting generation pass");

    let start_time = Instant::now();
    let summary = generate_due_payrolls(state.db(), state.clock(), state.policy())
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        generated = summary.generated,
        skipped = summary.skipped.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Generation pass finished"
    );
    respond(StatusCode::OK, summary)
}

/// Handler for POST /payrolls/preview.
async fn preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|e| rejected(correlation_id, e))?;

    let preview = state
        .db()
        .read(|tables| preview_for_employee(tables, request.employee_id, state.policy()))
        .map_err(|e| failed(correlation_id, e))?;
    respond(StatusCode::OK, preview)
}

/// Handler for GET /payrolls/:id.
async fn get_payroll_handler(
    State(state): State<AppState>,
    payroll_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Path(payroll_id) = payroll_id.map_err(|e| rejected(correlation_id, e))?;

    let detail = state
        .db()
        .read(|tables| payroll_detail(tables, payroll_id))
        .map_err(|e| failed(correlation_id, e))?;
    respond(StatusCode::OK, detail)
}

/// Handler for PUT /payrolls/:id/status.
async fn update_status_handler(
    State(state): State<AppState>,
    payroll_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let Path(payroll_id) = payroll_id.map_err(|e| rejected(correlation_id, e))?;
    let Json(request) = payload.map_err(|e| rejected(correlation_id, e))?;

    let payroll = state
        .db()
        .transaction(|tx| update_payroll_status(tx, payroll_id, request.status))
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        payroll_id = %payroll_id,
        status = %payroll.status,
        "Payroll status updated"
    );
    respond(StatusCode::OK, payroll)
}
