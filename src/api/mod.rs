//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for installing payroll
//! configurations, assigning salaries, recording payroll items and running
//! payroll generation.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    PayrollConfigRequest, PayrollItemRequest, PreviewRequest, SalaryRequest, StatusUpdateRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
