//! Request types for the payroll engine API.
//!
//! Request bodies are checked for shape and types by serde; the range and
//! ordering rules are enforced again by the engine when the request is
//! converted into its domain input.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::YearMonth;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ItemScope, ItemType, MAX_CUTOFF_DAY, MIN_CUTOFF_DAY, NewPayrollItem, PayrollConfigInput,
    PayrollStatus, SalaryInput,
};

/// Request body for `POST /payroll-config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollConfigRequest {
    /// First month of the schedule, `YYYY-MM`.
    pub start_year_month: String,
    /// Start day of the first cycle in each month.
    pub first_start_day: u32,
    /// End day of the first cycle in each month.
    pub first_end_day: u32,
    /// Start day of the second cycle in each month.
    pub second_start_day: u32,
    /// End day of the second cycle in each month.
    pub second_end_day: u32,
    /// Days between a cycle's end and its pay date.
    pub pay_date_offset: u32,
}

impl TryFrom<PayrollConfigRequest> for PayrollConfigInput {
    type Error = EngineError;

    fn try_from(req: PayrollConfigRequest) -> EngineResult<Self> {
        let start_year_month: YearMonth = req.start_year_month.parse()?;

        for (field, day) in [
            ("first_start_day", req.first_start_day),
            ("first_end_day", req.first_end_day),
            ("second_start_day", req.second_start_day),
            ("second_end_day", req.second_end_day),
        ] {
            if !(MIN_CUTOFF_DAY..=MAX_CUTOFF_DAY).contains(&day) {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "{field} must be between {MIN_CUTOFF_DAY} and {MAX_CUTOFF_DAY}, got {day}"
                    ),
                });
            }
        }

        Ok(PayrollConfigInput {
            start_year_month,
            first_start_day: req.first_start_day,
            first_end_day: req.first_end_day,
            second_start_day: req.second_start_day,
            second_end_day: req.second_end_day,
            pay_date_offset: req.pay_date_offset,
        })
    }
}

/// Request body for `POST /salary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRequest {
    /// The employee receiving the salary.
    pub employee_id: Uuid,
    /// Basic amount per pay period.
    pub basic_salary: Decimal,
    /// One of `daily`, `weekly`, `bi-weekly`, `monthly`.
    pub pay_period: String,
    /// First day the salary applies.
    pub start_date: NaiveDate,
    /// Day the salary stops applying, if known.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl SalaryRequest {
    /// Splits the request into the employee id and the salary input.
    pub fn into_parts(self) -> (Uuid, SalaryInput) {
        (
            self.employee_id,
            SalaryInput {
                basic_salary: self.basic_salary,
                pay_period: self.pay_period,
                start_date: self.start_date,
                end_date: self.end_date,
            },
        )
    }
}

/// Request body for `POST /payroll-items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollItemRequest {
    /// Required for `specific` items, absent for `global` ones.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Who may claim the item.
    pub scope: ItemScope,
    /// Earning, deduction or contribution.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Free-text label.
    pub category: String,
    /// Non-negative amount.
    pub amount: Decimal,
}

impl From<PayrollItemRequest> for NewPayrollItem {
    fn from(req: PayrollItemRequest) -> Self {
        NewPayrollItem {
            employee_id: req.employee_id,
            scope: req.scope,
            item_type: req.item_type,
            category: req.category,
            amount: req.amount,
        }
    }
}

/// Request body for `POST /payrolls/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Employee whose active salary is previewed.
    pub employee_id: Uuid,
}

/// Request body for `PUT /payrolls/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// The requested status.
    pub status: PayrollStatus,
}
