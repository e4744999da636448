//! Payroll run model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::PayrollItem;

/// Processing state of a payroll.
///
/// Moves forward only: `pending -> processed -> paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Generated, items may still be claimed.
    Pending,
    /// Items finalised for the cycle.
    Processed,
    /// Paid out; immutable.
    Paid,
}

impl PayrollStatus {
    /// The status that follows this one, if any.
    pub fn next(&self) -> Option<PayrollStatus> {
        match self {
            PayrollStatus::Pending => Some(PayrollStatus::Processed),
            PayrollStatus::Processed => Some(PayrollStatus::Paid),
            PayrollStatus::Paid => None,
        }
    }

    /// Returns true if a payroll in this status may be set to `to`.
    ///
    /// Setting the current status again is allowed and changes nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayrollStatus;
    ///
    /// assert!(PayrollStatus::Pending.can_transition_to(PayrollStatus::Processed));
    /// assert!(!PayrollStatus::Pending.can_transition_to(PayrollStatus::Paid));
    /// assert!(!PayrollStatus::Paid.can_transition_to(PayrollStatus::Pending));
    /// ```
    pub fn can_transition_to(&self, to: PayrollStatus) -> bool {
        *self == to || self.next() == Some(to)
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayrollStatus::Pending => "pending",
            PayrollStatus::Processed => "processed",
            PayrollStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

/// Aggregated amounts of a payroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Sum of earning items.
    pub total_earnings: Decimal,
    /// Sum of deduction and contribution items.
    pub total_deductions: Decimal,
    /// Earnings minus deductions.
    pub net_salary: Decimal,
}

/// A payroll run for one employee, salary and pay period.
///
/// Unique per `(employee_id, salary_id, pay_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee being paid.
    pub employee_id: Uuid,
    /// The salary the run was generated from.
    pub salary_id: Uuid,
    /// Pay date; equal to the pay period end.
    pub pay_date: NaiveDate,
    /// First day of the pay period.
    pub start_date: NaiveDate,
    /// Last day of the pay period.
    pub end_date: NaiveDate,
    /// Sum of earning items.
    pub total_earnings: Decimal,
    /// Sum of deduction and contribution items.
    pub total_deductions: Decimal,
    /// Earnings minus deductions.
    pub net_salary: Decimal,
    /// Processing state.
    pub status: PayrollStatus,
    /// When the run was generated.
    pub created_at: DateTime<Utc>,
}

impl Payroll {
    /// Creates a pending payroll with zero totals.
    pub fn pending(
        employee_id: Uuid,
        salary_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            salary_id,
            pay_date: end_date,
            start_date,
            end_date,
            total_earnings: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            status: PayrollStatus::Pending,
            created_at,
        }
    }

    /// Returns the aggregated amounts.
    pub fn totals(&self) -> PayrollTotals {
        PayrollTotals {
            total_earnings: self.total_earnings,
            total_deductions: self.total_deductions,
            net_salary: self.net_salary,
        }
    }

    /// Replaces the aggregated amounts.
    pub fn apply_totals(&mut self, totals: PayrollTotals) {
        self.total_earnings = totals.total_earnings;
        self.total_deductions = totals.total_deductions;
        self.net_salary = totals.net_salary;
    }

    /// Moves the payroll to `to`, enforcing forward-only transitions.
    pub fn transition_to(&mut self, to: PayrollStatus) -> EngineResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(EngineError::InvalidStatusTransition {
                payroll_id: self.id,
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}

/// A payroll with the items attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollDetail {
    /// The payroll.
    #[serde(flatten)]
    pub payroll: Payroll,
    /// Items claimed by or seeded for the payroll.
    pub items: Vec<PayrollItem>,
}
