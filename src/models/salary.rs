//! Salary model and pay period frequencies.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// How often a salary is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayPeriod {
    /// Every day.
    Daily,
    /// Every 7 days from the salary start date.
    Weekly,
    /// Every 14 days from the salary start date.
    BiWeekly,
    /// At the end of every calendar month.
    Monthly,
}

impl PayPeriod {
    /// The wire spelling of this pay period.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayPeriod::Daily => "daily",
            PayPeriod::Weekly => "weekly",
            PayPeriod::BiWeekly => "bi-weekly",
            PayPeriod::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayPeriod {
    type Err = EngineError;

    /// Parses a pay period.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayPeriod;
    ///
    /// assert_eq!("bi-weekly".parse::<PayPeriod>().unwrap(), PayPeriod::BiWeekly);
    /// assert!("fortnightly".parse::<PayPeriod>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PayPeriod::Daily),
            "weekly" => Ok(PayPeriod::Weekly),
            "bi-weekly" => Ok(PayPeriod::BiWeekly),
            "monthly" => Ok(PayPeriod::Monthly),
            _ => Err(EngineError::UnsupportedPayPeriod {
                value: s.to_string(),
            }),
        }
    }
}

/// Fields supplied when assigning a salary to an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryInput {
    /// The basic salary paid per pay period.
    pub basic_salary: Decimal,
    /// Pay period as entered (e.g., "monthly"). Parsed when the salary is evaluated.
    pub pay_period: String,
    /// First day the salary applies.
    pub start_date: NaiveDate,
    /// Day the salary stops applying (exclusive), if already known.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl SalaryInput {
    /// Checks the amount and date range.
    ///
    /// `scale` is the number of fractional digits amounts are stored with.
    pub fn validate(&self, scale: u32) -> EngineResult<()> {
        if self.basic_salary < Decimal::ZERO {
            return Err(EngineError::InvalidSalary {
                field: "basic_salary".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.basic_salary.normalize().scale() > scale {
            return Err(EngineError::InvalidSalary {
                field: "basic_salary".to_string(),
                message: format!("must have at most {scale} decimal places"),
            });
        }
        if let Some(end_date) = self.end_date {
            if end_date <= self.start_date {
                return Err(EngineError::InvalidSalary {
                    field: "end_date".to_string(),
                    message: format!("must be after start_date {}", self.start_date),
                });
            }
        }
        Ok(())
    }
}

/// A salary assigned to an employee.
///
/// At most one salary per employee is active. The effective range is
/// `[start_date, end_date)`, so a superseded salary's `end_date` equals its
/// successor's `start_date` with neither a gap nor an overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee paid by this salary.
    pub employee_id: Uuid,
    /// The basic salary paid per pay period.
    pub basic_salary: Decimal,
    /// Pay period as entered.
    pub pay_period: String,
    /// First day the salary applies.
    pub start_date: NaiveDate,
    /// Day the salary stops applying (exclusive).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Whether this is the employee's current salary.
    #[serde(rename = "isActive", alias = "is_active")]
    pub is_active: bool,
}

impl Salary {
    /// Creates an active salary for an employee.
    pub fn new(employee_id: Uuid, input: SalaryInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            basic_salary: input.basic_salary,
            pay_period: input.pay_period,
            start_date: input.start_date,
            end_date: input.end_date,
            is_active: true,
        }
    }

    /// Parses the stored pay period.
    ///
    /// Fails with [`EngineError::UnsupportedPayPeriod`] for unknown values.
    pub fn pay_period(&self) -> EngineResult<PayPeriod> {
        self.pay_period.parse()
    }

    /// Returns true if the salary is active and applies on `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Salary, SalaryInput};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let salary = Salary::new(Uuid::new_v4(), SalaryInput {
    ///     basic_salary: Decimal::new(2000000, 2),
    ///     pay_period: "monthly".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     end_date: Some(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()),
    /// });
    /// assert!(salary.is_effective_on(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
    /// assert!(!salary.is_effective_on(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    /// ```
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.is_active && date >= self.start_date && self.end_date.is_none_or(|end| date < end)
    }
}
