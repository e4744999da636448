//! Payroll configuration model.
//!
//! A [`PayrollConfig`] describes how each month is split into two pay cycles:
//! the month the schedule starts, the four cutoff days and how many days
//! after a cycle ends the pay date falls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::YearMonth;
use crate::error::{EngineError, EngineResult};

use super::PayrollCycle;

/// Lowest allowed cutoff day.
pub const MIN_CUTOFF_DAY: u32 = 1;
/// Highest allowed cutoff day.
pub const MAX_CUTOFF_DAY: u32 = 31;

/// Whether a configuration (or cycle) is the live one or has been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Visible to all active reads.
    Active,
    /// Kept for audit, excluded from active reads. Never reactivated.
    Retired,
}

/// The user-supplied part of a payroll configuration.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollConfigInput;
///
/// let input: PayrollConfigInput = serde_json::from_str(r#"{
///     "start_year_month": "2025-03",
///     "first_start_day": 1,
///     "first_end_day": 15,
///     "second_start_day": 16,
///     "second_end_day": 31,
///     "pay_date_offset": 5
/// }"#).unwrap();
/// assert!(input.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfigInput {
    /// The first month covered by the schedule.
    pub start_year_month: YearMonth,
    /// First cycle start day.
    pub first_start_day: u32,
    /// First cycle end day.
    pub first_end_day: u32,
    /// Second cycle start day.
    pub second_start_day: u32,
    /// Second cycle end day.
    pub second_end_day: u32,
    /// Days between a cycle's end date and its pay date.
    pub pay_date_offset: u32,
}

impl PayrollConfigInput {
    /// Checks the day ranges.
    ///
    /// Every cutoff day must be within 1-31 and the cycles must satisfy
    /// `first_start_day <= first_end_day < second_start_day <= second_end_day`.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("first_start_day", self.first_start_day),
            ("first_end_day", self.first_end_day),
            ("second_start_day", self.second_start_day),
            ("second_end_day", self.second_end_day),
        ] {
            if !(MIN_CUTOFF_DAY..=MAX_CUTOFF_DAY).contains(&value) {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "{field} must be between {MIN_CUTOFF_DAY} and {MAX_CUTOFF_DAY}, got {value}"
                    ),
                });
            }
        }

        if self.first_start_day > self.first_end_day
            || self.second_start_day > self.second_end_day
            || self.first_end_day >= self.second_start_day
        {
            return Err(EngineError::InvalidConfiguration {
                message: "invalid payroll cycle day range: ensure first_start_day <= first_end_day < second_start_day <= second_end_day".to_string(),
            });
        }

        Ok(())
    }
}

/// A stored payroll configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Unique identifier.
    pub id: Uuid,
    /// The first month covered by the schedule.
    pub start_year_month: YearMonth,
    /// First cycle start day.
    pub first_start_day: u32,
    /// First cycle end day.
    pub first_end_day: u32,
    /// Second cycle start day.
    pub second_start_day: u32,
    /// Second cycle end day.
    pub second_end_day: u32,
    /// Days between a cycle's end date and its pay date.
    pub pay_date_offset: u32,
    /// Active or retired.
    pub status: RecordStatus,
    /// When the configuration was installed.
    pub created_at: DateTime<Utc>,
    /// When the configuration was replaced, if it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retired_at: Option<DateTime<Utc>>,
}

impl PayrollConfig {
    /// Creates a new active configuration from validated input.
    pub fn new(input: PayrollConfigInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_year_month: input.start_year_month,
            first_start_day: input.first_start_day,
            first_end_day: input.first_end_day,
            second_start_day: input.second_start_day,
            second_end_day: input.second_end_day,
            pay_date_offset: input.pay_date_offset,
            status: RecordStatus::Active,
            created_at,
            retired_at: None,
        }
    }

    /// Returns the user-supplied fields of this configuration.
    pub fn input(&self) -> PayrollConfigInput {
        PayrollConfigInput {
            start_year_month: self.start_year_month,
            first_start_day: self.first_start_day,
            first_end_day: self.first_end_day,
            second_start_day: self.second_start_day,
            second_end_day: self.second_end_day,
            pay_date_offset: self.pay_date_offset,
        }
    }

    /// Returns true if this configuration has not been retired.
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

/// A configuration together with the cycles generated from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSchedule {
    /// The configuration.
    #[serde(flatten)]
    pub config: PayrollConfig,
    /// Its cycles in chronological order.
    pub cycles: Vec<PayrollCycle>,
}
