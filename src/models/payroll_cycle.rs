//! Payroll cycle model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RecordStatus;

/// A half-month pay period generated from a [`PayrollConfig`](super::PayrollConfig).
///
/// Cycles are never edited directly; they are replaced wholesale when the
/// configuration is replaced.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollCycle;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let cycle = PayrollCycle::new(
///     Uuid::new_v4(),
///     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
/// );
/// assert!(cycle.contains_date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
/// assert!(!cycle.contains_date(NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCycle {
    /// Unique identifier.
    pub id: Uuid,
    /// The configuration this cycle was generated from.
    pub payroll_config_id: Uuid,
    /// First day of the cycle (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the cycle (inclusive).
    pub end_date: NaiveDate,
    /// The day employees are paid for this cycle.
    pub pay_date: NaiveDate,
    /// Active or retired, follows the owning configuration.
    pub status: RecordStatus,
}

impl PayrollCycle {
    /// Creates an active cycle for a configuration.
    pub fn new(
        payroll_config_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        pay_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            payroll_config_id,
            start_date,
            end_date,
            pay_date,
            status: RecordStatus::Active,
        }
    }

    /// Checks if a date falls within the cycle, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of days covered by the cycle.
    pub fn length_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
