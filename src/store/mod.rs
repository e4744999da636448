//! Persistence gateway for the payroll engine.
//!
//! [`PayrollStore`] is the seam between the engine and storage. Every
//! engine operation receives a store handle scoped to one transaction; the
//! [`Database`] decides when that transaction commits.

mod memory;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Payroll, PayrollConfig, PayrollCycle, PayrollItem, Salary};

pub use memory::{Database, MemoryTables};

/// Storage operations used by the engine.
///
/// All reads named `active` only ever see records whose status is active;
/// retired configurations and cycles are kept but never returned by them.
pub trait PayrollStore {
    /// The single active configuration, if one is installed.
    fn find_active_config(&self) -> EngineResult<Option<PayrollConfig>>;

    /// Any configuration by id, active or retired.
    fn find_config(&self, id: Uuid) -> EngineResult<Option<PayrollConfig>>;

    /// Inserts a configuration. An active configuration becomes the active
    /// reference; inserting a second active one fails.
    fn save_config(&mut self, config: PayrollConfig) -> EngineResult<()>;

    /// Retires a configuration and all of its cycles.
    fn retire_config(&mut self, id: Uuid, retired_at: DateTime<Utc>) -> EngineResult<()>;

    /// Inserts generated cycles. Each must belong to an existing configuration.
    fn save_cycles(&mut self, cycles: Vec<PayrollCycle>) -> EngineResult<()>;

    /// Cycles of the active configuration in chronological order.
    fn find_active_cycles(&self) -> EngineResult<Vec<PayrollCycle>>;

    /// Any cycle by id, active or retired.
    fn find_cycle(&self, id: Uuid) -> EngineResult<Option<PayrollCycle>>;

    /// Active salaries effective on `as_of`.
    fn find_due_salaries(&self, as_of: NaiveDate) -> EngineResult<Vec<Salary>>;

    /// The employee's active salary, if any.
    fn find_active_salary(&self, employee_id: Uuid) -> EngineResult<Option<Salary>>;

    /// Any salary by id, active or not.
    fn find_salary(&self, id: Uuid) -> EngineResult<Option<Salary>>;

    /// Inserts or replaces a salary.
    fn save_salary(&mut self, salary: Salary) -> EngineResult<()>;

    /// Inserts a payroll item.
    fn save_item(&mut self, item: PayrollItem) -> EngineResult<()>;

    /// Unclaimed items: specific items of `employee_id` when given,
    /// global items when `None`. Returned in creation order.
    fn find_unclaimed_items(&self, employee_id: Option<Uuid>) -> EngineResult<Vec<PayrollItem>>;

    /// Attaches items to a payroll. Items already claimed are left alone.
    ///
    /// Returns the number of items claimed.
    fn claim_items(&mut self, item_ids: &[Uuid], payroll_id: Uuid) -> EngineResult<usize>;

    /// Items attached to a payroll, in creation order.
    fn find_items_for_payroll(&self, payroll_id: Uuid) -> EngineResult<Vec<PayrollItem>>;

    /// Inserts a payroll.
    ///
    /// Fails with `DuplicatePeriod` if one already exists for the same
    /// employee, salary and pay date.
    fn save_payroll(&mut self, payroll: Payroll) -> EngineResult<()>;

    /// Replaces a stored payroll.
    fn update_payroll(&mut self, payroll: &Payroll) -> EngineResult<()>;

    /// A payroll by id.
    fn find_payroll(&self, id: Uuid) -> EngineResult<Option<Payroll>>;

    /// The payroll for an employee, salary and period end, if generated.
    fn find_payroll_by_period(
        &self,
        employee_id: Uuid,
        salary_id: Uuid,
        period_end: NaiveDate,
    ) -> EngineResult<Option<Payroll>>;

    /// Payrolls whose pay date falls within `[start, end]`.
    fn find_payrolls_paid_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Payroll>>;
}
