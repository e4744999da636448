//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod payroll;
mod payroll_config;
mod payroll_cycle;
mod payroll_item;
mod salary;

pub use payroll::{Payroll, PayrollDetail, PayrollStatus, PayrollTotals};
pub use payroll_config::{
    MAX_CUTOFF_DAY, MIN_CUTOFF_DAY, PayrollConfig, PayrollConfigInput, PayrollSchedule,
    RecordStatus,
};
pub use payroll_cycle::PayrollCycle;
pub use payroll_item::{ItemScope, ItemType, MAX_CATEGORY_LEN, NewPayrollItem, PayrollItem};
pub use salary::{PayPeriod, Salary, SalaryInput};
