//! Transactional payroll operations.
//!
//! Each function here is one unit of work over a [`PayrollStore`]. Callers
//! run it inside [`Database::transaction`] (or [`Database::read`] for the
//! lookups), which makes it all-or-nothing and serializes it against every
//! other unit of work.
//!
//! [`PayrollStore`]: crate::store::PayrollStore
//! [`Database::transaction`]: crate::store::Database::transaction
//! [`Database::read`]: crate::store::Database::read

mod config_replacement;
mod cycle_processing;
mod generation;
mod items;
mod payroll_run;
mod salary;
mod status;

pub use config_replacement::{active_schedule, replace_config, retire_active_config};
pub use cycle_processing::{CycleProcessingReport, process_cycle};
pub use generation::{GenerationSummary, SkippedSalary, generate_due_payrolls};
pub use items::create_item;
pub use payroll_run::{
    DueCheck, RunOutcome, claim_available_items, evaluate_salary, payroll_detail,
    run_for_due_salary,
};
pub use salary::{assign_salary, deactivate_salary, preview_for_employee};
pub use status::update_payroll_status;
