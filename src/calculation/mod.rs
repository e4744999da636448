//! Pure calculation logic for the payroll engine.
//!
//! This module contains the functions that need no storage: generating the
//! cycles of a payroll configuration, finding where a salary's current pay
//! period ends, and aggregating payroll item amounts into totals.

mod cycle_generator;
mod period_close;
mod totals;

pub use cycle_generator::{
    CYCLES_PER_MONTH, CYCLES_PER_SCHEDULE, CycleDates, MONTHS_PER_SCHEDULE, generate_cycle_dates,
    generate_cycles,
};
pub use period_close::{
    BI_WEEKLY_PERIOD_DAYS, PeriodWindow, WEEKLY_PERIOD_DAYS, current_period, current_period_end,
    is_period_closed, period_end_for,
};
pub use totals::{
    PayrollPreview, SeededItem, aggregate_totals, preview_payroll, round_amount, seeded_items,
};
