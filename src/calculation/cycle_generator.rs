//! Payroll cycle generation.
//!
//! Turns a payroll configuration into a year of half-month pay cycles: two
//! cycles per month for twelve consecutive months, starting at the
//! configuration's `start_year_month`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{YearMonth, add_days};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollConfig, PayrollConfigInput, PayrollCycle};

/// Number of months a configuration covers.
pub const MONTHS_PER_SCHEDULE: u32 = 12;

/// Number of cycles generated for every month.
pub const CYCLES_PER_MONTH: usize = 2;

/// Number of cycles generated for a configuration.
pub const CYCLES_PER_SCHEDULE: usize = MONTHS_PER_SCHEDULE as usize * CYCLES_PER_MONTH;

/// The dates of one generated cycle, before it is bound to a stored configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDates {
    /// First day of the cycle.
    pub start_date: NaiveDate,
    /// Last day of the cycle.
    pub end_date: NaiveDate,
    /// Day the cycle is paid.
    pub pay_date: NaiveDate,
}

/// Computes the dates of every cycle described by `input`.
///
/// For each of the twelve months:
/// 1. Both cutoff days of each cycle are clamped to the month's last day.
/// 2. The end is never earlier than the start. Validated input already
///    guarantees this and clamping keeps the order, so the guard that moves
///    the end up to the start does not fire for accepted configurations.
/// 3. The pay date is the end date plus `pay_date_offset` days.
///
/// The first cycle of a month is emitted before the second, months in
/// ascending order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] when the day ranges are out
/// of order or a date falls outside the supported calendar.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::generate_cycle_dates;
/// use payroll_engine::models::PayrollConfigInput;
/// use chrono::NaiveDate;
///
/// let input = PayrollConfigInput {
///     start_year_month: "2025-03".parse().unwrap(),
///     first_start_day: 1,
///     first_end_day: 15,
///     second_start_day: 16,
///     second_end_day: 31,
///     pay_date_offset: 5,
/// };
/// let cycles = generate_cycle_dates(&input).unwrap();
///
/// assert_eq!(cycles.len(), 24);
/// assert_eq!(cycles[1].end_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
/// assert_eq!(cycles[1].pay_date, NaiveDate::from_ymd_opt(2025, 4, 5).unwrap());
/// ```
pub fn generate_cycle_dates(input: &PayrollConfigInput) -> EngineResult<Vec<CycleDates>> {
    input.validate()?;

    let mut cycles = Vec::with_capacity(CYCLES_PER_SCHEDULE);

    for offset in 0..MONTHS_PER_SCHEDULE {
        let month = input
            .start_year_month
            .add_months(offset)
            .ok_or_else(|| out_of_range(input.start_year_month))?;

        for (start_day, end_day) in [
            (input.first_start_day, input.first_end_day),
            (input.second_start_day, input.second_end_day),
        ] {
            cycles.push(cycle_in_month(month, start_day, end_day, input.pay_date_offset)?);
        }
    }

    Ok(cycles)
}

/// Generates the cycles of a stored configuration, linked to its id.
pub fn generate_cycles(config: &PayrollConfig) -> EngineResult<Vec<PayrollCycle>> {
    let cycles = generate_cycle_dates(&config.input())?
        .into_iter()
        .map(|dates| {
            PayrollCycle::new(config.id, dates.start_date, dates.end_date, dates.pay_date)
        })
        .collect();
    Ok(cycles)
}

fn cycle_in_month(
    month: YearMonth,
    start_day: u32,
    end_day: u32,
    pay_date_offset: u32,
) -> EngineResult<CycleDates> {
    let start_date = month.day_clamped(start_day);
    let mut end_date = month.day_clamped(end_day);
    // Clamping is monotonic; this only matters for unvalidated input.
    if start_date > end_date {
        end_date = start_date;
    }

    let pay_date = add_days(end_date, pay_date_offset).ok_or_else(|| {
        EngineError::InvalidConfiguration {
            message: format!("pay_date_offset {pay_date_offset} moves the pay date past the supported calendar"),
        }
    })?;

    Ok(CycleDates {
        start_date,
        end_date,
        pay_date,
    })
}

fn out_of_range(start: YearMonth) -> EngineError {
    EngineError::InvalidConfiguration {
        message: format!("start_year_month {start} leaves the supported calendar"),
    }
}
