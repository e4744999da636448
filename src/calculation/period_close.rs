//! Period-close evaluation.
//!
//! Decides, for a salary and an evaluation date, where the salary's current
//! pay period ends. A payroll run becomes due once that end date is reached.

use chrono::{Days, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_between, first_day_of_month, last_day_of_month};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, Salary};

/// Length of a weekly pay period in days.
pub const WEEKLY_PERIOD_DAYS: i64 = 7;

/// Length of a bi-weekly pay period in days.
pub const BI_WEEKLY_PERIOD_DAYS: i64 = 14;

/// The date range of a salary's current pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    /// First day covered by the run.
    pub start_date: NaiveDate,
    /// Last day covered by the run; also its pay date.
    pub end_date: NaiveDate,
}

/// Computes the period end for a pay period anchored at `start_date`.
///
/// - `monthly`: last calendar day of `as_of`'s month.
/// - `bi-weekly`: `start_date` plus whole 14-day periods elapsed by `as_of`.
/// - `weekly`: `start_date` plus whole 7-day periods elapsed by `as_of`.
/// - `daily`: `as_of` itself.
///
/// Elapsed periods are floored, so an `as_of` before `start_date` yields
/// a boundary before `start_date`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::period_end_for;
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
/// assert_eq!(
///     period_end_for(PayPeriod::Weekly, start, as_of).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
/// );
/// ```
pub fn period_end_for(
    pay_period: PayPeriod,
    start_date: NaiveDate,
    as_of: NaiveDate,
) -> EngineResult<NaiveDate> {
    match pay_period {
        PayPeriod::Monthly => Ok(last_day_of_month(as_of)),
        PayPeriod::BiWeekly => anchored_boundary(start_date, as_of, BI_WEEKLY_PERIOD_DAYS),
        PayPeriod::Weekly => anchored_boundary(start_date, as_of, WEEKLY_PERIOD_DAYS),
        PayPeriod::Daily => Ok(as_of),
    }
}

/// The current pay period end for `salary` as of `as_of`.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedPayPeriod`] if the salary's pay
/// period is not one of `daily`, `weekly`, `bi-weekly` or `monthly`.
pub fn current_period_end(salary: &Salary, as_of: NaiveDate) -> EngineResult<NaiveDate> {
    period_end_for(salary.pay_period()?, salary.start_date, as_of)
}

/// The full window of the salary's current pay period.
///
/// The window ends at [`current_period_end`] and starts one period earlier,
/// never before the salary's own start date.
pub fn current_period(salary: &Salary, as_of: NaiveDate) -> EngineResult<PeriodWindow> {
    let pay_period = salary.pay_period()?;
    let end_date = period_end_for(pay_period, salary.start_date, as_of)?;

    let natural_start = match pay_period {
        PayPeriod::Monthly => first_day_of_month(end_date),
        PayPeriod::BiWeekly => end_date - Days::new(BI_WEEKLY_PERIOD_DAYS as u64 - 1),
        PayPeriod::Weekly => end_date - Days::new(WEEKLY_PERIOD_DAYS as u64 - 1),
        PayPeriod::Daily => end_date,
    };

    Ok(PeriodWindow {
        start_date: natural_start.max(salary.start_date).min(end_date),
        end_date,
    })
}

/// Returns true if the salary's current period has ended by `as_of`.
///
/// A salary that is inactive or not yet effective never closes a period.
pub fn is_period_closed(salary: &Salary, as_of: NaiveDate) -> EngineResult<bool> {
    if !salary.is_effective_on(as_of) {
        return Ok(false);
    }
    Ok(as_of >= current_period_end(salary, as_of)?)
}

fn anchored_boundary(start_date: NaiveDate, as_of: NaiveDate, period_days: i64) -> EngineResult<NaiveDate> {
    let elapsed_periods = days_between(start_date, as_of).div_euclid(period_days);
    start_date
        .checked_add_signed(TimeDelta::days(elapsed_periods * period_days))
        .ok_or_else(|| EngineError::InvalidSalary {
            field: "start_date".to_string(),
            message: format!("period boundary from {start_date} leaves the supported calendar"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SalaryInput;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn salary(pay_period: &str, start_date: NaiveDate) -> Salary {
        Salary::new(
            Uuid::new_v4(),
            SalaryInput {
                basic_salary: Decimal::new(2000000, 2),
                pay_period: pay_period.to_string(),
                start_date,
                end_date: None,
            },
        )
    }

    #[test]
    fn test_weekly_two_full_weeks_elapsed() {
        let salary = salary("weekly", date(2025, 1, 1));
        assert_eq!(
            current_period_end(&salary, date(2025, 1, 20)).unwrap(),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn test_weekly_on_boundary_day() {
        let salary = salary("weekly", date(2025, 1, 1));
        assert_eq!(
            current_period_end(&salary, date(2025, 1, 8)).unwrap(),
            date(2025, 1, 8)
        );
    }

    #[test]
    fn test_bi_weekly_uses_fourteen_day_periods() {
        let salary = salary("bi-weekly", date(2025, 1, 1));
        assert_eq!(
            current_period_end(&salary, date(2025, 1, 20)).unwrap(),
            date(2025, 1, 15)
        );
        assert_eq!(
            current_period_end(&salary, date(2025, 1, 28)).unwrap(),
            date(2025, 1, 15)
        );
        assert_eq!(
            current_period_end(&salary, date(2025, 1, 29)).unwrap(),
            date(2025, 1, 29)
        );
    }

    #[test]
    fn test_monthly_is_last_day_of_month() {
        let salary = salary("monthly", date(2025, 1, 10));
        assert_eq!(
            current_period_end(&salary, date(2025, 2, 3)).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_daily_is_as_of() {
        let salary = salary("daily", date(2025, 1, 1));
        assert_eq!(
            current_period_end(&salary, date(2025, 6, 7)).unwrap(),
            date(2025, 6, 7)
        );
    }

    #[test]
    fn test_unsupported_pay_period() {
        let salary = salary("semi-monthly", date(2025, 1, 1));
        match current_period_end(&salary, date(2025, 1, 20)) {
            Err(EngineError::UnsupportedPayPeriod { value }) => assert_eq!(value, "semi-monthly"),
            other => panic!("Expected UnsupportedPayPeriod, got {:?}", other),
        }
    }

    #[test]
    fn test_as_of_before_start_floors_backwards() {
        assert_eq!(
            period_end_for(PayPeriod::Weekly, date(2025, 1, 15), date(2025, 1, 14)).unwrap(),
            date(2025, 1, 8)
        );
    }

    #[test]
    fn test_monthly_window_covers_calendar_month() {
        let salary = salary("monthly", date(2024, 11, 1));
        let window = current_period(&salary, date(2025, 3, 31)).unwrap();
        assert_eq!(window.start_date, date(2025, 3, 1));
        assert_eq!(window.end_date, date(2025, 3, 31));
    }

    #[test]
    fn test_monthly_window_starts_at_salary_start() {
        let salary = salary("monthly", date(2025, 3, 10));
        let window = current_period(&salary, date(2025, 3, 31)).unwrap();
        assert_eq!(window.start_date, date(2025, 3, 10));
    }

    #[test]
    fn test_weekly_window_is_seven_days() {
        let salary = salary("weekly", date(2025, 1, 1));
        let window = current_period(&salary, date(2025, 1, 20)).unwrap();
        assert_eq!(window.start_date, date(2025, 1, 9));
        assert_eq!(window.end_date, date(2025, 1, 15));
    }

    #[test]
    fn test_monthly_closes_only_on_last_day() {
        let salary = salary("monthly", date(2025, 1, 1));
        assert!(!is_period_closed(&salary, date(2025, 3, 30)).unwrap());
        assert!(is_period_closed(&salary, date(2025, 3, 31)).unwrap());
    }

    #[test]
    fn test_not_closed_before_salary_starts() {
        let salary = salary("daily", date(2025, 5, 1));
        assert!(!is_period_closed(&salary, date(2025, 4, 30)).unwrap());
    }

    #[test]
    fn test_not_closed_after_salary_ended() {
        let mut salary = salary("daily", date(2025, 1, 1));
        salary.end_date = Some(date(2025, 2, 1));
        assert!(!is_period_closed(&salary, date(2025, 2, 1)).unwrap());
        assert!(is_period_closed(&salary, date(2025, 1, 31)).unwrap());
    }
}
