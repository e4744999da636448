//! Payroll run builder.
//!
//! Decides whether a salary's current period needs a payroll and, when it
//! does, creates the payroll, seeds its basic salary and tax items, claims
//! the unclaimed items available to the employee and stores the totals.
//! The whole run must execute inside one store transaction.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{
    PeriodWindow, aggregate_totals, current_period, current_period_end, seeded_items,
};
use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Payroll, PayrollDetail, PayrollItem, Salary};
use crate::store::PayrollStore;

/// Result of checking one salary against an evaluation date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueCheck {
    /// The period has ended and has no payroll yet.
    Due(PeriodWindow),
    /// A payroll for this period already exists.
    AlreadyGenerated(Payroll),
    /// The period has not ended, or the salary is not effective.
    NotDue {
        /// The end of the salary's current period, when it has one.
        period_end: Option<NaiveDate>,
    },
}

/// Outcome of [`run_for_due_salary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// The payroll for the period.
    pub payroll: Payroll,
    /// False when the payroll already existed and was returned unchanged.
    pub created: bool,
}

/// Checks whether `salary` needs a payroll as of `as_of`.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedPayPeriod`] for a salary whose pay
/// period cannot be evaluated.
pub fn evaluate_salary<S>(store: &S, salary: &Salary, as_of: NaiveDate) -> EngineResult<DueCheck>
where
    S: PayrollStore + ?Sized,
{
    if !salary.is_effective_on(as_of) {
        return Ok(DueCheck::NotDue { period_end: None });
    }

    let period_end = current_period_end(salary, as_of)?;
    if as_of < period_end {
        return Ok(DueCheck::NotDue {
            period_end: Some(period_end),
        });
    }

    if let Some(existing) = store.find_payroll_by_period(salary.employee_id, salary.id, period_end)? {
        return Ok(DueCheck::AlreadyGenerated(existing));
    }

    Ok(DueCheck::Due(current_period(salary, as_of)?))
}

/// Builds the payroll for `salary` covering `window`.
///
/// Idempotent: if a payroll already exists for the employee, salary and
/// period end, it is returned unchanged with `created == false`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSalary`] when the stored salary is missing
/// or no longer active, e.g. because it was superseded after `salary` was
/// read.
pub fn run_for_due_salary<S>(
    store: &mut S,
    salary: &Salary,
    window: PeriodWindow,
    policy: &PayrollPolicy,
    now: DateTime<Utc>,
) -> EngineResult<RunOutcome>
where
    S: PayrollStore + ?Sized,
{
    if let Some(existing) =
        store.find_payroll_by_period(salary.employee_id, salary.id, window.end_date)?
    {
        debug!(payroll_id = %existing.id, "Payroll already generated for period");
        return Ok(RunOutcome {
            payroll: existing,
            created: false,
        });
    }

    match store.find_salary(salary.id)? {
        Some(stored) if stored.is_active => {}
        _ => {
            return Err(EngineError::InvalidSalary {
                field: "salary_id".to_string(),
                message: format!("salary {} is no longer active", salary.id),
            });
        }
    }

    let mut payroll = Payroll::pending(
        salary.employee_id,
        salary.id,
        window.start_date,
        window.end_date,
        now,
    );
    match store.save_payroll(payroll.clone()) {
        Ok(()) => {}
        Err(EngineError::DuplicatePeriod { .. }) => {
            let existing = store
                .find_payroll_by_period(salary.employee_id, salary.id, window.end_date)?
                .ok_or_else(|| EngineError::PersistenceFailure {
                    message: format!(
                        "payroll for employee {} ending {} reported duplicate but not found",
                        salary.employee_id, window.end_date
                    ),
                })?;
            return Ok(RunOutcome {
                payroll: existing,
                created: false,
            });
        }
        Err(err) => return Err(err),
    }

    for seeded in seeded_items(salary.basic_salary, policy) {
        store.save_item(PayrollItem::seeded(
            payroll.id,
            salary.employee_id,
            seeded.item_type,
            seeded.category,
            seeded.amount,
        ))?;
    }

    let claimed = claim_available_items(store, &mut payroll, policy.amount_scale)?;

    info!(
        payroll_id = %payroll.id,
        employee_id = %payroll.employee_id,
        pay_date = %payroll.pay_date,
        claimed_items = claimed,
        net_salary = %payroll.net_salary,
        "Generated payroll"
    );

    Ok(RunOutcome {
        payroll,
        created: true,
    })
}

/// Claims every unclaimed item the payroll's employee may take, then
/// recomputes and stores the payroll totals.
///
/// Employee-specific items come first, then global items. Each item is
/// claimed by at most one payroll. Returns the number of items claimed.
pub fn claim_available_items<S>(
    store: &mut S,
    payroll: &mut Payroll,
    scale: u32,
) -> EngineResult<usize>
where
    S: PayrollStore + ?Sized,
{
    let mut candidates: Vec<Uuid> = store
        .find_unclaimed_items(Some(payroll.employee_id))?
        .into_iter()
        .map(|i| i.id)
        .collect();
    candidates.extend(store.find_unclaimed_items(None)?.into_iter().map(|i| i.id));

    let claimed = if candidates.is_empty() {
        0
    } else {
        store.claim_items(&candidates, payroll.id)?
    };

    let items = store.find_items_for_payroll(payroll.id)?;
    payroll.apply_totals(aggregate_totals(&items, scale));
    store.update_payroll(payroll)?;

    debug!(payroll_id = %payroll.id, claimed, items = items.len(), "Recomputed payroll totals");
    Ok(claimed)
}

/// A payroll with its attached items.
pub fn payroll_detail<S>(store: &S, payroll_id: Uuid) -> EngineResult<PayrollDetail>
where
    S: PayrollStore + ?Sized,
{
    let payroll = store.find_payroll(payroll_id)?.ok_or_else(|| EngineError::NotFound {
        entity: "payroll",
        id: payroll_id.to_string(),
    })?;
    let items = store.find_items_for_payroll(payroll_id)?;
    Ok(PayrollDetail { payroll, items })
}
