//! Generation pass over all active salaries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::Salary;
use crate::store::{Database, PayrollStore};

use super::payroll_run::{DueCheck, evaluate_salary, run_for_due_salary};

/// A salary the pass could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSalary {
    /// The salary that was skipped.
    pub salary_id: Uuid,
    /// Why it was skipped.
    pub reason: String,
}

/// Counts produced by one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Salaries looked at.
    pub evaluated: usize,
    /// Payrolls created by this pass.
    pub generated: usize,
    /// Ids of the payrolls created by this pass.
    pub payroll_ids: Vec<Uuid>,
    /// Salaries whose current period already had a payroll.
    pub already_present: usize,
    /// Salaries whose current period has not ended.
    pub not_due: usize,
    /// Salaries that failed evaluation.
    pub skipped: Vec<SkippedSalary>,
}

enum SalaryOutcome {
    Generated(Uuid),
    AlreadyPresent,
    NotDue,
}

/// Evaluates every active salary and builds the payrolls that are due.
///
/// The clock is read once; every salary is evaluated against that instant.
/// Each salary runs in its own transaction and is read again inside it, so
/// a salary superseded or deactivated after the pass started counts as not
/// due. A salary that fails (for example with an unsupported pay period) is
/// rolled back, logged and listed in [`GenerationSummary::skipped`] while
/// the rest proceed.
///
/// # Errors
///
/// Fails only if the initial salary lookup fails.
pub fn generate_due_payrolls(
    db: &Database,
    clock: &dyn Clock,
    policy: &PayrollPolicy,
) -> EngineResult<GenerationSummary> {
    let now = clock.now();
    let as_of = now.date_naive();
    let salaries = db.read(|tables| tables.find_due_salaries(as_of))?;

    let mut summary = GenerationSummary::default();
    for salary in &salaries {
        summary.evaluated += 1;

        let outcome = db.transaction(|tx| evaluate_one(tx, salary, as_of, policy, now));

        match outcome {
            Ok(SalaryOutcome::Generated(payroll_id)) => {
                summary.generated += 1;
                summary.payroll_ids.push(payroll_id);
            }
            Ok(SalaryOutcome::AlreadyPresent) => summary.already_present += 1,
            Ok(SalaryOutcome::NotDue) => summary.not_due += 1,
            Err(err) => {
                match &err {
                    EngineError::UnsupportedPayPeriod { value } => warn!(
                        salary_id = %salary.id,
                        employee_id = %salary.employee_id,
                        pay_period = %value,
                        "Skipping salary with unsupported pay period"
                    ),
                    other => warn!(
                        salary_id = %salary.id,
                        employee_id = %salary.employee_id,
                        error = %other,
                        retryable = other.is_retryable(),
                        "Payroll generation failed for salary"
                    ),
                }
                summary.skipped.push(SkippedSalary {
                    salary_id: salary.id,
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        as_of = %as_of,
        evaluated = summary.evaluated,
        generated = summary.generated,
        already_present = summary.already_present,
        not_due = summary.not_due,
        skipped = summary.skipped.len(),
        "Generation pass completed"
    );

    Ok(summary)
}

fn evaluate_one<S>(
    store: &mut S,
    listed: &Salary,
    as_of: NaiveDate,
    policy: &PayrollPolicy,
    now: DateTime<Utc>,
) -> EngineResult<SalaryOutcome>
where
    S: PayrollStore + ?Sized,
{
    let salary = match store.find_salary(listed.id)? {
        Some(salary) if salary.is_effective_on(as_of) => salary,
        _ => {
            debug!(salary_id = %listed.id, "Salary changed since the pass started");
            return Ok(SalaryOutcome::NotDue);
        }
    };

    match evaluate_salary(&*store, &salary, as_of)? {
        DueCheck::Due(window) => {
            let outcome = run_for_due_salary(store, &salary, window, policy, now)?;
            Ok(if outcome.created {
                SalaryOutcome::Generated(outcome.payroll.id)
            } else {
                SalaryOutcome::AlreadyPresent
            })
        }
        DueCheck::AlreadyGenerated(_) => Ok(SalaryOutcome::AlreadyPresent),
        DueCheck::NotDue { .. } => Ok(SalaryOutcome::NotDue),
    }
}
