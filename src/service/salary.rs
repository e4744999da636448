//! Salary assignment and payroll preview.

use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{PayrollPreview, preview_payroll};
use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Salary, SalaryInput};
use crate::store::PayrollStore;

/// Gives `employee_id` a new active salary.
///
/// An existing active salary is closed on the new salary's start date and
/// deactivated, so the two never overlap and leave no gap. A salary that
/// already ends earlier keeps its end date.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSalary`] for a negative amount, an amount
/// finer than `scale` fractional digits, an end date not after the start
/// date, or a start date earlier than the start of the salary being
/// superseded.
pub fn assign_salary<S>(
    store: &mut S,
    employee_id: Uuid,
    input: SalaryInput,
    scale: u32,
) -> EngineResult<Salary>
where
    S: PayrollStore + ?Sized,
{
    input.validate(scale)?;

    if let Some(mut current) = store.find_active_salary(employee_id)? {
        if input.start_date < current.start_date {
            return Err(EngineError::InvalidSalary {
                field: "start_date".to_string(),
                message: format!(
                    "must not be before the current salary's start date {}",
                    current.start_date
                ),
            });
        }
        let end_date = current
            .end_date
            .map_or(input.start_date, |end| end.min(input.start_date));
        current.end_date = Some(end_date);
        current.is_active = false;
        info!(
            salary_id = %current.id,
            employee_id = %employee_id,
            end_date = %end_date,
            "Superseded salary"
        );
        store.save_salary(current)?;
    }

    let salary = Salary::new(employee_id, input);
    store.save_salary(salary.clone())?;
    info!(salary_id = %salary.id, employee_id = %employee_id, "Assigned salary");
    Ok(salary)
}

/// Deactivates a salary so later generation passes skip it.
///
/// The end date is left as it is. Deactivating an inactive salary changes
/// nothing.
pub fn deactivate_salary<S>(store: &mut S, salary_id: Uuid) -> EngineResult<Salary>
where
    S: PayrollStore + ?Sized,
{
    let mut salary = store.find_salary(salary_id)?.ok_or_else(|| EngineError::NotFound {
        entity: "salary",
        id: salary_id.to_string(),
    })?;
    if !salary.is_active {
        debug!(salary_id = %salary_id, "Salary already inactive");
        return Ok(salary);
    }

    salary.is_active = false;
    store.save_salary(salary.clone())?;
    info!(salary_id = %salary_id, employee_id = %salary.employee_id, "Deactivated salary");
    Ok(salary)
}

/// Previews the payroll amounts for the employee's active salary.
pub fn preview_for_employee<S>(
    store: &S,
    employee_id: Uuid,
    policy: &PayrollPolicy,
) -> EngineResult<PayrollPreview>
where
    S: PayrollStore + ?Sized,
{
    let salary = store
        .find_active_salary(employee_id)?
        .ok_or_else(|| EngineError::NotFound {
            entity: "active salary for employee",
            id: employee_id.to_string(),
        })?;
    Ok(preview_payroll(&salary, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTables;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(amount: &str, start: NaiveDate) -> SalaryInput {
        SalaryInput {
            basic_salary: dec(amount),
            pay_period: "monthly".to_string(),
            start_date: start,
            end_date: None,
        }
    }

    #[test]
    fn test_first_salary_is_active() {
        let mut tables = MemoryTables::default();
        let employee_id = Uuid::new_v4();
        let salary = assign_salary(&mut tables, employee_id, input("5000", date(2025, 1, 1)), 2).unwrap();

        assert!(salary.is_active);
        assert_eq!(tables.find_active_salary(employee_id).unwrap(), Some(salary));
    }

    #[test]
    fn test_supersede_closes_previous_on_boundary() {
        let mut tables = MemoryTables::default();
        let employee_id = Uuid::new_v4();
        let old = assign_salary(&mut tables, employee_id, input("5000", date(2025, 1, 1)), 2).unwrap();
        let new = assign_salary(&mut tables, employee_id, input("6000", date(2025, 4, 1)), 2).unwrap();

        let active = tables.find_active_salary(employee_id).unwrap().unwrap();
        assert_eq!(active.id, new.id);

        let effective = tables.find_due_salaries(date(2025, 4, 1)).unwrap();
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].id, new.id);

        let closed = tables
            .find_due_salaries(date(2025, 3, 31))
            .unwrap()
            .into_iter()
            .find(|s| s.id == old.id);
        assert!(closed.is_none());

        let stored_old = tables.find_salary(old.id).unwrap().unwrap();
        assert_eq!(stored_old.end_date, Some(date(2025, 4, 1)));
        assert!(!stored_old.is_active);
    }

    #[test]
    fn test_supersede_with_earlier_start_rejected() {
        let mut tables = MemoryTables::default();
        let employee_id = Uuid::new_v4();
        assign_salary(&mut tables, employee_id, input("5000", date(2025, 3, 1)), 2).unwrap();

        let result = assign_salary(&mut tables, employee_id, input("6000", date(2025, 2, 1)), 2);
        match result {
            Err(EngineError::InvalidSalary { field, .. }) => assert_eq!(field, "start_date"),
            other => panic!("Expected InvalidSalary, got {:?}", other),
        }
    }

    #[test]
    fn test_supersede_keeps_earlier_end_date() {
        let mut tables = MemoryTables::default();
        let employee_id = Uuid::new_v4();
        let mut ending = input("5000", date(2025, 1, 1));
        ending.end_date = Some(date(2025, 2, 1));
        let old = assign_salary(&mut tables, employee_id, ending, 2).unwrap();

        assign_salary(&mut tables, employee_id, input("6000", date(2025, 6, 1)), 2).unwrap();

        let stored_old = tables.find_salary(old.id).unwrap().unwrap();
        assert_eq!(stored_old.end_date, Some(date(2025, 2, 1)));
        assert!(!stored_old.is_active);
    }

    #[test]
    fn test_salary_with_too_many_decimals_rejected() {
        let mut tables = MemoryTables::default();
        let employee_id = Uuid::new_v4();
        let result = assign_salary(&mut tables, employee_id, input("5000.005", date(2025, 1, 1)), 2);

        match result {
            Err(EngineError::InvalidSalary { field, .. }) => assert_eq!(field, "basic_salary"),
            other => panic!("Expected InvalidSalary, got {:?}", other),
        }
        assert!(tables.find_active_salary(employee_id).unwrap().is_none());
    }

    #[test]
    fn test_deactivate_salary() {
        let mut tables = MemoryTables::default();
        let employee_id = Uuid::new_v4();
        let salary = assign_salary(&mut tables, employee_id, input("5000", date(2025, 1, 1)), 2).unwrap();

        let deactivated = deactivate_salary(&mut tables, salary.id).unwrap();

        assert!(!deactivated.is_active);
        assert_eq!(deactivated.end_date, None);
        assert!(tables.find_active_salary(employee_id).unwrap().is_none());
        assert!(tables.find_due_salaries(date(2025, 3, 31)).unwrap().is_empty());
        assert!(!deactivate_salary(&mut tables, salary.id).unwrap().is_active);
    }

    #[test]
    fn test_deactivate_unknown_salary() {
        let mut tables = MemoryTables::default();
        let result = deactivate_salary(&mut tables, Uuid::new_v4());
        assert!(matches!(result, Err(EngineError::NotFound { entity: "salary", .. })));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let mut tables = MemoryTables::default();
        let result = assign_salary(&mut tables, Uuid::new_v4(), input("-1", date(2025, 1, 1)), 2);
        assert!(matches!(result, Err(EngineError::InvalidSalary { .. })));
    }

    #[test]
    fn test_preview_reference_salary() {
        let mut tables = MemoryTables::default();
        let employee_id = Uuid::new_v4();
        assign_salary(&mut tables, employee_id, input("20000.00", date(2025, 1, 1)), 2).unwrap();

        let preview = preview_for_employee(&tables, employee_id, &PayrollPolicy::default()).unwrap();
        assert_eq!(preview.net_salary, dec("18000.00"));
    }

    #[test]
    fn test_preview_without_salary() {
        let tables = MemoryTables::default();
        let result = preview_for_employee(&tables, Uuid::new_v4(), &PayrollPolicy::default());
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }
}
