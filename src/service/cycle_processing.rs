//! Cycle processing.
//!
//! Processing a cycle finalises the pending payrolls paid within it: each
//! one claims the items that became available since it was generated, has
//! its totals recomputed and moves to `processed`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Payroll, PayrollCycle, PayrollStatus, RecordStatus};
use crate::store::PayrollStore;

use super::payroll_run::claim_available_items;

/// What processing a cycle changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProcessingReport {
    /// The processed cycle.
    pub cycle: PayrollCycle,
    /// Payrolls moved from pending to processed.
    pub processed: Vec<Payroll>,
    /// Payrolls in the cycle that were already processed or paid.
    pub unchanged: usize,
}

/// Processes the payrolls whose pay date falls in the cycle.
///
/// # Errors
///
/// - [`EngineError::NotFound`] if the cycle does not exist.
/// - [`EngineError::InvalidConfiguration`] if the cycle belongs to a
///   retired configuration.
pub fn process_cycle<S>(store: &mut S, cycle_id: Uuid, scale: u32) -> EngineResult<CycleProcessingReport>
where
    S: PayrollStore + ?Sized,
{
    let cycle = store.find_cycle(cycle_id)?.ok_or_else(|| EngineError::NotFound {
        entity: "payroll cycle",
        id: cycle_id.to_string(),
    })?;

    let active_config_id = store.find_active_config()?.map(|c| c.id);
    if cycle.status != RecordStatus::Active || active_config_id != Some(cycle.payroll_config_id) {
        return Err(EngineError::InvalidConfiguration {
            message: format!(
                "payroll cycle {} does not belong to the active payroll config",
                cycle.id
            ),
        });
    }

    let payrolls = store.find_payrolls_paid_between(cycle.start_date, cycle.end_date)?;
    let mut processed = Vec::new();
    let mut unchanged = 0;

    for mut payroll in payrolls {
        if payroll.status != PayrollStatus::Pending {
            unchanged += 1;
            continue;
        }
        let claimed = claim_available_items(store, &mut payroll, scale)?;
        payroll.transition_to(PayrollStatus::Processed)?;
        store.update_payroll(&payroll)?;
        debug!(payroll_id = %payroll.id, claimed, "Processed payroll");
        processed.push(payroll);
    }

    info!(
        cycle_id = %cycle.id,
        start_date = %cycle.start_date,
        end_date = %cycle.end_date,
        processed = processed.len(),
        unchanged,
        "Processed payroll cycle"
    );

    Ok(CycleProcessingReport {
        cycle,
        processed,
        unchanged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::PeriodWindow;
    use crate::config::PayrollPolicy;
    use crate::models::{ItemScope, ItemType, NewPayrollItem, PayrollConfigInput, PayrollItem, Salary, SalaryInput};
    use crate::service::{replace_config, run_for_due_salary};
    use crate::store::MemoryTables;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config_input() -> PayrollConfigInput {
        PayrollConfigInput {
            start_year_month: "2025-03".parse().unwrap(),
            first_start_day: 1,
            first_end_day: 15,
            second_start_day: 16,
            second_end_day: 31,
            pay_date_offset: 5,
        }
    }

    fn march_payroll(tables: &mut MemoryTables) -> Payroll {
        let salary = Salary::new(
            Uuid::new_v4(),
            SalaryInput {
                basic_salary: dec("20000.00"),
                pay_period: "monthly".to_string(),
                start_date: date(2025, 1, 1),
                end_date: None,
            },
        );
        tables.save_salary(salary.clone()).unwrap();
        let window = PeriodWindow {
            start_date: date(2025, 3, 1),
            end_date: date(2025, 3, 31),
        };
        run_for_due_salary(tables, &salary, window, &PayrollPolicy::default(), Utc::now())
            .unwrap()
            .payroll
    }

    #[test]
    fn test_process_claims_late_items_and_marks_processed() {
        let mut tables = MemoryTables::default();
        let schedule = replace_config(&mut tables, config_input(), Utc::now()).unwrap();
        let payroll = march_payroll(&mut tables);

        tables
            .save_item(PayrollItem::new(NewPayrollItem {
                employee_id: Some(payroll.employee_id),
                scope: ItemScope::Specific,
                item_type: ItemType::Earning,
                category: "Commission".to_string(),
                amount: dec("1000.00"),
            }))
            .unwrap();

        // Second March cycle: 03-16..03-31.
        let report = process_cycle(&mut tables, schedule.cycles[1].id, 2).unwrap();

        assert_eq!(report.processed.len(), 1);
        assert_eq!(report.unchanged, 0);
        let processed = &report.processed[0];
        assert_eq!(processed.status, PayrollStatus::Processed);
        assert_eq!(processed.total_earnings, dec("21000.00"));
        assert_eq!(processed.net_salary, dec("19000.00"));
    }

    #[test]
    fn test_processing_twice_leaves_payroll_unchanged() {
        let mut tables = MemoryTables::default();
        let schedule = replace_config(&mut tables, config_input(), Utc::now()).unwrap();
        march_payroll(&mut tables);

        process_cycle(&mut tables, schedule.cycles[1].id, 2).unwrap();
        let report = process_cycle(&mut tables, schedule.cycles[1].id, 2).unwrap();

        assert!(report.processed.is_empty());
        assert_eq!(report.unchanged, 1);
    }

    #[test]
    fn test_cycle_outside_pay_dates_processes_nothing() {
        let mut tables = MemoryTables::default();
        let schedule = replace_config(&mut tables, config_input(), Utc::now()).unwrap();
        march_payroll(&mut tables);

        let report = process_cycle(&mut tables, schedule.cycles[0].id, 2).unwrap();
        assert!(report.processed.is_empty());
        assert_eq!(report.unchanged, 0);
    }

    #[test]
    fn test_retired_cycle_rejected() {
        let mut tables = MemoryTables::default();
        let old = replace_config(&mut tables, config_input(), Utc::now()).unwrap();
        replace_config(&mut tables, config_input(), Utc::now()).unwrap();

        let result = process_cycle(&mut tables, old.cycles[0].id, 2);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_unknown_cycle() {
        let mut tables = MemoryTables::default();
        let result = process_cycle(&mut tables, Uuid::new_v4(), 2);
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }
}
