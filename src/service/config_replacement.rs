//! Config replacement transaction.
//!
//! Installing a payroll configuration retires whatever configuration is
//! active, stores the new one and generates its cycles. Callers run these
//! functions inside one [`Database::transaction`](crate::store::Database::transaction)
//! so a failure at any step leaves the previous configuration in place.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::calculation::generate_cycles;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollConfig, PayrollConfigInput, PayrollSchedule};
use crate::store::PayrollStore;

/// Replaces the active payroll configuration with one built from `input`.
///
/// The previous configuration and its cycles are retired, not deleted.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] if the cutoff days are out
/// of range or out of order. Nothing is retired in that case.
pub fn replace_config<S>(
    store: &mut S,
    input: PayrollConfigInput,
    now: DateTime<Utc>,
) -> EngineResult<PayrollSchedule>
where
    S: PayrollStore + ?Sized,
{
    input.validate()?;

    if let Some(previous) = store.find_active_config()? {
        store.retire_config(previous.id, now)?;
        debug!(config_id = %previous.id, "Retired previous payroll config");
    }

    let config = PayrollConfig::new(input, now);
    let cycles = generate_cycles(&config)?;
    store.save_config(config.clone())?;
    store.save_cycles(cycles.clone())?;

    info!(
        config_id = %config.id,
        start_year_month = %config.start_year_month,
        cycles = cycles.len(),
        "Installed payroll config"
    );

    Ok(PayrollSchedule { config, cycles })
}

/// Retires the active configuration without installing a replacement.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] when no configuration is active.
pub fn retire_active_config<S>(store: &mut S, now: DateTime<Utc>) -> EngineResult<PayrollConfig>
where
    S: PayrollStore + ?Sized,
{
    let active = store.find_active_config()?.ok_or_else(|| EngineError::NotFound {
        entity: "active payroll config",
        id: "none".to_string(),
    })?;

    store.retire_config(active.id, now)?;
    info!(config_id = %active.id, "Retired payroll config");

    store.find_config(active.id)?.ok_or_else(|| EngineError::PersistenceFailure {
        message: format!("retired payroll config {} disappeared", active.id),
    })
}

/// The active configuration together with its cycles, if one is installed.
pub fn active_schedule<S>(store: &S) -> EngineResult<Option<PayrollSchedule>>
where
    S: PayrollStore + ?Sized,
{
    let Some(config) = store.find_active_config()? else {
        return Ok(None);
    };
    let cycles = store.find_active_cycles()?;
    Ok(Some(PayrollSchedule { config, cycles }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStatus;
    use crate::store::{Database, MemoryTables};
    use chrono::NaiveDate;

    fn input(month: &str) -> PayrollConfigInput {
        PayrollConfigInput {
            start_year_month: month.parse().unwrap(),
            first_start_day: 1,
            first_end_day: 15,
            second_start_day: 16,
            second_end_day: 31,
            pay_date_offset: 5,
        }
    }

    #[test]
    fn test_replace_installs_config_with_24_cycles() {
        let mut tables = MemoryTables::default();
        let schedule = replace_config(&mut tables, input("2025-03"), Utc::now()).unwrap();

        assert_eq!(schedule.cycles.len(), 24);
        assert!(schedule.config.is_active());
        assert_eq!(
            schedule.cycles[1].pay_date,
            NaiveDate::from_ymd_opt(2025, 4, 5).unwrap()
        );
        assert_eq!(tables.find_active_cycles().unwrap().len(), 24);
    }

    #[test]
    fn test_replace_retires_previous_config_and_cycles() {
        let mut tables = MemoryTables::default();
        let first = replace_config(&mut tables, input("2025-01"), Utc::now()).unwrap();
        let second = replace_config(&mut tables, input("2025-07"), Utc::now()).unwrap();

        let active = active_schedule(&tables).unwrap().unwrap();
        assert_eq!(active.config.id, second.config.id);
        assert_eq!(active.cycles.len(), 24);
        assert!(active.cycles.iter().all(|c| c.payroll_config_id == second.config.id));

        let retired = tables.find_config(first.config.id).unwrap().unwrap();
        assert_eq!(retired.status, RecordStatus::Retired);
        let old_cycle = tables.find_cycle(first.cycles[0].id).unwrap().unwrap();
        assert_eq!(old_cycle.status, RecordStatus::Retired);
    }

    #[test]
    fn test_invalid_input_keeps_previous_config() {
        let db = Database::new();
        let first = db
            .transaction(|tx| replace_config(tx, input("2025-01"), Utc::now()))
            .unwrap();

        let mut bad = input("2025-07");
        bad.first_end_day = 16;
        let result = db.transaction(|tx| replace_config(tx, bad, Utc::now()));
        assert!(matches!(result, Err(EngineError::InvalidConfiguration { .. })));

        let active = db.read(|t| active_schedule(t)).unwrap().unwrap();
        assert_eq!(active.config.id, first.config.id);
    }

    #[test]
    fn test_retire_without_replacement() {
        let mut tables = MemoryTables::default();
        replace_config(&mut tables, input("2025-01"), Utc::now()).unwrap();

        let retired = retire_active_config(&mut tables, Utc::now()).unwrap();
        assert_eq!(retired.status, RecordStatus::Retired);
        assert!(retired.retired_at.is_some());
        assert!(active_schedule(&tables).unwrap().is_none());
        assert!(tables.find_active_cycles().unwrap().is_empty());
    }

    #[test]
    fn test_retire_with_nothing_active() {
        let mut tables = MemoryTables::default();
        let result = retire_active_config(&mut tables, Utc::now());
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }
}
