//! In-memory storage with all-or-nothing transactions.
//!
//! [`Database`] holds every table behind one mutex. A transaction locks it
//! for the whole unit of work and journals every write; if the unit of work
//! fails, the journal is replayed backwards so nothing it wrote remains.
//! Concurrent units of work are serialized by the lock.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ItemScope, Payroll, PayrollConfig, PayrollCycle, PayrollItem, RecordStatus, Salary,
};

use super::PayrollStore;

type PeriodKey = (Uuid, Uuid, NaiveDate);

/// One write, recorded as what it takes to reverse it.
#[derive(Debug, Clone)]
enum Undo {
    Config { id: Uuid, previous: Option<PayrollConfig> },
    ActiveConfig(Option<Uuid>),
    CyclesLen(usize),
    CycleStatus { index: usize, previous: RecordStatus },
    Salary { id: Uuid, previous: Option<Salary> },
    ItemsLen(usize),
    ItemClaim { index: usize },
    Payroll { id: Uuid, previous: Option<Payroll> },
    PayrollPeriod(PeriodKey),
}

/// The tables of the in-memory store.
///
/// Implements [`PayrollStore`]; engine code only sees it through a
/// [`Database::transaction`] or [`Database::read`] handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    configs: HashMap<Uuid, PayrollConfig>,
    active_config_id: Option<Uuid>,
    cycles: Vec<PayrollCycle>,
    salaries: HashMap<Uuid, Salary>,
    items: Vec<PayrollItem>,
    payrolls: HashMap<Uuid, Payroll>,
    payroll_periods: HashMap<PeriodKey, Uuid>,
    journal: Option<Vec<Undo>>,
}

impl MemoryTables {
    fn record(&mut self, undo: Undo) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(undo);
        }
    }

    fn begin(&mut self) {
        self.journal = Some(Vec::new());
    }

    fn commit(&mut self) {
        self.journal = None;
    }

    fn rollback(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };
        for undo in journal.into_iter().rev() {
            match undo {
                Undo::Config { id, previous } => restore(&mut self.configs, id, previous),
                Undo::ActiveConfig(previous) => self.active_config_id = previous,
                Undo::CyclesLen(len) => self.cycles.truncate(len),
                Undo::CycleStatus { index, previous } => {
                    if let Some(cycle) = self.cycles.get_mut(index) {
                        cycle.status = previous;
                    }
                }
                Undo::Salary { id, previous } => restore(&mut self.salaries, id, previous),
                Undo::ItemsLen(len) => self.items.truncate(len),
                Undo::ItemClaim { index } => {
                    if let Some(item) = self.items.get_mut(index) {
                        item.payroll_id = None;
                    }
                }
                Undo::Payroll { id, previous } => restore(&mut self.payrolls, id, previous),
                Undo::PayrollPeriod(key) => {
                    self.payroll_periods.remove(&key);
                }
            }
        }
    }
}

fn restore<T>(table: &mut HashMap<Uuid, T>, id: Uuid, previous: Option<T>) {
    match previous {
        Some(row) => {
            table.insert(id, row);
        }
        None => {
            table.remove(&id);
        }
    }
}

impl PayrollStore for MemoryTables {
    fn find_active_config(&self) -> EngineResult<Option<PayrollConfig>> {
        Ok(self
            .active_config_id
            .and_then(|id| self.configs.get(&id))
            .filter(|config| config.is_active())
            .cloned())
    }

    fn find_config(&self, id: Uuid) -> EngineResult<Option<PayrollConfig>> {
        Ok(self.configs.get(&id).cloned())
    }

    fn save_config(&mut self, config: PayrollConfig) -> EngineResult<()> {
        if self.configs.contains_key(&config.id) {
            return Err(persistence(format!("payroll config {} already exists", config.id)));
        }
        if config.is_active() {
            if let Some(active_id) = self.active_config_id {
                return Err(persistence(format!(
                    "payroll config {active_id} is still active"
                )));
            }
            self.record(Undo::ActiveConfig(self.active_config_id));
            self.active_config_id = Some(config.id);
        }
        self.record(Undo::Config {
            id: config.id,
            previous: None,
        });
        self.configs.insert(config.id, config);
        Ok(())
    }

    fn retire_config(&mut self, id: Uuid, retired_at: DateTime<Utc>) -> EngineResult<()> {
        let config = self.configs.get_mut(&id).ok_or_else(|| EngineError::NotFound {
            entity: "payroll config",
            id: id.to_string(),
        })?;
        let previous = config.clone();
        config.status = RecordStatus::Retired;
        config.retired_at = Some(retired_at);
        self.record(Undo::Config {
            id,
            previous: Some(previous),
        });

        let mut retired = Vec::new();
        for (index, cycle) in self.cycles.iter_mut().enumerate() {
            if cycle.payroll_config_id == id && cycle.status != RecordStatus::Retired {
                retired.push(Undo::CycleStatus {
                    index,
                    previous: cycle.status,
                });
                cycle.status = RecordStatus::Retired;
            }
        }
        for undo in retired {
            self.record(undo);
        }

        if self.active_config_id == Some(id) {
            self.record(Undo::ActiveConfig(Some(id)));
            self.active_config_id = None;
        }
        Ok(())
    }

    fn save_cycles(&mut self, cycles: Vec<PayrollCycle>) -> EngineResult<()> {
        if let Some(orphan) = cycles
            .iter()
            .find(|c| !self.configs.contains_key(&c.payroll_config_id))
        {
            return Err(persistence(format!(
                "payroll config {} does not exist for cycle {}",
                orphan.payroll_config_id, orphan.id
            )));
        }
        self.record(Undo::CyclesLen(self.cycles.len()));
        self.cycles.extend(cycles);
        Ok(())
    }

    fn find_active_cycles(&self) -> EngineResult<Vec<PayrollCycle>> {
        let Some(active_id) = self.active_config_id else {
            return Ok(Vec::new());
        };
        let mut cycles: Vec<PayrollCycle> = self
            .cycles
            .iter()
            .filter(|c| c.payroll_config_id == active_id && c.status == RecordStatus::Active)
            .cloned()
            .collect();
        cycles.sort_by_key(|c| (c.start_date, c.end_date));
        Ok(cycles)
    }

    fn find_cycle(&self, id: Uuid) -> EngineResult<Option<PayrollCycle>> {
        Ok(self.cycles.iter().find(|c| c.id == id).cloned())
    }

    fn find_due_salaries(&self, as_of: NaiveDate) -> EngineResult<Vec<Salary>> {
        let mut salaries: Vec<Salary> = self
            .salaries
            .values()
            .filter(|s| s.is_effective_on(as_of))
            .cloned()
            .collect();
        salaries.sort_by_key(|s| (s.start_date, s.id));
        Ok(salaries)
    }

    fn find_active_salary(&self, employee_id: Uuid) -> EngineResult<Option<Salary>> {
        Ok(self
            .salaries
            .values()
            .find(|s| s.employee_id == employee_id && s.is_active)
            .cloned())
    }

    fn find_salary(&self, id: Uuid) -> EngineResult<Option<Salary>> {
        Ok(self.salaries.get(&id).cloned())
    }

    fn save_salary(&mut self, salary: Salary) -> EngineResult<()> {
        if salary.is_active {
            let other_active = self.salaries.values().any(|s| {
                s.employee_id == salary.employee_id && s.is_active && s.id != salary.id
            });
            if other_active {
                return Err(persistence(format!(
                    "employee {} already has an active salary",
                    salary.employee_id
                )));
            }
        }
        let id = salary.id;
        let previous = self.salaries.insert(id, salary);
        self.record(Undo::Salary { id, previous });
        Ok(())
    }

    fn save_item(&mut self, item: PayrollItem) -> EngineResult<()> {
        if self.items.iter().any(|i| i.id == item.id) {
            return Err(persistence(format!("payroll item {} already exists", item.id)));
        }
        self.record(Undo::ItemsLen(self.items.len()));
        self.items.push(item);
        Ok(())
    }

    fn find_unclaimed_items(&self, employee_id: Option<Uuid>) -> EngineResult<Vec<PayrollItem>> {
        Ok(self
            .items
            .iter()
            .filter(|i| match employee_id {
                Some(employee_id) => {
                    i.scope == ItemScope::Specific && i.is_claimable_by(employee_id)
                }
                None => i.scope == ItemScope::Global && i.is_unclaimed(),
            })
            .cloned()
            .collect())
    }

    fn claim_items(&mut self, item_ids: &[Uuid], payroll_id: Uuid) -> EngineResult<usize> {
        if !self.payrolls.contains_key(&payroll_id) {
            return Err(EngineError::NotFound {
                entity: "payroll",
                id: payroll_id.to_string(),
            });
        }

        let wanted: HashSet<Uuid> = item_ids.iter().copied().collect();
        let mut claimed = Vec::new();
        for (index, item) in self.items.iter_mut().enumerate() {
            if item.is_unclaimed() && wanted.contains(&item.id) {
                item.payroll_id = Some(payroll_id);
                claimed.push(Undo::ItemClaim { index });
            }
        }

        let count = claimed.len();
        for undo in claimed {
            self.record(undo);
        }
        Ok(count)
    }

    fn find_items_for_payroll(&self, payroll_id: Uuid) -> EngineResult<Vec<PayrollItem>> {
        Ok(self
            .items
            .iter()
            .filter(|i| i.payroll_id == Some(payroll_id))
            .cloned()
            .collect())
    }

    fn save_payroll(&mut self, payroll: Payroll) -> EngineResult<()> {
        let key = (payroll.employee_id, payroll.salary_id, payroll.pay_date);
        if self.payroll_periods.contains_key(&key) {
            return Err(EngineError::DuplicatePeriod {
                employee_id: payroll.employee_id,
                salary_id: payroll.salary_id,
                period_end: payroll.pay_date,
            });
        }
        if self.payrolls.contains_key(&payroll.id) {
            return Err(persistence(format!("payroll {} already exists", payroll.id)));
        }
        self.record(Undo::PayrollPeriod(key));
        self.record(Undo::Payroll {
            id: payroll.id,
            previous: None,
        });
        self.payroll_periods.insert(key, payroll.id);
        self.payrolls.insert(payroll.id, payroll);
        Ok(())
    }

    fn update_payroll(&mut self, payroll: &Payroll) -> EngineResult<()> {
        let stored = self
            .payrolls
            .get_mut(&payroll.id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "payroll",
                id: payroll.id.to_string(),
            })?;
        if (stored.employee_id, stored.salary_id, stored.pay_date)
            != (payroll.employee_id, payroll.salary_id, payroll.pay_date)
        {
            return Err(persistence(format!(
                "payroll {} cannot change its employee, salary or pay date",
                payroll.id
            )));
        }
        let previous = std::mem::replace(stored, payroll.clone());
        self.record(Undo::Payroll {
            id: payroll.id,
            previous: Some(previous),
        });
        Ok(())
    }

    fn find_payroll(&self, id: Uuid) -> EngineResult<Option<Payroll>> {
        Ok(self.payrolls.get(&id).cloned())
    }

    fn find_payroll_by_period(
        &self,
        employee_id: Uuid,
        salary_id: Uuid,
        period_end: NaiveDate,
    ) -> EngineResult<Option<Payroll>> {
        Ok(self
            .payroll_periods
            .get(&(employee_id, salary_id, period_end))
            .and_then(|id| self.payrolls.get(id))
            .cloned())
    }

    fn find_payrolls_paid_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Payroll>> {
        let mut payrolls: Vec<Payroll> = self
            .payrolls
            .values()
            .filter(|p| p.pay_date >= start && p.pay_date <= end)
            .cloned()
            .collect();
        payrolls.sort_by_key(|p| (p.pay_date, p.created_at, p.id));
        Ok(payrolls)
    }
}

fn persistence(message: String) -> EngineError {
    EngineError::PersistenceFailure { message }
}

/// Shared handle to the in-memory tables.
///
/// Cloning the handle shares the same tables.
///
/// # Example
///
/// ```
/// use payroll_engine::store::{Database, PayrollStore};
///
/// let db = Database::new();
/// let active = db.read(|tables| tables.find_active_config()).unwrap();
/// assert!(active.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: Arc<Mutex<MemoryTables>>,
}

impl Database {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` as one transaction.
    ///
    /// The tables stay locked for the whole closure. Changes become visible
    /// only if `work` returns `Ok`; on `Err` they are undone.
    pub fn transaction<T, F>(&self, work: F) -> EngineResult<T>
    where
        F: FnOnce(&mut MemoryTables) -> EngineResult<T>,
    {
        let mut guard = self.lock()?;
        guard.begin();
        match work(&mut guard) {
            Ok(value) => {
                guard.commit();
                Ok(value)
            }
            Err(err) => {
                guard.rollback();
                debug!(error = %err, "Transaction rolled back");
                Err(err)
            }
        }
    }

    /// Runs a read-only closure against a consistent view of the tables.
    pub fn read<T, F>(&self, work: F) -> EngineResult<T>
    where
        F: FnOnce(&MemoryTables) -> EngineResult<T>,
    {
        let guard = self.lock()?;
        work(&guard)
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, MemoryTables>> {
        self.tables.lock().map_err(|_| EngineError::PersistenceFailure {
            message: "database lock poisoned".to_string(),
        })
    }
}
