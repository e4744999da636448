//! Application state for the payroll engine API.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigLoader, PayrollPolicy};
use crate::store::Database;

/// Shared application state.
///
/// Holds the database handle, the loaded settings and the clock used for
/// generation passes.
#[derive(Clone)]
pub struct AppState {
    db: Database,
    config: Arc<ConfigLoader>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates state with an empty database and the system clock.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates state with an empty database and the given clock.
    pub fn with_clock(config: ConfigLoader, clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Database::new(),
            config: Arc::new(config),
            clock,
        }
    }

    /// Returns the database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        self.config.policy()
    }

    /// Returns the clock.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
