//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollPolicy, ServerSettings, Settings};

/// Highest supported amount scale.
const MAX_AMOUNT_SCALE: u32 = 4;

/// Loads and provides access to engine settings.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── server.yaml   # Bind address and log filter
/// └── policy.yaml   # Tax rate and seeded item labels
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Listening on {}", loader.server().bind_address);
/// println!("Tax rate: {}", loader.policy().tax_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: Settings,
}

impl ConfigLoader {
    /// Loads settings from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The policy values are out of range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let server_path = path.join("server.yaml");
        let server = Self::load_yaml::<ServerSettings>(&server_path)?;

        let policy_path = path.join("policy.yaml");
        let policy = Self::load_yaml::<PayrollPolicy>(&policy_path)?;
        Self::validate_policy(&policy, &policy_path.display().to_string())?;

        debug!(
            path = %path.display(),
            bind_address = %server.bind_address,
            tax_rate = %policy.tax_rate,
            "Loaded settings"
        );

        Ok(Self {
            settings: Settings::new(server, policy),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_policy(policy: &PayrollPolicy, path: &str) -> EngineResult<()> {
        if policy.tax_rate < Decimal::ZERO || policy.tax_rate > Decimal::ONE {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!("tax_rate must be between 0 and 1, got {}", policy.tax_rate),
            });
        }
        if policy.amount_scale > MAX_AMOUNT_SCALE {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!(
                    "amount_scale must be at most {MAX_AMOUNT_SCALE}, got {}",
                    policy.amount_scale
                ),
            });
        }
        Ok(())
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerSettings {
        self.settings.server()
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        self.settings.policy()
    }
}
