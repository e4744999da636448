//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// HTTP server settings from `server.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address the API listens on (e.g., "127.0.0.1:8080").
    pub bind_address: String,
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Payroll calculation policy from `policy.yaml`.
///
/// Controls the items a payroll run seeds for every employee and the
/// monetary scale totals are rounded to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollPolicy {
    /// Fraction of the basic salary withheld as tax (0.10 = 10%).
    pub tax_rate: Decimal,
    /// Category label of the seeded basic salary earning.
    #[serde(default = "default_basic_salary_category")]
    pub basic_salary_category: String,
    /// Category label of the seeded tax deduction.
    #[serde(default = "default_tax_category")]
    pub tax_category: String,
    /// Number of fractional digits amounts are rounded to.
    #[serde(default = "default_amount_scale")]
    pub amount_scale: u32,
}

fn default_basic_salary_category() -> String {
    "Basic Salary".to_string()
}

fn default_tax_category() -> String {
    "Tax".to_string()
}

fn default_amount_scale() -> u32 {
    2
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.10),
            basic_salary_category: default_basic_salary_category(),
            tax_category: default_tax_category(),
            amount_scale: default_amount_scale(),
        }
    }
}

/// The complete settings loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct Settings {
    server: ServerSettings,
    policy: PayrollPolicy,
}

impl Settings {
    /// Creates settings from their component parts.
    pub fn new(server: ServerSettings, policy: PayrollPolicy) -> Self {
        Self { server, policy }
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerSettings {
        &self.server
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }
}
