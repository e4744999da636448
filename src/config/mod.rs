//! Configuration loading for the payroll engine.
//!
//! This module loads server settings and the payroll calculation policy
//! from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Tax rate: {}", config.policy().tax_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{PayrollPolicy, ServerSettings, Settings};
