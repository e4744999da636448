//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while generating cycles,
//! evaluating pay periods and building payroll runs.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::UnsupportedPayPeriod {
///     value: "fortnightly".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported pay period: fortnightly");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A payroll configuration violated the cutoff day rules.
    #[error("Invalid payroll configuration: {message}")]
    InvalidConfiguration {
        /// A description of the violated rule.
        message: String,
    },

    /// A payroll already exists for the employee, salary and period end.
    #[error(
        "Payroll already exists for employee {employee_id}, salary {salary_id}, period ending {period_end}"
    )]
    DuplicatePeriod {
        /// The employee the payroll belongs to.
        employee_id: Uuid,
        /// The salary the payroll was generated from.
        salary_id: Uuid,
        /// The period end date (the payroll's pay date).
        period_end: NaiveDate,
    },

    /// A salary carries a pay period the engine cannot evaluate.
    #[error("Unsupported pay period: {value}")]
    UnsupportedPayPeriod {
        /// The raw pay period value.
        value: String,
    },

    /// The storage layer failed; the enclosing transaction was rolled back.
    #[error("Persistence failure: {message}")]
    PersistenceFailure {
        /// A description of the storage error.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g., "payroll", "payroll cycle").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A payroll item was invalid or contained inconsistent data.
    #[error("Invalid payroll item field '{field}': {message}")]
    InvalidPayrollItem {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A salary record was invalid or contained inconsistent data.
    #[error("Invalid salary field '{field}': {message}")]
    InvalidSalary {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A payroll status change was not allowed.
    #[error("Cannot move payroll {payroll_id} from {from} to {to}")]
    InvalidStatusTransition {
        /// The payroll being updated.
        payroll_id: Uuid,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
}

impl EngineError {
    /// Returns true when retrying the same operation may succeed.
    ///
    /// Only storage failures are retryable; every other variant describes
    /// a problem with the input or the current state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::PersistenceFailure { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/server.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/server.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/policy.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/policy.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_configuration_displays_message() {
        let error = EngineError::InvalidConfiguration {
            message: "first_end_day must be before second_start_day".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid payroll configuration: first_end_day must be before second_start_day"
        );
    }

    #[test]
    fn test_duplicate_period_displays_triple() {
        let employee_id = Uuid::nil();
        let salary_id = Uuid::nil();
        let error = EngineError::DuplicatePeriod {
            employee_id,
            salary_id,
            period_end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        };
        assert!(error.to_string().contains("period ending 2025-03-31"));
    }

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = EngineError::NotFound {
            entity: "payroll",
            id: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "payroll not found: abc");
    }

    #[test]
    fn test_invalid_payroll_item_displays_field_and_message() {
        let error = EngineError::InvalidPayrollItem {
            field: "amount".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid payroll item field 'amount': must not be negative"
        );
    }

    #[test]
    fn test_only_persistence_failure_is_retryable() {
        let persistence = EngineError::PersistenceFailure {
            message: "lock poisoned".to_string(),
        };
        let invalid = EngineError::InvalidConfiguration {
            message: "bad".to_string(),
        };
        assert!(persistence.is_retryable());
        assert!(!invalid.is_retryable());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unsupported() -> EngineResult<()> {
            Err(EngineError::UnsupportedPayPeriod {
                value: "yearly".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_unsupported()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
