//! Payroll item model.
//!
//! Items are the earnings, deductions and contributions that make up a
//! payroll. They are created unattached and later claimed by a payroll run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Longest accepted item category label.
pub const MAX_CATEGORY_LEN: usize = 255;

/// Who a payroll item applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemScope {
    /// One employee, named by `employee_id`.
    Specific,
    /// Any employee; the first run that claims it consumes it.
    Global,
}

/// How an item affects the payroll totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Adds to total earnings.
    Earning,
    /// Adds to total deductions.
    Deduction,
    /// Employee contribution; counted with deductions.
    Contribution,
}

impl ItemType {
    /// Returns true if the item reduces net salary.
    pub fn is_deduction(&self) -> bool {
        matches!(self, ItemType::Deduction | ItemType::Contribution)
    }
}

/// Fields supplied when creating a payroll item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayrollItem {
    /// The employee for `specific` items; must be absent for `global` items.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Specific or global.
    pub scope: ItemScope,
    /// Earning, deduction or contribution.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Free-form label (e.g., "Overtime", "SSS").
    pub category: String,
    /// Non-negative amount.
    pub amount: Decimal,
}

impl NewPayrollItem {
    /// Checks scope consistency, category and amount.
    ///
    /// `scale` is the number of fractional digits amounts are stored with.
    pub fn validate(&self, scale: u32) -> EngineResult<()> {
        match (self.scope, self.employee_id) {
            (ItemScope::Specific, None) => {
                return Err(invalid("employee_id", "is required for specific items"));
            }
            (ItemScope::Global, Some(_)) => {
                return Err(invalid("employee_id", "must be empty for global items"));
            }
            _ => {}
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(invalid("category", "must not be empty"));
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(invalid(
                "category",
                &format!("must be at most {MAX_CATEGORY_LEN} characters"),
            ));
        }

        if self.amount < Decimal::ZERO {
            return Err(invalid("amount", "must not be negative"));
        }
        if self.amount.normalize().scale() > scale {
            return Err(invalid(
                "amount",
                &format!("must have at most {scale} decimal places"),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidPayrollItem {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// A stored payroll item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollItem {
    /// Unique identifier.
    pub id: Uuid,
    /// The payroll that claimed this item, once claimed.
    #[serde(default)]
    pub payroll_id: Option<Uuid>,
    /// The employee for `specific` items.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Specific or global.
    pub scope: ItemScope,
    /// Earning, deduction or contribution.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Free-form label.
    pub category: String,
    /// Non-negative amount.
    pub amount: Decimal,
}

impl PayrollItem {
    /// Creates an unclaimed item from validated input.
    pub fn new(input: NewPayrollItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            payroll_id: None,
            employee_id: input.employee_id,
            scope: input.scope,
            item_type: input.item_type,
            category: input.category.trim().to_string(),
            amount: input.amount,
        }
    }

    /// Creates an employee-specific item already attached to a payroll.
    ///
    /// Used for the items a payroll run seeds itself (basic salary, tax).
    pub fn seeded(
        payroll_id: Uuid,
        employee_id: Uuid,
        item_type: ItemType,
        category: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            payroll_id: Some(payroll_id),
            employee_id: Some(employee_id),
            scope: ItemScope::Specific,
            item_type,
            category: category.into(),
            amount,
        }
    }

    /// Returns true if no payroll has claimed this item yet.
    pub fn is_unclaimed(&self) -> bool {
        self.payroll_id.is_none()
    }

    /// Returns true if a run for `employee_id` may claim this item.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{ItemScope, ItemType, NewPayrollItem, PayrollItem};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let employee = Uuid::new_v4();
    /// let bonus = PayrollItem::new(NewPayrollItem {
    ///     employee_id: Some(employee),
    ///     scope: ItemScope::Specific,
    ///     item_type: ItemType::Earning,
    ///     category: "Bonus".to_string(),
    ///     amount: Decimal::new(50000, 2),
    /// });
    /// assert!(bonus.is_claimable_by(employee));
    /// assert!(!bonus.is_claimable_by(Uuid::new_v4()));
    /// ```
    pub fn is_claimable_by(&self, employee_id: Uuid) -> bool {
        self.is_unclaimed()
            && match self.scope {
                ItemScope::Global => true,
                ItemScope::Specific => self.employee_id == Some(employee_id),
            }
    }
}
