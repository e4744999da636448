//! Payroll amount aggregation.
//!
//! This module computes the items a payroll run seeds for itself (basic
//! salary and tax) and aggregates attached items into payroll totals. All
//! arithmetic is done in [`Decimal`]; nothing passes through floating point.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::PayrollPolicy;
use crate::models::{ItemType, PayrollItem, PayrollTotals, Salary};

/// An item a payroll run creates for itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededItem {
    /// Earning or deduction.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Category label from the policy.
    pub category: String,
    /// Rounded amount.
    pub amount: Decimal,
}

/// Payroll amounts computed without persisting anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPreview {
    /// The salary's basic amount.
    pub basic_salary: Decimal,
    /// Sum of earnings.
    pub total_earnings: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Earnings minus deductions.
    pub net_salary: Decimal,
    /// The items the run would seed.
    pub items: Vec<SeededItem>,
}

/// Rounds a monetary amount to `scale` fractional digits, halves away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_amount(Decimal::from_str("10.005").unwrap(), 2), Decimal::from_str("10.01").unwrap());
/// assert_eq!(round_amount(Decimal::from_str("7").unwrap(), 2).to_string(), "7.00");
/// ```
pub fn round_amount(amount: Decimal, scale: u32) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

/// The basic salary earning and tax deduction seeded into every run.
///
/// Tax is `basic_salary × policy.tax_rate`, rounded to the policy scale.
pub fn seeded_items(basic_salary: Decimal, policy: &PayrollPolicy) -> Vec<SeededItem> {
    let basic = round_amount(basic_salary, policy.amount_scale);
    let tax = round_amount(basic_salary * policy.tax_rate, policy.amount_scale);

    vec![
        SeededItem {
            item_type: ItemType::Earning,
            category: policy.basic_salary_category.clone(),
            amount: basic,
        },
        SeededItem {
            item_type: ItemType::Deduction,
            category: policy.tax_category.clone(),
            amount: tax,
        },
    ]
}

/// Aggregates item amounts by type.
///
/// Earnings add to `total_earnings`; deductions and contributions add to
/// `total_deductions`; `net_salary` is the difference.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_totals;
/// use payroll_engine::models::{ItemType, PayrollItem};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let payroll_id = Uuid::new_v4();
/// let employee_id = Uuid::new_v4();
/// let items = vec![
///     PayrollItem::seeded(payroll_id, employee_id, ItemType::Earning, "Basic Salary", Decimal::new(2000000, 2)),
///     PayrollItem::seeded(payroll_id, employee_id, ItemType::Deduction, "Tax", Decimal::new(200000, 2)),
/// ];
/// let totals = aggregate_totals(&items, 2);
/// assert_eq!(totals.net_salary, Decimal::new(1800000, 2));
/// ```
pub fn aggregate_totals<'a, I>(items: I, scale: u32) -> PayrollTotals
where
    I: IntoIterator<Item = &'a PayrollItem>,
{
    let (earnings, deductions) = items.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(earnings, deductions), item| {
            if item.item_type.is_deduction() {
                (earnings, deductions + item.amount)
            } else {
                (earnings + item.amount, deductions)
            }
        },
    );

    let total_earnings = round_amount(earnings, scale);
    let total_deductions = round_amount(deductions, scale);

    PayrollTotals {
        total_earnings,
        total_deductions,
        net_salary: total_earnings - total_deductions,
    }
}

/// Computes what a run for `salary` would produce from the seeded items alone.
pub fn preview_payroll(salary: &Salary, policy: &PayrollPolicy) -> PayrollPreview {
    let items = seeded_items(salary.basic_salary, policy);

    let total_earnings: Decimal = items
        .iter()
        .filter(|i| !i.item_type.is_deduction())
        .map(|i| i.amount)
        .sum();
    let total_deductions: Decimal = items
        .iter()
        .filter(|i| i.item_type.is_deduction())
        .map(|i| i.amount)
        .sum();

    PayrollPreview {
        basic_salary: salary.basic_salary,
        total_earnings,
        total_deductions,
        net_salary: total_earnings - total_deductions,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemScope, NewPayrollItem, SalaryInput};
    use chrono::NaiveDate;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(item_type: ItemType, amount: &str) -> PayrollItem {
        PayrollItem::new(NewPayrollItem {
            employee_id: None,
            scope: ItemScope::Global,
            item_type,
            category: "Test".to_string(),
            amount: dec(amount),
        })
    }

    fn salary(basic: &str) -> Salary {
        Salary::new(
            Uuid::new_v4(),
            SalaryInput {
                basic_salary: dec(basic),
                pay_period: "monthly".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: None,
            },
        )
    }

    #[test]
    fn test_seeded_items_for_twenty_thousand() {
        let items = seeded_items(dec("20000.00"), &PayrollPolicy::default());

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_type, ItemType::Earning);
        assert_eq!(items[0].category, "Basic Salary");
        assert_eq!(items[0].amount, dec("20000.00"));
        assert_eq!(items[1].item_type, ItemType::Deduction);
        assert_eq!(items[1].category, "Tax");
        assert_eq!(items[1].amount, dec("2000.00"));
    }

    #[test]
    fn test_tax_rounded_to_cents() {
        let items = seeded_items(dec("12345.67"), &PayrollPolicy::default());
        assert_eq!(items[1].amount.to_string(), "1234.57");
    }

    #[test]
    fn test_aggregate_counts_contributions_as_deductions() {
        let items = vec![
            item(ItemType::Earning, "1000.00"),
            item(ItemType::Earning, "250.50"),
            item(ItemType::Deduction, "100.00"),
            item(ItemType::Contribution, "50.25"),
        ];
        let totals = aggregate_totals(&items, 2);

        assert_eq!(totals.total_earnings, dec("1250.50"));
        assert_eq!(totals.total_deductions, dec("150.25"));
        assert_eq!(totals.net_salary, dec("1100.25"));
    }

    #[test]
    fn test_aggregate_has_no_float_drift() {
        let items: Vec<PayrollItem> = (0..10).map(|_| item(ItemType::Earning, "0.10")).collect();
        let totals = aggregate_totals(&items, 2);
        assert_eq!(totals.total_earnings.to_string(), "1.00");
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let totals = aggregate_totals(&Vec::<PayrollItem>::new(), 2);
        assert_eq!(totals, PayrollTotals {
            total_earnings: dec("0.00"),
            total_deductions: dec("0.00"),
            net_salary: dec("0.00"),
        });
    }

    #[test]
    fn test_net_can_be_negative_when_deductions_exceed_earnings() {
        let items = vec![item(ItemType::Earning, "10.00"), item(ItemType::Deduction, "15.00")];
        assert_eq!(aggregate_totals(&items, 2).net_salary, dec("-5.00"));
    }

    #[test]
    fn test_preview_reference_salary() {
        let preview = preview_payroll(&salary("20000.00"), &PayrollPolicy::default());

        assert_eq!(preview.basic_salary, dec("20000.00"));
        assert_eq!(preview.total_earnings, dec("20000.00"));
        assert_eq!(preview.total_deductions, dec("2000.00"));
        assert_eq!(preview.net_salary, dec("18000.00"));
        assert_eq!(preview.items.len(), 2);
    }

    #[test]
    fn test_preview_uses_policy_rate() {
        let policy = PayrollPolicy {
            tax_rate: dec("0.25"),
            ..PayrollPolicy::default()
        };
        let preview = preview_payroll(&salary("1000"), &policy);
        assert_eq!(preview.total_deductions, dec("250.00"));
        assert_eq!(preview.net_salary, dec("750.00"));
    }
}
