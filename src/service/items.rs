//! Payroll item intake.

use tracing::info;

use crate::error::EngineResult;
use crate::models::{NewPayrollItem, PayrollItem};
use crate::store::PayrollStore;

/// Validates and stores an unclaimed payroll item.
///
/// The item waits until the next payroll run (or cycle processing) of an
/// eligible employee claims it. Amounts finer than `scale` fractional
/// digits are rejected.
pub fn create_item<S>(
    store: &mut S,
    input: NewPayrollItem,
    scale: u32,
) -> EngineResult<PayrollItem>
where
    S: PayrollStore + ?Sized,
{
    input.validate(scale)?;
    let item = PayrollItem::new(input);
    store.save_item(item.clone())?;

    info!(
        item_id = %item.id,
        scope = ?item.scope,
        item_type = ?item.item_type,
        amount = %item.amount,
        "Created payroll item"
    );
    Ok(item)
}
