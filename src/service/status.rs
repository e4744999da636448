//! Payroll status changes.

use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Payroll, PayrollStatus};
use crate::store::PayrollStore;

/// Moves a payroll to `status`.
///
/// Only the next status in `pending -> processed -> paid` is accepted;
/// requesting the current status is a no-op.
///
/// # Errors
///
/// - [`EngineError::NotFound`] if the payroll does not exist.
/// - [`EngineError::InvalidStatusTransition`] for backwards or skipped steps.
pub fn update_payroll_status<S>(
    store: &mut S,
    payroll_id: Uuid,
    status: PayrollStatus,
) -> EngineResult<Payroll>
where
    S: PayrollStore + ?Sized,
{
    let mut payroll = store.find_payroll(payroll_id)?.ok_or_else(|| EngineError::NotFound {
        entity: "payroll",
        id: payroll_id.to_string(),
    })?;

    if payroll.status == status {
        return Ok(payroll);
    }

    let from = payroll.status;
    payroll.transition_to(status)?;
    store.update_payroll(&payroll)?;
    info!(payroll_id = %payroll.id, %from, to = %status, "Updated payroll status");
    Ok(payroll)
}
