//! Coupling of a user callable to its result cell
//!
//! A [`Binder`] owns the callable and the producer half of the result slot.
//! Invoking it runs the callable behind a panic guard and drives the cell
//! exactly once; dropping it un-invoked releases the cell, resolving the
//! paired future to `Cancelled`.

use crate::core::error::SchedulerError;
use crate::core::result::ResultCell;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One-shot bridge between a callable and a [`ResultCell`]
///
/// Consuming `self` in [`invoke`](Binder::invoke) makes double execution
/// unrepresentable; callers that need to re-run a task must submit it again.
pub struct Binder<F, T>
where
    F: FnOnce() -> T,
{
    task: F,
    cell: ResultCell<T>,
}

impl<F, T> Binder<F, T>
where
    F: FnOnce() -> T,
{
    /// Bind a callable to the producer half of a result slot
    pub fn new(task: F, cell: ResultCell<T>) -> Self {
        Self { task, cell }
    }

    /// Run the callable and publish its outcome
    ///
    /// A panic in the callable is captured into the cell as
    /// [`SchedulerError::TaskFailed`] and does not propagate to the caller.
    pub fn invoke(self) {
        let Binder { task, cell } = self;

        match catch_unwind(AssertUnwindSafe(task)) {
            Ok(value) => cell.set_value(value),
            Err(payload) => {
                cell.set_error(SchedulerError::task_failed(panic_message(payload.as_ref())))
            }
        }
    }
}
