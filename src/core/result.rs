//! One-shot result transport between a task and its submitter
//!
//! A [`ResultCell`] / [`TaskFuture`] pair wraps the two ends of a one-shot
//! channel. The cell is written exactly once, by value or by error, and the
//! future hands that outcome to the submitter. Dropping an unfired cell
//! resolves the future to [`SchedulerError::Cancelled`], which is how
//! abandoned queue entries release their waiters.

use crate::core::error::{Result, SchedulerError};
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Outcome of [`TaskFuture::wait_for`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// The result is available; `get` will not block
    Ready,
    /// The timeout elapsed before the task produced a result
    Timeout,
}

/// Producer half of a one-shot result slot
///
/// Both setters consume the cell, so a second write is rejected at compile
/// time. The consumer side is the [`TaskFuture`] created alongside it.
pub struct ResultCell<T> {
    tx: Sender<Result<T>>,
}

impl<T> ResultCell<T> {
    /// Create a connected cell/future pair
    pub fn channel() -> (ResultCell<T>, TaskFuture<T>) {
        let (tx, rx) = bounded(1);
        (
            ResultCell { tx },
            TaskFuture {
                rx,
                buffered: None,
                taken: false,
            },
        )
    }

    /// Fulfil the cell with the task's value and wake the waiter
    pub fn set_value(self, value: T) {
        // A send failure means the submitter dropped the future; the result
        // has no observer and is discarded.
        let _ = self.tx.send(Ok(value));
    }

    /// Fulfil the cell with the task's error and wake the waiter
    pub fn set_error(self, error: SchedulerError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Consumer handle for a submitted task's result
///
/// One-shot: the first [`get`](TaskFuture::get) moves the value (or error)
/// out; a second call fails with [`SchedulerError::ResultAlreadyTaken`].
pub struct TaskFuture<T> {
    rx: Receiver<Result<T>>,
    buffered: Option<Result<T>>,
    taken: bool,
}

impl<T> TaskFuture<T> {
    /// Block until the task finishes and return its value
    ///
    /// # Errors
    ///
    /// - the task's own error ([`SchedulerError::TaskFailed`])
    /// - [`SchedulerError::Cancelled`] if the task was dropped unrun
    /// - [`SchedulerError::ResultAlreadyTaken`] on a second call
    pub fn get(&mut self) -> Result<T> {
        if self.taken {
            return Err(SchedulerError::ResultAlreadyTaken);
        }
        self.taken = true;

        if let Some(outcome) = self.buffered.take() {
            return outcome;
        }
        match self.rx.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(SchedulerError::Cancelled),
        }
    }

    /// Wait up to `timeout` for the result to become available
    ///
    /// On [`WaitStatus::Ready`] the outcome is retained and a subsequent
    /// [`get`](TaskFuture::get) returns it without blocking.
    pub fn wait_for(&mut self, timeout: Duration) -> WaitStatus {
        if self.taken || self.buffered.is_some() {
            return WaitStatus::Ready;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.buffered = Some(outcome);
                WaitStatus::Ready
            }
            Err(RecvTimeoutError::Timeout) => WaitStatus::Timeout,
            Err(RecvTimeoutError::Disconnected) => {
                self.buffered = Some(Err(SchedulerError::Cancelled));
                WaitStatus::Ready
            }
        }
    }
}
