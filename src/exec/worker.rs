//! Executor thread handle owned by the pool

use crate::core::error::{Result, SchedulerError};
use crate::exec::scheduler::Scheduler;
use std::sync::Arc;
use std::thread;

/// A named OS thread parked in the scheduler's executor loop
///
/// The thread exits when [`Scheduler::run`] returns; the pool decides when
/// that happens via the scheduler's flags.
#[derive(Debug)]
pub(crate) struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawn a worker thread entering the scheduler's loop
    pub(crate) fn spawn(id: usize, name_prefix: &str, scheduler: Arc<Scheduler>) -> Result<Self> {
        let thread = thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || scheduler.run())
            .map_err(|e| SchedulerError::spawn(id, e))?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }

    /// Join the worker thread
    pub(crate) fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| SchedulerError::join(self.id, "worker thread panicked"))?;
        }
        Ok(())
    }
}
