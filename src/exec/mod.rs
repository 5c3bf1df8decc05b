//! Execution contexts and task submission
//!
//! An [`Executor`] is the minimal submit-or-refuse capability; an
//! [`ExecutionContext`] is a named holder of one executor plus its lifecycle
//! controls. [`post`] and [`post_with_priority`] submit a callable to any
//! context and hand back a [`TaskFuture`] for its result.

pub mod scheduler;
pub mod task_context;
pub mod thread_pool;
mod worker;

pub use scheduler::Scheduler;
pub use task_context::TaskContext;
pub use thread_pool::{PoolConfig, ThreadPool};

use crate::core::binder::Binder;
use crate::core::error::{Result, SchedulerError};
use crate::core::priority::{Priority, PriorityJob};
use crate::core::result::{ResultCell, TaskFuture};

/// Minimal task-submission capability
///
/// Implemented by [`Scheduler`]; execution contexts expose exactly one
/// executor. Dynamic dispatch happens only at this boundary, never inside
/// the executor loop.
pub trait Executor {
    /// Hand a job to the executor
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Stopped`] if the executor no longer
    /// accepts work; the job is not enqueued.
    fn post(&self, job: PriorityJob) -> Result<()>;

    /// Whether the executor has been stopped
    fn stopped(&self) -> bool;
}

impl Executor for Scheduler {
    fn post(&self, job: PriorityJob) -> Result<()> {
        Scheduler::post(self, job)
    }

    fn stopped(&self) -> bool {
        Scheduler::stopped(self)
    }
}

/// A holder of one executor
pub trait ExecutionContext {
    /// The executor tasks are submitted to
    fn executor(&self) -> &dyn Executor;
}

/// Submit a callable at medium priority
///
/// See [`post_with_priority`].
pub fn post<C, F, T>(context: &C, task: F) -> Result<TaskFuture<T>>
where
    C: ExecutionContext + ?Sized,
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    post_with_priority(context, Priority::MEDIUM, task)
}

/// Submit a callable to an execution context
///
/// Builds the result slot, binds it to the callable and enqueues the pair as
/// one job. Submission never blocks beyond the scheduler mutex.
///
/// # Errors
///
/// Returns [`SchedulerError::Stopped`] if the context's executor is stopped;
/// nothing is enqueued and no future is produced.
pub fn post_with_priority<C, F, T>(
    context: &C,
    prio: Priority,
    task: F,
) -> Result<TaskFuture<T>>
where
    C: ExecutionContext + ?Sized,
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let executor = context.executor();
    if executor.stopped() {
        return Err(SchedulerError::Stopped);
    }

    let (cell, future) = ResultCell::channel();
    let binder = Binder::new(task, cell);
    executor.post(PriorityJob::new(prio, move || binder.invoke()))?;

    Ok(future)
}
