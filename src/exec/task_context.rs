//! Caller-driven execution context

use crate::exec::scheduler::Scheduler;
use crate::exec::{ExecutionContext, Executor};

/// Execution context driven by the caller's own threads
///
/// Owns a scheduler in forbid-wait mode: a call to
/// [`run`](TaskContext::run) executes everything currently queued and
/// returns as soon as the queue is empty, never blocking for new work.
/// Several threads may call `run` at once to drain in parallel; the
/// scheduler mutex serialises the pops.
///
/// # Example
///
/// ```rust
/// use prioritask::prelude::*;
///
/// # fn main() -> prioritask::Result<()> {
/// let ctx = TaskContext::new();
///
/// let mut future = post_with_priority(&ctx, Priority::HIGH, || "ran")?;
/// ctx.run();
///
/// assert_eq!(future.get()?, "ran");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TaskContext {
    scheduler: Scheduler,
}

impl TaskContext {
    /// Create an empty context, ready to accept tasks
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
        }
    }

    /// Execute queued tasks on the calling thread until none remain
    ///
    /// Returns immediately if the context is stopped.
    pub fn run(&self) {
        self.scheduler.run();
    }

    /// Whether the context has been stopped
    pub fn stopped(&self) -> bool {
        self.scheduler.stopped()
    }

    /// Stop the context, discarding queued tasks
    ///
    /// Tasks currently executing inside a `run` call finish; queued tasks
    /// lose their turn and their futures resolve to `Cancelled`.
    pub fn stop(&self) {
        self.scheduler.stop_now();
    }

    /// Accept tasks again after a stop
    ///
    /// Precondition: no thread is currently inside [`run`](TaskContext::run).
    pub fn restart(&self) {
        self.scheduler.restart();
    }
}

impl ExecutionContext for TaskContext {
    fn executor(&self) -> &dyn Executor {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SchedulerError;
    use crate::core::priority::Priority;
    use crate::exec::{post, post_with_priority};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_context_is_not_stopped() {
        let ctx = TaskContext::new();
        assert!(!ctx.stopped());
    }

    #[test]
    fn test_stop_and_restart() {
        let ctx = TaskContext::new();

        ctx.stop();
        assert!(ctx.stopped());

        ctx.restart();
        assert!(!ctx.stopped());
    }

    #[test]
    fn test_run_on_empty_queue_returns() {
        let ctx = TaskContext::new();
        ctx.run();
    }

    #[test]
    fn test_drains_in_priority_order() {
        let ctx = TaskContext::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for prio in [
            Priority::LOWEST,
            Priority::MEDIUM,
            Priority::LOW,
            Priority::HIGHEST,
            Priority::HIGH,
        ] {
            let order = Arc::clone(&order);
            post_with_priority(&ctx, prio, move || order.lock().push(prio)).unwrap();
        }

        ctx.run();

        assert_eq!(
            *order.lock(),
            vec![
                Priority::HIGHEST,
                Priority::HIGH,
                Priority::MEDIUM,
                Priority::LOW,
                Priority::LOWEST,
            ]
        );
    }

    #[test]
    fn test_stop_cancels_pending_futures() {
        let ctx = TaskContext::new();
        let mut future = post(&ctx, || 3).unwrap();

        ctx.stop();

        assert!(matches!(future.get(), Err(SchedulerError::Cancelled)));
    }

    #[test]
    fn test_parallel_drain_runs_each_task_once() {
        let ctx = Arc::new(TaskContext::new());
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..200 {
            let counter = Arc::clone(&counter);
            post(ctx.as_ref(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        let drainers: Vec<_> = (0..4)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                thread::spawn(move || ctx.run())
            })
            .collect();
        for handle in drainers {
            handle.join().unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn test_restart_after_stop_runs_new_tasks() {
        let ctx = TaskContext::new();
        ctx.stop();
        ctx.restart();

        let mut future = post(&ctx, || 11).unwrap();
        ctx.run();

        assert_eq!(future.get().unwrap(), 11);
    }
}
