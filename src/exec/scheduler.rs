//! Priority scheduler: queue, flags and the executor loop
//!
//! The scheduler is passive. Any thread that calls [`run`](Scheduler::run)
//! becomes an executor and processes queued jobs until the control flags tell
//! it to leave. Two flags drive the state machine:
//!
//! | may_wait | stop  | queue     | action                      |
//! |----------|-------|-----------|-----------------------------|
//! | true     | false | empty     | block on the condvar        |
//! | true     | false | non-empty | pop, execute, repeat        |
//! | true     | true  | empty     | return                      |
//! | true     | true  | non-empty | pop, execute, repeat (drain)|
//! | false    | false | empty     | return                      |
//! | false    | false | non-empty | pop, execute, repeat        |
//! | false    | true  | any       | return                      |

use crate::core::binder::panic_message;
use crate::core::error::{Result, SchedulerError};
use crate::core::priority::PriorityJob;
use parking_lot::{Condvar, Mutex};
use std::collections::BinaryHeap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "tracing")]
use tracing::{debug, span, Level};

/// Queue and flags, guarded by the one scheduler mutex
#[derive(Debug)]
struct SchedState {
    queue: BinaryHeap<PriorityJob>,
    stop: bool,
    may_wait: bool,
}

/// Task executor with priority-ordered, age-boosted dispatch
///
/// Created in forbid-wait mode: a bare scheduler drains and returns, which is
/// what a caller-driven context needs. A worker pool flips
/// [`allow_wait`](Scheduler::allow_wait) before parking threads in
/// [`run`](Scheduler::run).
#[derive(Debug)]
pub struct Scheduler {
    state: Mutex<SchedState>,
    signal: Condvar,
    jobs_done: AtomicU64,
}

impl Scheduler {
    /// Create a scheduler with an empty queue, not stopped, forbid-wait
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SchedState {
                queue: BinaryHeap::new(),
                stop: false,
                may_wait: false,
            }),
            signal: Condvar::new(),
            jobs_done: AtomicU64::new(0),
        }
    }

    /// Enqueue a job and wake one waiting executor
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Stopped`] without enqueuing if the
    /// scheduler has been stopped.
    pub fn post(&self, job: PriorityJob) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.stop {
                return Err(SchedulerError::Stopped);
            }
            state.queue.push(job);
        }
        self.signal.notify_one();
        Ok(())
    }

    /// Whether the scheduler has been stopped
    pub fn stopped(&self) -> bool {
        self.state.lock().stop
    }

    /// Number of jobs that have returned from execution, failed or not
    pub fn jobs_done(&self) -> u64 {
        self.jobs_done.load(Ordering::Relaxed)
    }

    /// Number of jobs currently queued
    pub fn pending_jobs(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Stop accepting new jobs
    ///
    /// Executors in allow-wait mode drain the remaining queue before
    /// returning; executors in forbid-wait mode return immediately.
    pub fn stop(&self) {
        {
            let mut state = self.state.lock();
            state.stop = true;
        }
        self.signal.notify_all();
    }

    /// Stop accepting new jobs and discard everything queued
    ///
    /// Jobs already executing run to completion. The futures of discarded
    /// jobs resolve to [`SchedulerError::Cancelled`].
    pub fn stop_now(&self) {
        let discarded = {
            let mut state = self.state.lock();
            state.stop = true;
            std::mem::take(&mut state.queue)
        };
        self.signal.notify_all();
        // Dropping a job fires its cancellation path; that must happen
        // outside the scheduler mutex.
        drop(discarded);
    }

    /// Clear the stop flag so the scheduler accepts jobs again
    ///
    /// Precondition: no thread is inside [`run`](Scheduler::run). Restarting
    /// while executors are still draining leaves the state machine
    /// inconsistent.
    pub fn restart(&self) {
        self.state.lock().stop = false;
    }

    /// Let executors block on the condvar when the queue is empty
    pub fn allow_wait(&self) {
        self.state.lock().may_wait = true;
    }

    /// Make executors return instead of blocking on an empty queue
    pub fn forbid_wait(&self) {
        self.state.lock().may_wait = false;
        self.signal.notify_all();
    }

    /// Whether executors may block waiting for new jobs
    pub fn allowed_to_wait(&self) -> bool {
        self.state.lock().may_wait
    }

    /// Execute queued jobs on the calling thread
    ///
    /// Returns when the flag table says so: on [`stop`](Scheduler::stop) in
    /// forbid-wait mode, after the drain in allow-wait mode, or as soon as
    /// the queue is empty when waiting is forbidden. Jobs run with the
    /// scheduler mutex released; a panicking job is contained and counted.
    pub fn run(&self) {
        #[cfg(feature = "tracing")]
        let executor_span = span!(Level::DEBUG, "executor");
        #[cfg(feature = "tracing")]
        let _guard = executor_span.enter();

        loop {
            let job = {
                let mut state = self.state.lock();
                loop {
                    if state.stop && !state.may_wait {
                        return;
                    }
                    if let Some(job) = state.queue.pop() {
                        break job;
                    }
                    if state.stop || !state.may_wait {
                        return;
                    }
                    // Re-check the predicate on every wake; spurious
                    // wake-ups fall through to another iteration.
                    self.signal.wait(&mut state);
                }
            };

            #[cfg(feature = "tracing")]
            debug!(priority = job.priority().value(), "job picked up");

            if let Err(payload) = catch_unwind(AssertUnwindSafe(move || job.invoke())) {
                let message = panic_message(payload.as_ref());
                #[cfg(feature = "tracing")]
                tracing::error!(panic_message = %message, "job panicked");
                #[cfg(not(feature = "tracing"))]
                eprintln!("executor: job panicked: {}", message);
            }

            self.jobs_done.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binder::Binder;
    use crate::core::priority::Priority;
    use crate::core::result::ResultCell;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn counting_job(prio: Priority, counter: &Arc<AtomicUsize>) -> PriorityJob {
        let counter = Arc::clone(counter);
        PriorityJob::new(prio, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_run_drains_and_returns_when_forbid_wait() {
        let sched = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            sched.post(counting_job(Priority::MEDIUM, &counter)).unwrap();
        }
        sched.run();

        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert_eq!(sched.jobs_done(), 5);
        assert_eq!(sched.pending_jobs(), 0);
    }

    #[test]
    fn test_post_after_stop_is_rejected() {
        let sched = Scheduler::new();
        assert!(!sched.stopped());

        sched.stop();
        assert!(sched.stopped());

        let result = sched.post(PriorityJob::new(Priority::MEDIUM, || {}));
        assert!(matches!(result, Err(SchedulerError::Stopped)));
    }

    #[test]
    fn test_restart_accepts_jobs_again() {
        let sched = Scheduler::new();
        sched.stop();
        sched.restart();
        assert!(!sched.stopped());

        sched.post(PriorityJob::new(Priority::MEDIUM, || {})).unwrap();
        sched.run();
        assert_eq!(sched.jobs_done(), 1);
    }

    #[test]
    fn test_stop_now_discards_queue_and_cancels_futures() {
        let sched = Scheduler::new();

        let (cell, mut future) = ResultCell::channel();
        let binder = Binder::new(|| 5, cell);
        sched
            .post(PriorityJob::new(Priority::MEDIUM, move || binder.invoke()))
            .unwrap();

        sched.stop_now();

        assert_eq!(sched.pending_jobs(), 0);
        assert!(matches!(future.get(), Err(SchedulerError::Cancelled)));
    }

    #[test]
    fn test_stop_with_forbid_wait_leaves_queue_untouched() {
        let sched = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        sched.post(counting_job(Priority::MEDIUM, &counter)).unwrap();

        sched.stop();
        sched.run();

        // Abort mode: run returns without popping.
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(sched.pending_jobs(), 1);
    }

    #[test]
    fn test_graceful_drain_with_waiting_executor() {
        let sched = Arc::new(Scheduler::new());
        sched.allow_wait();

        let worker = {
            let sched = Arc::clone(&sched);
            thread::spawn(move || sched.run())
        };

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            sched.post(counting_job(Priority::MEDIUM, &counter)).unwrap();
        }

        // stop() in allow-wait mode drains before the executor exits.
        sched.stop();
        worker.join().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 8);
        assert_eq!(sched.jobs_done(), 8);
    }

    #[test]
    fn test_forbid_wait_releases_blocked_executor() {
        let sched = Arc::new(Scheduler::new());
        assert!(!sched.allowed_to_wait());
        sched.allow_wait();
        assert!(sched.allowed_to_wait());

        let worker = {
            let sched = Arc::clone(&sched);
            thread::spawn(move || sched.run())
        };

        // Let the executor park on the empty queue, then release it.
        thread::sleep(Duration::from_millis(50));
        sched.forbid_wait();
        worker.join().unwrap();

        assert_eq!(sched.jobs_done(), 0);
    }

    #[test]
    fn test_panicking_job_is_contained_and_counted() {
        let sched = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        sched
            .post(PriorityJob::new(Priority::MEDIUM, || {
                panic!("intentional panic for testing");
            }))
            .unwrap();
        sched.post(counting_job(Priority::MEDIUM, &counter)).unwrap();

        sched.run();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(sched.jobs_done(), 2);
    }

    #[test]
    fn test_jobs_done_is_monotonic() {
        let sched = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let mut seen = 0;
        for round in 1..=4 {
            sched.post(counting_job(Priority::MEDIUM, &counter)).unwrap();
            sched.run();

            let now = sched.jobs_done();
            assert!(now >= seen);
            assert_eq!(now, round);
            seen = now;
        }
    }

    #[test]
    fn test_priority_order_on_single_drain() {
        let sched = Scheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for prio in [
            Priority::LOWEST,
            Priority::MEDIUM,
            Priority::LOW,
            Priority::HIGHEST,
            Priority::HIGH,
        ] {
            let order = Arc::clone(&order);
            sched
                .post(PriorityJob::new(prio, move || order.lock().push(prio)))
                .unwrap();
        }

        sched.run();

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
}
