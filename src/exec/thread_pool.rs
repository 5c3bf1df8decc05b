//! Fixed-size worker pool execution context

use crate::core::error::Result;
use crate::exec::scheduler::Scheduler;
use crate::exec::worker::Worker;
use crate::exec::{ExecutionContext, Executor};
use std::sync::Arc;

/// Configuration for a [`ThreadPool`]
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of executor threads, at least 1
    pub num_threads: usize,
    /// Thread name prefix
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            thread_name_prefix: "executor".to_string(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the given thread count
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is zero; a pool without threads can never
    /// execute anything, so this is treated as a programming error.
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        assert!(num_threads >= 1, "thread pool requires at least one thread");
        Self {
            num_threads,
            ..Default::default()
        }
    }

    /// Set the thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}

/// Execution context running tasks on a fixed number of threads
///
/// The pool spawns its threads at construction; each one parks in the
/// scheduler's executor loop until work arrives. Dropping the pool is
/// equivalent to [`join`](ThreadPool::join): queued tasks finish first.
///
/// # Example
///
/// ```rust
/// use prioritask::prelude::*;
///
/// # fn main() -> prioritask::Result<()> {
/// let mut pool = ThreadPool::with_threads(2)?;
///
/// let mut answer = post(&pool, || 6 * 7)?;
/// assert_eq!(answer.get()?, 42);
///
/// pool.join()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ThreadPool {
    scheduler: Arc<Scheduler>,
    workers: Vec<Worker>,
    config: PoolConfig,
}

impl ThreadPool {
    /// Create a pool with one thread per available CPU
    pub fn new() -> Result<Self> {
        Self::with_config(PoolConfig::default())
    }

    /// Create a pool with the given number of threads
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is zero.
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(PoolConfig::new(num_threads))
    }

    /// Create a pool from a configuration
    ///
    /// # Errors
    ///
    /// Returns a spawn error if an executor thread cannot be created; any
    /// threads spawned up to that point are stopped and joined first.
    ///
    /// # Panics
    ///
    /// Panics if the configuration asks for zero threads.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        assert!(
            config.num_threads >= 1,
            "thread pool requires at least one thread"
        );

        let scheduler = Arc::new(Scheduler::new());
        scheduler.allow_wait();

        let mut workers = Vec::with_capacity(config.num_threads);
        for id in 0..config.num_threads {
            match Worker::spawn(id, &config.thread_name_prefix, Arc::clone(&scheduler)) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    // Release the threads spawned so far before reporting.
                    scheduler.stop();
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(e);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!(workers = config.num_threads, "thread pool started");

        Ok(Self {
            scheduler,
            workers,
            config,
        })
    }

    /// Number of executor threads
    pub fn thread_count(&self) -> usize {
        self.config.num_threads
    }

    /// Number of tasks that have returned from execution, failed or not
    pub fn jobs_done(&self) -> u64 {
        self.scheduler.jobs_done()
    }

    /// Whether the pool has been stopped
    pub fn stopped(&self) -> bool {
        self.scheduler.stopped()
    }

    /// Stop the pool, discarding queued tasks
    ///
    /// Non-blocking. Tasks already executing run to completion; the futures
    /// of discarded tasks resolve to `Cancelled`. Call
    /// [`join`](ThreadPool::join) afterwards to wait for the executors.
    pub fn stop(&self) {
        self.scheduler.stop_now();
    }

    /// Finish all queued tasks, then join the executor threads
    ///
    /// Blocks until the queue is drained. After `join` the pool is inert:
    /// further submissions fail with `Stopped`. Idempotent.
    pub fn join(&mut self) -> Result<()> {
        self.scheduler.stop();

        for worker in self.workers.drain(..) {
            worker.join()?;
        }

        #[cfg(feature = "tracing")]
        tracing::info!(jobs_done = self.scheduler.jobs_done(), "thread pool joined");

        Ok(())
    }
}

impl ExecutionContext for ThreadPool {
    fn executor(&self) -> &dyn Executor {
        self.scheduler.as_ref()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            eprintln!(
                "thread pool '{}': failed to join during drop: {}",
                self.config.thread_name_prefix, e
            );
        }
    }
}
