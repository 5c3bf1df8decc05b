//! # prioritask
//!
//! A concurrent task scheduler with priority ageing, a fixed-size worker
//! pool and a caller-driven execution context.
//!
//! ## Features
//!
//! - **Priority ageing**: lower value = more urgent; every second a task
//!   waits boosts its effective priority by one, so nothing starves
//! - **Result futures**: every submission returns a [`TaskFuture`] carrying
//!   the task's value or its captured failure
//! - **Two execution contexts**: [`ThreadPool`] runs tasks on N dedicated
//!   threads; [`TaskContext`] drains the queue on whatever thread calls
//!   [`run`](TaskContext::run)
//! - **Deterministic shutdown**: graceful drain ([`ThreadPool::join`]),
//!   immediate abort ([`ThreadPool::stop`]), and drop-implied drain
//! - **Multilogger**: a mutex-serialised fan-out byte sink over any set of
//!   output targets
//!
//! ## Quick Start
//!
//! ```rust
//! use prioritask::prelude::*;
//!
//! # fn main() -> prioritask::Result<()> {
//! let mut pool = ThreadPool::with_threads(4)?;
//!
//! // Submit tasks; each returns a future for its result.
//! let mut total = post(&pool, || (1..=10).sum::<i32>())?;
//! assert_eq!(total.get()?, 55);
//!
//! // Urgent work jumps the queue.
//! let mut urgent = post_with_priority(&pool, Priority::HIGHEST, || "now")?;
//! assert_eq!(urgent.get()?, "now");
//!
//! pool.join()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Caller-driven execution
//!
//! ```rust
//! use prioritask::prelude::*;
//!
//! # fn main() -> prioritask::Result<()> {
//! let ctx = TaskContext::new();
//!
//! let mut a = post_with_priority(&ctx, Priority::LOW, || 1)?;
//! let mut b = post_with_priority(&ctx, Priority::HIGH, || 2)?;
//!
//! // Nothing runs until a thread lends itself to the context.
//! ctx.run();
//!
//! assert_eq!(a.get()? + b.get()?, 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Fan-out logging
//!
//! ```rust
//! use prioritask::Multilogger;
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! let log = Multilogger::new();
//!
//! let primary: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
//! let mirror: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
//! log.add(&primary);
//! log.add(&mirror);
//!
//! log.write(b"ready").unwrap();
//! assert_eq!(*primary.lock(), b"ready");
//! assert_eq!(*mirror.lock(), b"ready");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod exec;
pub mod multilogger;
pub mod prelude;

pub use core::{Binder, Priority, PriorityJob, Result, ResultCell, SchedulerError, TaskFuture, WaitStatus};
pub use exec::{
    post, post_with_priority, ExecutionContext, Executor, PoolConfig, Scheduler, TaskContext,
    ThreadPool,
};
pub use multilogger::{Multilogger, OutputTarget, WriteTarget};
