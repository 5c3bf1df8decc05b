//! Convenient re-exports for common types and traits

pub use crate::core::{
    Binder, Priority, PriorityJob, Result, ResultCell, SchedulerError, TaskFuture, WaitStatus,
};
pub use crate::exec::{
    post, post_with_priority, ExecutionContext, Executor, PoolConfig, Scheduler, TaskContext,
    ThreadPool,
};
pub use crate::multilogger::{Multilogger, OutputTarget, WriteTarget};
