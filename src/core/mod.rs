//! Core types for the task system

pub mod binder;
pub mod error;
pub mod priority;
pub mod result;

pub use binder::Binder;
pub use error::{Result, SchedulerError};
pub use priority::{Priority, PriorityJob};
pub use result::{ResultCell, TaskFuture, WaitStatus};
