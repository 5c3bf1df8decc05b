//! Error types for the task system

/// Result type for task system operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors that can occur in the task system
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchedulerError {
    /// Submission was rejected because the executor is stopped
    #[error("executor is stopped and no longer accepts tasks")]
    Stopped,

    /// The task was dropped from the queue before it could run
    #[error("task was cancelled before execution")]
    Cancelled,

    /// The task panicked while running; the panic payload is preserved
    #[error("task failed: {message}")]
    TaskFailed {
        /// Text extracted from the panic payload
        message: String,
    },

    /// The result of this future has already been retrieved
    #[error("task result has already been taken")]
    ResultAlreadyTaken,

    /// A registered output target no longer satisfies the target contract
    #[error("registered output target is no longer valid")]
    BadOutputTarget,

    /// Failed to spawn an executor thread
    #[error("failed to spawn executor thread #{worker}")]
    Spawn {
        /// Index of the thread that failed to spawn
        worker: usize,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },

    /// Failed to join an executor thread
    #[error("failed to join executor thread #{worker}: {message}")]
    Join {
        /// Index of the thread that failed to join
        worker: usize,
        /// Error message
        message: String,
    },
}

impl SchedulerError {
    /// Create a task failure error from a panic payload text
    pub fn task_failed(message: impl Into<String>) -> Self {
        SchedulerError::TaskFailed {
            message: message.into(),
        }
    }

    /// Create a spawn error
    pub fn spawn(worker: usize, source: std::io::Error) -> Self {
        SchedulerError::Spawn { worker, source }
    }

    /// Create a join error
    pub fn join(worker: usize, message: impl Into<String>) -> Self {
        SchedulerError::Join {
            worker,
            message: message.into(),
        }
    }
}
