//! Error types for pool and queue operations.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Boxed error produced by a resource factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced to callers of the resource pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// An argument was out of range (e.g. a negative timeout).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No idle resource became available and no overflow capacity remained.
    #[error("pool exhausted after waiting {waited:?}")]
    PoolExhausted {
        /// Time spent waiting before giving up.
        waited: Duration,
    },
    /// The resource factory failed to create a resource.
    #[error("create connection failed: {source}")]
    ConnectionCreateFailed {
        /// Failure reported by the factory.
        #[source]
        source: BoxError,
    },
    /// The owning pool has been dropped.
    #[error("pool has been shut down")]
    PoolShutdown,
    /// Internal error (blocking task panicked or was cancelled).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

/// Failure of [`BlockingBoundedQueue::put`](crate::core::BlockingBoundedQueue::put).
///
/// The rejected item is handed back so the caller can dispose of it.
#[derive(PartialEq, Eq)]
pub enum PutError<T> {
    /// The queue was at capacity and the caller did not want to wait.
    Full(T),
    /// No slot freed up before the deadline.
    TimedOut(T),
}

impl<T> PutError<T> {
    /// Recover the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(item) | Self::TimedOut(item) => item,
        }
    }

    /// Whether the failure came from an expired wait.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::TimedOut(_) => f.write_str("TimedOut(..)"),
        }
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => write!(f, "queue is full"),
            Self::TimedOut(_) => write!(f, "timed out waiting for a free slot"),
        }
    }
}

impl<T> std::error::Error for PutError<T> {}

/// Failure of [`BlockingBoundedQueue::get`](crate::core::BlockingBoundedQueue::get).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GetError {
    /// The queue was empty and the caller did not want to wait.
    #[error("queue is empty")]
    Empty,
    /// No item arrived before the deadline.
    #[error("timed out waiting for an item")]
    TimedOut,
    /// The wait was cut short by
    /// [`interrupt_getters`](crate::core::BlockingBoundedQueue::interrupt_getters).
    #[error("interrupted while waiting for an item")]
    Interrupted,
}
