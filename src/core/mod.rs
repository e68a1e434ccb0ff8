//! Core pooling abstractions: the blocking queue, the pool, and its handles.

pub mod bounded_queue;
pub mod error;
pub mod factory;
pub mod handle;
pub mod resource_pool;
pub mod stats;

pub use bounded_queue::{timeout_from_secs, BlockingBoundedQueue};
pub use error::{AppResult, BoxError, GetError, PoolError, PutError};
pub use factory::{Resource, ResourceFactory};
pub use handle::ResourceHandle;
pub use resource_pool::ResourcePool;
pub use stats::PoolStats;
