//! # Prometheus Resource Pool
//!
//! A bounded, thread-safe pool of reusable resources (network or database
//! connections) created lazily on demand, with overflow capacity beyond a target
//! size and blocking/timeout semantics for callers when the pool is exhausted.
//!
//! ## Components
//!
//! - **`BlockingBoundedQueue`**: FIFO with a maximum capacity and blocking,
//!   non-blocking, and timed put/get. One mutex, two condition variables.
//! - **`ResourcePool`**: owns the idle queue, the resource factory, and an
//!   overflow counter guarded by its own lock. Implements checkout/checkin.
//! - **`ResourceHandle`**: exclusive proxy for one resource. Connects lazily,
//!   and returns itself to the pool on close or drop.
//!
//! ## Overflow accounting
//!
//! The overflow counter starts at `-target_size` and tracks
//! `live handles - target_size`. New resources are created while it is below
//! `max_overflow` (`-1` = unlimited); past that, a checkout waits up to the pool
//! timeout for a handle to be checked in and fails with `PoolExhausted` otherwise.
//! The idle queue holds at most `target_size` handles; extra handles checked in
//! are closed and their overflow slot released.
//!
//! ```rust
//! use prometheus_resource_pool::config::PoolConfig;
//! use prometheus_resource_pool::core::{PoolError, Resource, ResourcePool};
//!
//! struct Conn {
//!     queries: u32,
//! }
//! impl Resource for Conn {}
//!
//! let cfg = PoolConfig::new().with_target_size(2).with_max_overflow(1).with_timeout_secs(0.1);
//! let pool = ResourcePool::from_config(|| Ok::<_, std::io::Error>(Conn { queries: 0 }), &cfg)?;
//!
//! let mut a = pool.checkout()?;
//! a.resource()?.queries += 1;
//! let _b = pool.checkout()?;
//! let _c = pool.checkout()?;
//!
//! // target_size + max_overflow handles are out
//! assert!(matches!(pool.try_checkout(), Err(PoolError::PoolExhausted { .. })));
//!
//! a.close();
//! assert_eq!(pool.checkout()?.resource()?.queries, 1);
//! # Ok::<(), PoolError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core pooling abstractions: queue, pool, handles, errors.
pub mod core;
/// Configuration models for pools and timeouts.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Shared utilities.
pub mod util;

pub use crate::core::{
    BlockingBoundedQueue, PoolError, PoolStats, Resource, ResourceFactory, ResourceHandle,
    ResourcePool,
};
pub use crate::config::PoolConfig;
