//! Configuration models for pools and timeouts.

pub mod pool;

pub use pool::{PoolConfig, PoolsConfig};
