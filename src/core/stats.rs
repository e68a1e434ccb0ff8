//! Pool utilization statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time view of a resource pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Baseline pool size (also the idle queue capacity).
    pub target_size: usize,
    /// Extra resources allowed beyond `target_size`, `-1` when unlimited.
    pub max_overflow: i64,
    /// Current overflow counter (`live handles - target_size`).
    pub overflow: i64,
    /// Handles waiting in the idle queue.
    pub idle: usize,
    /// Handles currently held by callers.
    pub checked_out: u64,
    /// Total handles created.
    pub created: u64,
    /// Total checkouts served from the idle queue.
    pub reused: u64,
    /// Total handles discarded on checkin because the idle queue was full.
    pub discarded: u64,
    /// Total checkouts that failed with `PoolExhausted`.
    pub exhausted: u64,
    /// Total factory failures.
    pub create_failures: u64,
}

/// Internal counters for pool statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub checked_out: AtomicU64,
    pub created: AtomicU64,
    pub reused: AtomicU64,
    pub discarded: AtomicU64,
    pub exhausted: AtomicU64,
    pub create_failures: AtomicU64,
}

impl PoolCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn settle(counter: &AtomicU64) {
        // Saturating: a handle released after dispose must not wrap the gauge.
        let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self, target_size: usize, max_overflow: i64, overflow: i64, idle: usize) -> PoolStats {
        PoolStats {
            target_size,
            max_overflow,
            overflow,
            idle,
            checked_out: self.checked_out.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            create_failures: self.create_failures.load(Ordering::Relaxed),
        }
    }
}
