//! Resource pool with lazy creation and overflow admission control.
//!
//! The pool keeps idle handles in a [`BlockingBoundedQueue`] whose capacity is
//! `target_size`, and tracks how many handles exist through a signed overflow
//! counter initialised to `-target_size`. A checkout prefers an idle handle,
//! creates a new one while overflow capacity remains, and otherwise waits for a
//! handle to be checked in or for overflow capacity to be released.
//!
//! The idle queue mutex and the overflow lock are never held at the same time:
//! reservation happens only after the queue operation has returned. A release
//! that leaves a saturated pool interrupts blocked checkouts so they can
//! reserve the freed slot.
//!
//! ```
//! use prometheus_resource_pool::core::{Resource, ResourcePool};
//! use std::time::Duration;
//!
//! struct Conn;
//! impl Resource for Conn {}
//!
//! let pool = ResourcePool::new(|| Ok::<_, std::io::Error>(Conn), 1, Duration::from_secs(1), 0)?;
//! let handle = pool.checkout()?;
//! let id = handle.id();
//! handle.close();
//!
//! // the same handle comes back
//! assert_eq!(pool.checkout()?.id(), id);
//! # Ok::<(), prometheus_resource_pool::core::PoolError>(())
//! ```

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PoolConfig;
use crate::core::handle::ResourceHandle;
use crate::core::stats::{PoolCounters, PoolStats};
use crate::core::{BlockingBoundedQueue, GetError, PoolError, Resource, ResourceFactory};

/// Upper bound on reservation races a checkout may lose before giving up.
const MAX_LOST_RACES: u32 = 64;

/// One pooled handle as stored in the idle queue.
pub(crate) struct Slot<R> {
    pub id: Uuid,
    pub resource: Option<R>,
}

impl<R> Slot<R> {
    fn fresh() -> Self {
        Self {
            id: Uuid::new_v4(),
            resource: None,
        }
    }
}

/// State shared between the pool and every handle it hands out.
pub(crate) struct PoolShared<F: ResourceFactory> {
    factory: F,
    idle: BlockingBoundedQueue<Slot<F::Resource>>,
    target_size: usize,
    max_overflow: i64,
    /// `live handles - target_size`, guarded separately from the idle queue.
    overflow: Mutex<i64>,
    timeout: Duration,
    counters: PoolCounters,
}

impl<F: ResourceFactory> PoolShared<F> {
    const fn overflow_enabled(&self) -> bool {
        self.max_overflow > -1
    }

    fn overflow(&self) -> i64 {
        *self.overflow.lock()
    }

    fn saturated(&self) -> bool {
        self.overflow_enabled() && self.overflow() >= self.max_overflow
    }

    fn reserve_overflow(&self) -> bool {
        let mut overflow = self.overflow.lock();
        if self.overflow_enabled() && *overflow >= self.max_overflow {
            return false;
        }
        *overflow += 1;
        true
    }

    fn release_overflow(&self) {
        let was_saturated = {
            let mut overflow = self.overflow.lock();
            let was_saturated = self.overflow_enabled() && *overflow >= self.max_overflow;
            *overflow -= 1;
            was_saturated
        };
        if was_saturated {
            self.idle.interrupt_getters();
        }
    }

    /// Pop an idle slot or reserve room for a new one.
    ///
    /// The wait bound is turned into one deadline up front; every blocking
    /// pass waits against that same deadline.
    fn acquire(&self, timeout: Option<Duration>) -> Result<Slot<F::Resource>, PoolError> {
        let started = Instant::now();
        let deadline = timeout.and_then(|t| started.checked_add(t));
        let mut races = 0;
        loop {
            // Read before the saturation check so a release in between still interrupts.
            let seen = self.idle.interrupts();
            // Only wait on the queue once nothing new may be created.
            let popped = if self.saturated() {
                self.idle.get_until(deadline, seen)
            } else {
                self.idle.get_nowait()
            };
            let interrupted = match popped {
                Ok(slot) => {
                    PoolCounters::bump(&self.counters.reused);
                    debug!(handle = %slot.id, races, "reusing idle resource");
                    return Ok(slot);
                }
                Err(GetError::TimedOut) => return Err(self.exhausted(started)),
                Err(GetError::Interrupted) => {
                    debug!(races, "overflow released while waiting");
                    true
                }
                Err(GetError::Empty) => false,
            };

            if self.reserve_overflow() {
                let slot = Slot::fresh();
                debug!(handle = %slot.id, races, "reserved overflow slot");
                return Ok(slot);
            }
            // Passes woken by a release are not capped.
            if !interrupted {
                races += 1;
                if races >= MAX_LOST_RACES {
                    return Err(self.exhausted(started));
                }
            }
            thread::yield_now();
        }
    }

    fn exhausted(&self, started: Instant) -> PoolError {
        PoolCounters::bump(&self.counters.exhausted);
        let waited = started.elapsed();
        warn!(
            overflow = self.overflow(),
            max_overflow = self.max_overflow,
            ?waited,
            "pool exhausted"
        );
        PoolError::PoolExhausted { waited }
    }

    pub(crate) fn create_resource(&self, id: Uuid) -> Result<F::Resource, PoolError> {
        match self.factory.create() {
            Ok(resource) => {
                PoolCounters::bump(&self.counters.created);
                info!(handle = %id, "created resource");
                Ok(resource)
            }
            Err(source) => {
                PoolCounters::bump(&self.counters.create_failures);
                warn!(handle = %id, error = %source, "resource factory failed");
                Err(PoolError::ConnectionCreateFailed { source })
            }
        }
    }

    /// Return a checked-out slot to the idle queue, discarding it when full.
    pub(crate) fn checkin(&self, slot: Slot<F::Resource>) {
        PoolCounters::settle(&self.counters.checked_out);
        let id = slot.id;
        match self.idle.put_nowait(slot) {
            Ok(()) => debug!(handle = %id, "checked in"),
            Err(rejected) => {
                PoolCounters::bump(&self.counters.discarded);
                debug!(handle = %id, "idle queue full, discarding");
                self.dispose_slot(rejected.into_inner());
            }
        }
    }

    /// Close the slot's resource and give its overflow slot back.
    pub(crate) fn dispose_slot(&self, slot: Slot<F::Resource>) {
        close_quietly(slot.id, slot.resource);
        self.release_overflow();
    }
}

impl<F: ResourceFactory> Drop for PoolShared<F> {
    fn drop(&mut self) {
        for slot in self.idle.drain() {
            close_quietly(slot.id, slot.resource);
        }
    }
}

/// Best-effort close; failures are logged, never propagated.
pub(crate) fn close_quietly<R: Resource>(id: Uuid, resource: Option<R>) {
    if let Some(resource) = resource {
        if let Err(err) = resource.close() {
            warn!(handle = %id, error = %err, "failed to close resource");
        }
    }
}

/// Bounded, thread-safe pool of lazily created resources.
///
/// Cloning is cheap; clones share the same idle queue and overflow counter.
pub struct ResourcePool<F: ResourceFactory> {
    shared: Arc<PoolShared<F>>,
}

impl<F: ResourceFactory> Clone for ResourcePool<F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<F: ResourceFactory> ResourcePool<F> {
    /// Create a pool.
    ///
    /// * `target_size` - baseline size; idle handles beyond it are discarded on checkin
    /// * `timeout` - how long [`checkout`](Self::checkout) waits once overflow is saturated
    /// * `max_overflow` - handles allowed beyond `target_size`, `-1` for unlimited
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] when `max_overflow < -1` or
    /// `target_size` does not fit the overflow counter.
    pub fn new(
        factory: F,
        target_size: usize,
        timeout: Duration,
        max_overflow: i64,
    ) -> Result<Self, PoolError> {
        if max_overflow < -1 {
            return Err(PoolError::InvalidConfig(format!(
                "max_overflow must be -1 (unlimited) or non-negative, got {max_overflow}"
            )));
        }
        let baseline = i64::try_from(target_size)
            .map_err(|_| PoolError::InvalidConfig(format!("target_size {target_size} too large")))?;

        debug!(target_size, max_overflow, ?timeout, "creating resource pool");
        Ok(Self {
            shared: Arc::new(PoolShared {
                factory,
                idle: BlockingBoundedQueue::new(target_size),
                target_size,
                max_overflow,
                overflow: Mutex::new(-baseline),
                timeout,
                counters: PoolCounters::default(),
            }),
        })
    }

    /// Create a pool from validated configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolConfig::validate`] failures.
    pub fn from_config(factory: F, config: &PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Self::new(factory, config.target_size, config.timeout()?, config.max_overflow)
    }

    /// Check out a resource, waiting up to the pool timeout when overflow is saturated.
    ///
    /// # Errors
    ///
    /// [`PoolError::PoolExhausted`] when nothing became available in time,
    /// [`PoolError::ConnectionCreateFailed`] when the factory failed.
    pub fn checkout(&self) -> Result<ResourceHandle<F>, PoolError> {
        self.checkout_timeout(Some(self.shared.timeout))
    }

    /// Check out a resource without ever waiting.
    ///
    /// # Errors
    ///
    /// See [`checkout`](Self::checkout).
    pub fn try_checkout(&self) -> Result<ResourceHandle<F>, PoolError> {
        self.checkout_timeout(Some(Duration::ZERO))
    }

    /// Check out a resource with an explicit wait bound (`None` waits until a
    /// handle is checked in or overflow capacity is released).
    ///
    /// # Errors
    ///
    /// See [`checkout`](Self::checkout).
    pub fn checkout_timeout(&self, timeout: Option<Duration>) -> Result<ResourceHandle<F>, PoolError> {
        let slot = self.shared.acquire(timeout)?;
        let mut handle = ResourceHandle::new(slot, Arc::downgrade(&self.shared));
        if let Err(err) = handle.connect() {
            handle.abandon(&self.shared);
            return Err(err);
        }
        PoolCounters::bump(&self.shared.counters.checked_out);
        debug!(handle = %handle.id(), "checked out");
        Ok(handle)
    }

    /// Check out a resource from async code without blocking the runtime.
    ///
    /// # Errors
    ///
    /// See [`checkout`](Self::checkout); [`PoolError::Internal`] if the
    /// blocking task could not complete.
    #[cfg(feature = "tokio-runtime")]
    pub async fn checkout_async(&self) -> Result<ResourceHandle<F>, PoolError> {
        let pool = self.clone();
        tokio::task::spawn_blocking(move || pool.checkout())
            .await
            .map_err(|e| PoolError::Internal(format!("checkout task failed: {e}")))?
    }

    /// Return a handle to the pool. Same as [`ResourceHandle::close`].
    pub fn checkin(&self, handle: ResourceHandle<F>) {
        handle.close();
    }

    /// Close every idle resource and release its overflow slot.
    ///
    /// Checked-out handles are unaffected and may still be checked in later.
    /// Returns the number of resources disposed.
    pub fn dispose(&self) -> usize {
        let idle = self.shared.idle.drain();
        let count = idle.len();
        for slot in idle {
            self.shared.dispose_slot(slot);
        }
        info!(count, "disposed idle resources");
        count
    }

    /// Current overflow counter (`live handles - target_size`).
    pub fn overflow(&self) -> i64 {
        self.shared.overflow()
    }

    /// Number of idle handles. Advisory under concurrent use.
    pub fn idle_count(&self) -> usize {
        self.shared.idle.size()
    }

    /// Number of handles currently checked out.
    pub fn checked_out(&self) -> u64 {
        self.stats().checked_out
    }

    /// Baseline pool size.
    pub fn target_size(&self) -> usize {
        self.shared.target_size
    }

    /// Configured overflow limit, `-1` when unlimited.
    pub fn max_overflow(&self) -> i64 {
        self.shared.max_overflow
    }

    /// Default checkout wait.
    pub fn timeout(&self) -> Duration {
        self.shared.timeout
    }

    /// Snapshot of pool statistics.
    pub fn stats(&self) -> PoolStats {
        let shared = &self.shared;
        shared.counters.snapshot(
            shared.target_size,
            shared.max_overflow,
            shared.overflow(),
            shared.idle.size(),
        )
    }
}

impl<F: ResourceFactory> fmt::Debug for ResourcePool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("target_size", &self.shared.target_size)
            .field("max_overflow", &self.shared.max_overflow)
            .field("overflow", &self.shared.overflow())
            .field("idle", &self.shared.idle.size())
            .field("timeout", &self.shared.timeout)
            .finish_non_exhaustive()
    }
}
