//! Blocking bounded FIFO queue.
//!
//! All mutations go through a single `parking_lot::Mutex`. Two condition
//! variables share that mutex: `not_full` wakes producers when a slot frees up
//! and `not_empty` wakes consumers when an item arrives. Every wait re-checks
//! its predicate in a loop, so spurious wakeups and lost races are harmless.
//!
//! Consumers waiting through [`get_until`](BlockingBoundedQueue::get_until)
//! can also be woken without an item by
//! [`interrupt_getters`](BlockingBoundedQueue::interrupt_getters). The pool
//! uses this when capacity frees up somewhere other than the queue.
//!
//! ```
//! use prometheus_resource_pool::core::{BlockingBoundedQueue, GetError};
//!
//! let queue = BlockingBoundedQueue::new(2);
//! queue.put_nowait("a").unwrap();
//! queue.put_nowait("b").unwrap();
//! assert!(queue.put_nowait("c").is_err());
//!
//! assert_eq!(queue.get_nowait(), Ok("a"));
//! assert!(queue.put_nowait("c").is_ok());
//! assert_eq!(queue.get_nowait(), Ok("b"));
//! assert_eq!(queue.get_nowait(), Ok("c"));
//! assert_eq!(queue.get_nowait(), Err(GetError::Empty));
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::{GetError, PoolError, PutError};

/// Convert a seconds-valued timeout into a [`Duration`].
///
/// # Errors
///
/// Returns [`PoolError::InvalidArgument`] for negative or non-finite values.
pub fn timeout_from_secs(secs: f64) -> Result<Duration, PoolError> {
    if !secs.is_finite() {
        return Err(PoolError::InvalidArgument(format!(
            "timeout must be a finite number of seconds, got {secs}"
        )));
    }
    if secs < 0.0 {
        return Err(PoolError::InvalidArgument(format!(
            "timeout must be a positive number, got {secs}"
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| PoolError::InvalidArgument(format!("timeout {secs} out of range: {e}")))
}

/// FIFO queue with an optional capacity and blocking, non-blocking, and timed
/// put/get operations.
///
/// A capacity of `0` means unbounded: [`is_full`](Self::is_full) is always
/// false and `put` never waits.
#[derive(Debug)]
pub struct BlockingBoundedQueue<T> {
    capacity: usize,
    items: Mutex<VecDeque<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    /// Bumped under the `items` lock by every `interrupt_getters` call.
    interrupts: AtomicU64,
}

impl<T> BlockingBoundedQueue<T> {
    /// Create a queue holding at most `capacity` items (`0` = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            interrupts: AtomicU64::new(0),
        }
    }

    /// Maximum number of items, `0` when unbounded.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of items. Advisory under concurrent mutation.
    pub fn size(&self) -> usize {
        self.items.lock().len()
    }

    /// Alias for [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Whether the queue holds no items. Advisory under concurrent mutation.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Whether the queue is at capacity. Advisory under concurrent mutation.
    pub fn is_full(&self) -> bool {
        let items = self.items.lock();
        self.full(&items)
    }

    fn full(&self, items: &VecDeque<T>) -> bool {
        self.capacity > 0 && items.len() >= self.capacity
    }

    /// Insert `item` at the tail.
    ///
    /// - `block == false`: fails with [`PutError::Full`] if at capacity.
    /// - `block == true, timeout == None`: waits as long as it takes.
    /// - `block == true, timeout == Some(t)`: fails with
    ///   [`PutError::TimedOut`] if no slot frees up within `t`.
    ///
    /// On success one thread blocked in [`get`](Self::get) is woken.
    ///
    /// # Errors
    ///
    /// Returns the item back inside the error when it could not be enqueued.
    pub fn put(&self, item: T, block: bool, timeout: Option<Duration>) -> Result<(), PutError<T>> {
        let mut items = self.items.lock();
        if !block {
            if self.full(&items) {
                return Err(PutError::Full(item));
            }
        } else if let Some(deadline) = timeout.and_then(|t| Instant::now().checked_add(t)) {
            while self.full(&items) {
                if Instant::now() >= deadline {
                    return Err(PutError::TimedOut(item));
                }
                self.not_full.wait_until(&mut items, deadline);
            }
        } else {
            while self.full(&items) {
                self.not_full.wait(&mut items);
            }
        }
        items.push_back(item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Insert without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`PutError::Full`] with the item when the queue is at capacity.
    pub fn put_nowait(&self, item: T) -> Result<(), PutError<T>> {
        self.put(item, false, None)
    }

    /// Remove and return the head item.
    ///
    /// Mirrors [`put`](Self::put): fails with [`GetError::Empty`] when not
    /// blocking, or [`GetError::TimedOut`] once the deadline passes. On
    /// success one thread blocked in `put` is woken.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn get(&self, block: bool, timeout: Option<Duration>) -> Result<T, GetError> {
        if block {
            let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
            return self.take(deadline, None);
        }
        let mut items = self.items.lock();
        let item = items.pop_front().ok_or(GetError::Empty)?;
        self.not_full.notify_one();
        Ok(item)
    }

    /// Blocking get against a fixed deadline (`None` waits forever) that also
    /// gives up once [`interrupt_getters`](Self::interrupt_getters) has run
    /// since `seen` was read from [`interrupts`](Self::interrupts).
    ///
    /// An available item always wins over a pending interrupt.
    ///
    /// # Errors
    ///
    /// [`GetError::TimedOut`] once the deadline passes,
    /// [`GetError::Interrupted`] when interrupted.
    pub fn get_until(&self, deadline: Option<Instant>, seen: u64) -> Result<T, GetError> {
        self.take(deadline, Some(seen))
    }

    /// Interrupt counter to pass to [`get_until`](Self::get_until).
    pub fn interrupts(&self) -> u64 {
        self.interrupts.load(Ordering::SeqCst)
    }

    /// Wake every consumer blocked in [`get_until`](Self::get_until) so it
    /// returns [`GetError::Interrupted`]. Plain [`get`](Self::get) callers
    /// go back to waiting.
    pub fn interrupt_getters(&self) {
        let _items = self.items.lock();
        self.interrupts.fetch_add(1, Ordering::SeqCst);
        self.not_empty.notify_all();
    }

    fn take(&self, deadline: Option<Instant>, seen: Option<u64>) -> Result<T, GetError> {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                self.not_full.notify_one();
                return Ok(item);
            }
            if seen.is_some_and(|seen| seen != self.interrupts.load(Ordering::SeqCst)) {
                return Err(GetError::Interrupted);
            }
            match deadline {
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        return Err(GetError::TimedOut);
                    }
                    self.not_empty.wait_until(&mut items, deadline);
                }
                None => self.not_empty.wait(&mut items),
            }
        }
    }

    /// Remove the head item without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`GetError::Empty`] when there is nothing to take.
    pub fn get_nowait(&self) -> Result<T, GetError> {
        self.get(false, None)
    }

    /// Remove every item at once, waking all blocked producers.
    pub fn drain(&self) -> Vec<T> {
        let drained: Vec<T> = self.items.lock().drain(..).collect();
        self.not_full.notify_all();
        drained
    }
}
