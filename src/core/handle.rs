//! Checked-out resource handle.

use std::fmt;
use std::sync::Weak;

use tracing::debug;
use uuid::Uuid;

use crate::core::resource_pool::{close_quietly, PoolShared, Slot};
use crate::core::{PoolError, ResourceFactory};

/// Exclusive handle to one pooled resource.
///
/// The underlying resource is created lazily by the pool's factory on first
/// use. Closing (or dropping) the handle returns it to the pool instead of
/// destroying the resource; the pool decides whether to keep it idle or
/// discard it. A handle that outlives its pool closes the resource itself.
pub struct ResourceHandle<F: ResourceFactory> {
    id: Uuid,
    resource: Option<F::Resource>,
    pool: Weak<PoolShared<F>>,
}

impl<F: ResourceFactory> ResourceHandle<F> {
    pub(crate) fn new(slot: Slot<F::Resource>, pool: Weak<PoolShared<F>>) -> Self {
        Self {
            id: slot.id,
            resource: slot.resource,
            pool,
        }
    }

    /// Stable identifier, preserved across checkin and reuse.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the underlying resource currently exists.
    pub const fn is_connected(&self) -> bool {
        self.resource.is_some()
    }

    /// Create the underlying resource if it does not exist yet.
    ///
    /// Idempotent. On failure the handle stays unconnected so a later call
    /// can retry.
    ///
    /// # Errors
    ///
    /// [`PoolError::ConnectionCreateFailed`] when the factory fails,
    /// [`PoolError::PoolShutdown`] when the pool is gone.
    pub fn connect(&mut self) -> Result<(), PoolError> {
        if self.resource.is_some() {
            return Ok(());
        }
        let pool = self.pool.upgrade().ok_or(PoolError::PoolShutdown)?;
        self.resource = Some(pool.create_resource(self.id)?);
        Ok(())
    }

    /// Access the underlying resource, connecting first if needed.
    ///
    /// # Errors
    ///
    /// See [`connect`](Self::connect).
    pub fn resource(&mut self) -> Result<&mut F::Resource, PoolError> {
        self.connect()?;
        self.resource
            .as_mut()
            .ok_or_else(|| PoolError::Internal("resource missing after connect".into()))
    }

    /// Return this handle to its pool.
    pub fn close(self) {
        drop(self);
    }

    /// Destroy the underlying resource now, keeping the handle.
    ///
    /// The next [`resource`](Self::resource) call reconnects.
    pub fn close_connection(&mut self) {
        debug!(handle = %self.id, "closing connection");
        close_quietly(self.id, self.resource.take());
    }

    /// Give up on this handle: dispose it and release its overflow slot
    /// without passing through the idle queue.
    pub(crate) fn abandon(mut self, shared: &PoolShared<F>) {
        shared.dispose_slot(Slot {
            id: self.id,
            resource: self.resource.take(),
        });
        self.pool = Weak::new();
    }
}

impl<F: ResourceFactory> Drop for ResourceHandle<F> {
    fn drop(&mut self) {
        let slot = Slot {
            id: self.id,
            resource: self.resource.take(),
        };
        match self.pool.upgrade() {
            Some(pool) => pool.checkin(slot),
            None => close_quietly(slot.id, slot.resource),
        }
    }
}

impl<F: ResourceFactory> fmt::Debug for ResourceHandle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
