//! Resource and factory abstractions.

use crate::core::{AppResult, BoxError};

/// A closable resource managed by the pool (a network or database connection).
///
/// The default [`close`](Resource::close) simply drops the value. Override it
/// when shutting the resource down can fail and the failure is worth logging.
///
/// # Example
///
/// ```rust
/// use prometheus_resource_pool::core::{AppResult, Resource};
///
/// struct Conn {
///     addr: String,
/// }
///
/// impl Resource for Conn {
///     fn close(self) -> AppResult<()> {
///         // flush, send goodbye, ...
///         drop(self.addr);
///         Ok(())
///     }
/// }
/// ```
pub trait Resource: Send + 'static {
    /// Destroy the underlying resource.
    ///
    /// # Errors
    ///
    /// Returns an error when shutdown fails. The pool logs it and moves on.
    fn close(self) -> AppResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Produces new resources on demand.
///
/// Any `Fn() -> Result<R, E>` closure is a factory, where `E` converts into a
/// boxed error (`anyhow::Error`, `std::io::Error`, `String`, ...).
///
/// ```rust
/// use prometheus_resource_pool::core::{Resource, ResourceFactory};
///
/// struct Conn(u32);
/// impl Resource for Conn {}
///
/// let factory = || Ok::<_, std::io::Error>(Conn(1));
/// assert_eq!(factory.create().unwrap().0, 1);
/// ```
pub trait ResourceFactory: Send + Sync + 'static {
    /// Resource type produced by this factory.
    type Resource: Resource;

    /// Create one new resource.
    ///
    /// # Errors
    ///
    /// Any failure is surfaced to the checkout caller as
    /// [`PoolError::ConnectionCreateFailed`](crate::core::PoolError::ConnectionCreateFailed).
    fn create(&self) -> Result<Self::Resource, BoxError>;
}

impl<F, R, E> ResourceFactory for F
where
    F: Fn() -> Result<R, E> + Send + Sync + 'static,
    R: Resource,
    E: Into<BoxError>,
{
    type Resource = R;

    fn create(&self) -> Result<R, BoxError> {
        self().map_err(Into::into)
    }
}
