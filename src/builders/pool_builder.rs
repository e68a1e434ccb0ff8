//! Builders to construct resource pools from configuration.

use std::collections::HashMap;

use tracing::info;

use crate::config::{PoolConfig, PoolsConfig};
use crate::core::{PoolError, ResourceFactory, ResourcePool};

/// Build a single pool from configuration.
///
/// # Errors
///
/// Propagates configuration validation failures.
pub fn build_pool<F: ResourceFactory>(cfg: &PoolConfig, factory: F) -> Result<ResourcePool<F>, PoolError> {
    ResourcePool::from_config(factory, cfg)
}

/// Build named pools from configuration, asking `factory_for` for each pool's factory.
///
/// # Errors
///
/// Fails on invalid configuration or when `factory_for` fails for any pool.
pub fn build_pools<F, FF>(
    cfg: &PoolsConfig,
    mut factory_for: FF,
) -> Result<HashMap<String, ResourcePool<F>>, PoolError>
where
    F: ResourceFactory,
    FF: FnMut(&str, &PoolConfig) -> Result<F, PoolError>,
{
    cfg.validate()
        .map_err(|e| PoolError::InvalidConfig(format!("config invalid: {e}")))?;

    let mut pools = HashMap::new();
    for (name, pool_cfg) in &cfg.pools {
        let factory = factory_for(name, pool_cfg)?;
        let pool = ResourcePool::from_config(factory, pool_cfg)?;
        info!(pool = %name, target_size = pool_cfg.target_size, max_overflow = pool_cfg.max_overflow, "built pool");
        pools.insert(name.clone(), pool);
    }

    Ok(pools)
}
