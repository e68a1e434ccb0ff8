//! Tests for builder modules

use std::collections::HashMap;
use std::time::Duration;

use prometheus_resource_pool::builders::{build_pool, build_pools};
use prometheus_resource_pool::config::{PoolConfig, PoolsConfig};
use prometheus_resource_pool::core::{BoxError, PoolError, Resource};

struct Conn {
    dsn: String,
}

impl Resource for Conn {}

#[test]
fn test_build_pool_applies_config() {
    let cfg = PoolConfig::new()
        .with_target_size(3)
        .with_max_overflow(1)
        .with_timeout_secs(0.25);

    let pool = build_pool(&cfg, || Ok::<_, BoxError>(Conn { dsn: "db".into() })).unwrap();
    assert_eq!(pool.target_size(), 3);
    assert_eq!(pool.max_overflow(), 1);
    assert_eq!(pool.timeout(), Duration::from_millis(250));
    assert_eq!(pool.overflow(), -3);
}

#[test]
fn test_build_pool_rejects_invalid_config() {
    let cfg = PoolConfig::new().with_timeout_secs(-2.0);
    let result = build_pool(&cfg, || Ok::<_, BoxError>(Conn { dsn: "db".into() }));
    assert!(matches!(result, Err(PoolError::InvalidArgument(_))));
}

#[test]
fn test_build_pools_per_name_factory() {
    let mut pools = HashMap::new();
    pools.insert("primary".to_string(), PoolConfig::new().with_target_size(1));
    pools.insert("replica".to_string(), PoolConfig::new().with_target_size(2));
    let cfg = PoolsConfig { pools };

    let built = build_pools(&cfg, |name, _cfg| {
        let dsn = format!("postgres://{name}");
        Ok(move || Ok::<_, BoxError>(Conn { dsn: dsn.clone() }))
    })
    .unwrap();

    assert_eq!(built.len(), 2);
    let mut handle = built["replica"].checkout().unwrap();
    assert_eq!(handle.resource().unwrap().dsn, "postgres://replica");
    assert_eq!(built["replica"].target_size(), 2);
}

#[test]
fn test_build_pools_propagates_factory_error() {
    let mut pools = HashMap::new();
    pools.insert("broken".to_string(), PoolConfig::new());
    let cfg = PoolsConfig { pools };

    let result = build_pools(&cfg, |name, _cfg| {
        Err::<fn() -> Result<Conn, BoxError>, _>(PoolError::InvalidConfig(format!("no dsn for {name}")))
    });
    assert!(matches!(result, Err(PoolError::InvalidConfig(msg)) if msg.contains("broken")));
}
