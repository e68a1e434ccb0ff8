//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use prometheus_resource_pool::config::{PoolConfig, PoolsConfig};
use prometheus_resource_pool::core::PoolError;

#[test]
fn test_pool_config_defaults() {
    let cfg = PoolConfig::default();
    assert_eq!(cfg.target_size, 5);
    assert_eq!(cfg.max_overflow, 10);
    assert_eq!(cfg.timeout().unwrap(), Duration::from_secs(30));
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_pool_config_unlimited_overflow_is_valid() {
    let cfg = PoolConfig::new().with_max_overflow(-1);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_pool_config_invalid_max_overflow() {
    let cfg = PoolConfig::new().with_max_overflow(-2);
    assert!(matches!(cfg.validate(), Err(PoolError::InvalidConfig(_))));
}

#[test]
fn test_pool_config_negative_timeout() {
    let cfg = PoolConfig::new().with_timeout_secs(-1.0);
    assert!(matches!(cfg.validate(), Err(PoolError::InvalidArgument(_))));
    assert!(matches!(cfg.timeout(), Err(PoolError::InvalidArgument(_))));
}

#[test]
fn test_pool_config_from_json_fills_defaults() {
    let cfg = PoolConfig::from_json_str(r#"{ "target_size": 2 }"#).unwrap();
    assert_eq!(cfg.target_size, 2);
    assert_eq!(cfg.max_overflow, 10);
    assert!((cfg.timeout_secs - 30.0).abs() < f64::EPSILON);
}

#[test]
fn test_pool_config_from_json_rejects_negative_timeout() {
    let result = PoolConfig::from_json_str(r#"{ "timeout_secs": -0.5 }"#);
    assert!(matches!(result, Err(PoolError::InvalidArgument(_))));
}

#[test]
fn test_pool_config_from_json_parse_error() {
    let result = PoolConfig::from_json_str("{ not json");
    assert!(matches!(result, Err(PoolError::InvalidConfig(_))));
}

#[test]
fn test_pools_config_empty_pools() {
    let config = PoolsConfig {
        pools: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_pools_config_names_invalid_pool() {
    let mut pools = HashMap::new();
    pools.insert("analytics".to_string(), PoolConfig::new().with_max_overflow(-7));
    let err = PoolsConfig { pools }.validate().unwrap_err();
    assert!(err.to_string().contains("analytics"));
}

#[test]
fn test_pools_config_from_json() {
    let json = r#"{
        "pools": {
            "primary": { "target_size": 5, "timeout_secs": 30, "max_overflow": 10 },
            "replica": { "target_size": 2, "max_overflow": -1 }
        }
    }"#;

    let config = PoolsConfig::from_json_str(json).unwrap();
    assert_eq!(config.pools.len(), 2);
    assert_eq!(config.pools["replica"].max_overflow, -1);
}
