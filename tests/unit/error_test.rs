//! Tests for error types

use std::time::Duration;

use prometheus_resource_pool::core::{GetError, PoolError, PutError};

#[test]
fn test_pool_exhausted_error() {
    let err = PoolError::PoolExhausted {
        waited: Duration::from_millis(250),
    };
    assert_eq!(format!("{}", err), "pool exhausted after waiting 250ms");
}

#[test]
fn test_invalid_argument_error() {
    let err = PoolError::InvalidArgument("timeout must be a positive number".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid argument: timeout must be a positive number"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = PoolError::InvalidConfig("bad".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: bad");
}

#[test]
fn test_pool_shutdown_error() {
    assert_eq!(format!("{}", PoolError::PoolShutdown), "pool has been shut down");
}

#[test]
fn test_queue_errors() {
    assert_eq!(format!("{}", GetError::Empty), "queue is empty");
    assert_eq!(format!("{}", GetError::TimedOut), "timed out waiting for an item");
    assert_eq!(
        format!("{}", GetError::Interrupted),
        "interrupted while waiting for an item"
    );
    assert_eq!(format!("{}", PutError::Full(())), "queue is full");
    assert_eq!(
        format!("{}", PutError::TimedOut(())),
        "timed out waiting for a free slot"
    );
}
