//! Tests for utility functions

use prometheus_resource_pool::util::{init_tracing, init_tracing_with, DEFAULT_LOG_DIRECTIVE};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    init_tracing_with("debug");
    assert!(tracing::dispatcher::has_been_set());
}

#[test]
fn test_default_directive_targets_crate() {
    assert!(DEFAULT_LOG_DIRECTIVE.starts_with("prometheus_resource_pool"));
}
