//! Integration tests for the async checkout facade.

#![cfg(feature = "tokio-runtime")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use prometheus_resource_pool::core::{BoxError, PoolError, Resource, ResourceFactory, ResourcePool};

struct Session {
    id: usize,
}

impl Resource for Session {}

fn session_pool(
    target_size: usize,
    max_overflow: i64,
) -> ResourcePool<impl ResourceFactory<Resource = Session>> {
    let next = Arc::new(AtomicUsize::new(0));
    ResourcePool::new(
        move || {
            Ok::<_, BoxError>(Session {
                id: next.fetch_add(1, Ordering::SeqCst),
            })
        },
        target_size,
        Duration::from_millis(200),
        max_overflow,
    )
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_checkout_async_creates_and_reuses() {
    let pool = session_pool(1, 0);

    let mut handle = pool.checkout_async().await.unwrap();
    let id = handle.resource().unwrap().id;
    handle.close();

    let mut again = pool.checkout_async().await.unwrap();
    assert_eq!(again.resource().unwrap().id, id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_checkout_async_exhausts_after_timeout() {
    let pool = session_pool(1, 0);
    let _held = pool.checkout_async().await.unwrap();

    let err = pool.checkout_async().await.unwrap_err();
    assert!(matches!(err, PoolError::PoolExhausted { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_checkout_async_waiter_gets_returned_handle() {
    let pool = session_pool(1, 0);
    let held = pool.checkout_async().await.unwrap();
    let held_id = held.id();

    let waiter_pool = pool.clone();
    let waiter = tokio::spawn(async move { waiter_pool.checkout_async().await.map(|h| h.id()) });

    tokio::time::sleep(Duration::from_millis(50)).await;
    held.close();

    assert_eq!(waiter.await.unwrap().unwrap(), held_id);
}
