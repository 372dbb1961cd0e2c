//! Lifecycle, cancellation and error-path tests
//!
//! Exercises the binding state machine: cold start, demand-bound pull,
//! drop cancellation, error forwarding under both cancel-on-error policies,
//! and wiring faults.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flowbatch_core::sampler::{ItemStream, SignalStream};
use flowbatch_core::samplers::CountSampler;
use flowbatch_core::{BatchError, BatchResult, Batcher, BufferHandle, Sampler};
use futures_util::stream::{self, StreamExt};

#[tokio::test]
async fn binding_is_cold_until_first_poll() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pulled);
    let upstream = stream::iter(1..=10)
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .map(Ok);

    let mut batches = Batcher::new(CountSampler::new(2)).bind(upstream);
    assert_eq!(pulled.load(Ordering::SeqCst), 0);

    let first = batches.next().await.unwrap().unwrap();
    assert_eq!(first, vec![1, 2]);
    // Demand-bound: one consumed snapshot pulls exactly one window of items
    assert_eq!(pulled.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cancellation_stops_the_binding() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pulled);
    let upstream = stream::iter(1..=100)
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .map(Ok);

    let mut batches = Batcher::new(CountSampler::new(2)).bind(upstream);
    let first = batches.next().await.unwrap().unwrap();
    assert_eq!(first, vec![1, 2]);
    drop(batches);

    // Nothing was pulled beyond the consumed window, and nothing ever will be
    assert_eq!(pulled.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn upstream_error_reaches_downstream_without_snapshots() {
    let upstream = stream::iter(vec![
        Ok(1),
        Ok(2),
        Ok(3),
        Err(BatchError::upstream("socket reset")),
    ]);
    let events: Vec<BatchResult<Vec<i32>>> = Batcher::new(CountSampler::new(5))
        .bind(upstream)
        .collect()
        .await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(BatchError::Upstream { .. })));
}

#[tokio::test]
async fn snapshots_flushed_before_error_still_drain() {
    let upstream = stream::iter(vec![
        Ok(1),
        Ok(2),
        Err(BatchError::upstream("late fault")),
        Ok(3),
    ]);
    let events: Vec<BatchResult<Vec<i32>>> = Batcher::new(CountSampler::new(2))
        .bind(upstream)
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].as_ref().unwrap(), &vec![1, 2]);
    assert!(matches!(events[1], Err(BatchError::Upstream { .. })));
}

#[tokio::test]
async fn error_keeps_binding_alive_when_policy_disabled() {
    let upstream = stream::iter(vec![
        Ok(1),
        Err(BatchError::upstream("glitch")),
        Ok(2),
        Ok(3),
    ]);
    let events: Vec<BatchResult<Vec<i32>>> = Batcher::new(CountSampler::new(2))
        .cancel_on_error(false)
        .bind(upstream)
        .collect()
        .await;

    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], Err(BatchError::Upstream { .. })));
    assert_eq!(events[1].as_ref().unwrap(), &vec![1, 2]);
    assert_eq!(events[2].as_ref().unwrap(), &vec![3]);
}

struct RefusingSampler;

impl Sampler<i32> for RefusingSampler {
    fn attach(
        self: Box<Self>,
        _upstream: ItemStream<i32>,
        _buffer: BufferHandle<i32>,
    ) -> BatchResult<SignalStream> {
        Err(BatchError::wiring("refused"))
    }
}

#[tokio::test]
async fn wiring_fault_is_one_error_then_close() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pulled);
    let upstream = stream::iter(1..=3)
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .map(Ok);

    let events: Vec<BatchResult<Vec<i32>>> = Batcher::<i32>::new(RefusingSampler)
        .bind(upstream)
        .collect()
        .await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(BatchError::WiringFailed { .. })));
    assert_eq!(pulled.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_count_surfaces_as_wiring_fault() {
    let upstream = stream::iter(1..=3).map(Ok);
    let events: Vec<BatchResult<Vec<i32>>> = Batcher::new(CountSampler::new(0))
        .bind(upstream)
        .collect()
        .await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(BatchError::WiringFailed { .. })));
}
