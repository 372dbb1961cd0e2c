//! Interval and deferred sampling on the Tokio clock
//!
//! All tests run on a paused clock, so tick timing is deterministic.

use std::time::Duration;

use flowbatch_core::samplers::DeferredSampler;
use flowbatch_core::{BatchResult, Batcher};
use flowbatch_tokio_adapter::interval_sampler;
use futures_util::stream::{self, StreamExt};

#[tokio::test(start_paused = true)]
async fn interval_flushes_what_arrived() {
    let upstream = stream::iter(vec![1, 2, 3]).map(Ok).chain(stream::pending());
    let mut batches = Batcher::new(interval_sampler(Duration::from_millis(50))).bind(upstream);

    assert_eq!(batches.next().await.unwrap().unwrap(), vec![1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn idle_ticks_emit_empty_snapshots() {
    let upstream = stream::pending::<BatchResult<i32>>();
    let mut batches = Batcher::new(interval_sampler(Duration::from_millis(20))).bind(upstream);

    assert!(batches.next().await.unwrap().unwrap().is_empty());
    assert!(batches.next().await.unwrap().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn interval_completes_with_upstream() {
    let upstream = stream::iter(vec![1, 2]).map(Ok);
    let batches: Vec<BatchResult<Vec<i32>>> =
        Batcher::new(interval_sampler(Duration::from_millis(50)))
            .bind(upstream)
            .collect()
            .await;

    // The finite upstream ends before the first tick; exhaust emits the tail
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].as_ref().unwrap(), &vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn deferred_operation_reschedules_after_each_flush() {
    let upstream = stream::iter(vec![1, 2]).map(Ok).chain(stream::pending());
    let sampler = DeferredSampler::new(|| tokio::time::sleep(Duration::from_millis(10)));
    let mut batches = Batcher::new(sampler).bind(upstream);

    assert_eq!(batches.next().await.unwrap().unwrap(), vec![1, 2]);
    assert!(batches.next().await.unwrap().unwrap().is_empty());
    assert!(batches.next().await.unwrap().unwrap().is_empty());
}
