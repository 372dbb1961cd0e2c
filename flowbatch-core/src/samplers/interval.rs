//! Interval-based sampling

use futures_util::stream;

use super::{item_arms, signal_loop, Arm};
use crate::buffer::BufferHandle;
use crate::error::BatchResult;
use crate::sampler::{ItemStream, Sampler, SignalStream};
use crate::time::Ticker;

/// Flushes on every tick of a time source, independent of item arrival.
///
/// Ticks with an empty buffer emit empty snapshots. Generic over
/// [`Ticker`] so the core stays runtime-agnostic; runtime adapters supply
/// the tick source (`flowbatch-tokio-adapter` has `interval_sampler`).
pub struct IntervalSampler<K> {
    ticker: K,
}

impl<K> IntervalSampler<K> {
    pub fn new(ticker: K) -> Self {
        Self { ticker }
    }
}

impl<T, K> Sampler<T> for IntervalSampler<K>
where
    T: Send + 'static,
    K: Ticker,
{
    fn attach(
        self: Box<Self>,
        upstream: ItemStream<T>,
        buffer: BufferHandle<T>,
    ) -> BatchResult<SignalStream> {
        let ticks = stream::unfold(self.ticker, |mut ticker| async move {
            ticker.next_tick().await;
            Some((Arm::Tick, ticker))
        });
        Ok(signal_loop(
            stream::select(item_arms(upstream), ticks),
            buffer,
        ))
    }
}
