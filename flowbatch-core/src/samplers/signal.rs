//! Externally-triggered sampling

use futures_core::Stream;
use futures_util::{stream, StreamExt};

use super::{item_arms, signal_loop, Arm};
use crate::buffer::BufferHandle;
use crate::error::BatchResult;
use crate::sampler::{ItemStream, Sampler, SignalStream};

/// Flushes on each emission of an independent notifier stream.
///
/// Notifier item values are ignored. A notifier that ends stops flushing,
/// but the binding still completes with the upstream.
pub struct SignalSampler<N> {
    notifier: N,
}

impl<N> SignalSampler<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<T, N> Sampler<T> for SignalSampler<N>
where
    T: Send + 'static,
    N: Stream + Send + 'static,
{
    fn attach(
        self: Box<Self>,
        upstream: ItemStream<T>,
        buffer: BufferHandle<T>,
    ) -> BatchResult<SignalStream> {
        let ticks = self.notifier.map(|_| Arm::Tick);
        Ok(signal_loop(
            stream::select(item_arms(upstream), ticks),
            buffer,
        ))
    }
}
