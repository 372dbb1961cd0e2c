//! Deferred-operation sampling

use std::future::Future;

use futures_util::stream;

use super::{item_arms, signal_loop, Arm};
use crate::buffer::BufferHandle;
use crate::error::BatchResult;
use crate::sampler::{ItemStream, Sampler, SignalStream};

/// Flushes when a caller-supplied asynchronous operation completes.
///
/// The factory is invoked once at activation and again after each flush, so
/// every window is closed by a fresh run of the operation.
pub struct DeferredSampler<F> {
    factory: F,
}

impl<F> DeferredSampler<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<T, F, Fut> Sampler<T> for DeferredSampler<F>
where
    T: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn attach(
        self: Box<Self>,
        upstream: ItemStream<T>,
        buffer: BufferHandle<T>,
    ) -> BatchResult<SignalStream> {
        let ticks = stream::unfold(self.factory, |mut operation| async move {
            operation().await;
            Some((Arm::Tick, operation))
        });
        Ok(signal_loop(
            stream::select(item_arms(upstream), ticks),
            buffer,
        ))
    }
}
