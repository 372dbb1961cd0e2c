//! Predicate-based sampling

use async_stream::stream;
use futures_util::StreamExt;

use crate::buffer::BufferHandle;
use crate::error::BatchResult;
use crate::sampler::{ItemStream, Sampler, SignalStream};

/// Flushes whenever an appended item satisfies the predicate.
///
/// The triggering item is appended before the flush, so it is included in
/// the snapshot it closes.
pub struct PredicateSampler<F> {
    predicate: F,
}

impl<F> PredicateSampler<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<T, F> Sampler<T> for PredicateSampler<F>
where
    T: Send + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    fn attach(
        self: Box<Self>,
        mut upstream: ItemStream<T>,
        buffer: BufferHandle<T>,
    ) -> BatchResult<SignalStream> {
        let mut matches = self.predicate;

        Ok(Box::pin(stream! {
            while let Some(next) = upstream.next().await {
                match next {
                    Ok(item) => {
                        let hit = matches(&item);
                        buffer.append(item);
                        if hit {
                            buffer.flush();
                            yield Ok(());
                        }
                    }
                    Err(err) => yield Err(err),
                }
            }
        }))
    }
}
