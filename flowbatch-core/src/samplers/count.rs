//! Count-based sampling

use async_stream::stream;
use futures_util::StreamExt;

use crate::buffer::BufferHandle;
use crate::error::{BatchError, BatchResult};
use crate::sampler::{ItemStream, Sampler, SignalStream};

/// Flushes after every `count` appended items.
///
/// Windows tumble by default. [`start_every`](Self::start_every) opts into
/// sliding windows: each flush retains the buffer tail from that index, so
/// consecutive snapshots overlap.
///
/// # Example
///
/// ```rust,ignore
/// // Tumbling windows of three
/// let sampler = CountSampler::new(3);
///
/// // Overlapping windows of three advancing by one
/// let sampler = CountSampler::new(3).start_every(1);
/// ```
#[derive(Debug, Clone)]
pub struct CountSampler {
    count: usize,
    start_every: Option<usize>,
}

impl CountSampler {
    /// Flush after every `count` appended items.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            start_every: None,
        }
    }

    /// Start a new window every `start_every` items instead of every
    /// `count`.
    ///
    /// Values below `count` produce overlapping windows; values at or above
    /// `count` degrade to tumbling windows.
    pub fn start_every(mut self, start_every: usize) -> Self {
        self.start_every = Some(start_every);
        self
    }
}

impl<T: Clone + Send + 'static> Sampler<T> for CountSampler {
    fn attach(
        self: Box<Self>,
        mut upstream: ItemStream<T>,
        buffer: BufferHandle<T>,
    ) -> BatchResult<SignalStream> {
        if self.count == 0 {
            return Err(BatchError::wiring("count window must hold at least one item"));
        }
        if self.start_every == Some(0) {
            return Err(BatchError::wiring("start_every must be at least 1"));
        }
        let count = self.count;
        let retain_from = self.start_every.unwrap_or(count);

        Ok(Box::pin(stream! {
            // Mirrors the live buffer length; retention carries part of a
            // flushed window into the next one.
            let mut fill = 0usize;
            while let Some(next) = upstream.next().await {
                match next {
                    Ok(item) => {
                        buffer.append(item);
                        fill += 1;
                        if fill == count {
                            buffer.flush_retaining(retain_from);
                            fill = count.saturating_sub(retain_from);
                            yield Ok(());
                        }
                    }
                    Err(err) => yield Err(err),
                }
            }
        }))
    }
}
