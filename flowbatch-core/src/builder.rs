//! Batcher construction
//!
//! Two construction paths, per the design rule that the strategy is a
//! mandatory collaborator:
//!
//! - [`Batcher::new`] takes the sampler as a non-optional argument, so a
//!   missing strategy is unrepresentable in typed code.
//! - [`Batcher::builder`] is the path for bindings driven by untyped external
//!   configuration; it validates at [`build`](BatcherBuilder::build) and
//!   fails synchronously with [`BatchError::SamplerMissing`] before any
//!   binding exists.

use futures_core::Stream;

use crate::engine::BatchStream;
use crate::error::{BatchError, BatchResult};
use crate::sampler::Sampler;

/// A configured batching transformation, ready to bind to an upstream.
///
/// Binding is cold: the returned [`BatchStream`] performs no work until the
/// downstream consumer first polls it. One `Batcher` produces one binding.
///
/// # Example
///
/// ```rust,ignore
/// use flowbatch_core::{samplers::CountSampler, Batcher};
/// use futures_util::stream::{self, StreamExt};
///
/// let upstream = stream::iter(1..=4).map(Ok);
/// let mut batches = Batcher::new(CountSampler::new(2)).bind(upstream);
///
/// while let Some(batch) = batches.next().await {
///     println!("window: {:?}", batch?);
/// }
/// ```
pub struct Batcher<T> {
    sampler: Box<dyn Sampler<T>>,
    exhaust_on_done: bool,
    cancel_on_error: bool,
}

impl<T: Send + 'static> Batcher<T> {
    /// Creates a batcher around a mandatory sampling strategy.
    ///
    /// Defaults: `exhaust_on_done = true`, `cancel_on_error = true`.
    pub fn new(sampler: impl Sampler<T> + 'static) -> Self {
        Self {
            sampler: Box::new(sampler),
            exhaust_on_done: true,
            cancel_on_error: true,
        }
    }

    /// Builder-based construction for untyped configuration sources.
    pub fn builder() -> BatcherBuilder<T> {
        BatcherBuilder::new()
    }

    /// Whether a non-empty buffer is emitted as one final snapshot when the
    /// upstream completes naturally. Defaults to `true`.
    pub fn exhaust_on_done(mut self, exhaust: bool) -> Self {
        self.exhaust_on_done = exhaust;
        self
    }

    /// Whether a forwarded error closes the binding. Defaults to `true`.
    /// With `false` the binding stays active past forwarded faults.
    pub fn cancel_on_error(mut self, cancel: bool) -> Self {
        self.cancel_on_error = cancel;
        self
    }

    /// Binds this batcher to `upstream`, producing the downstream sequence
    /// of buffer snapshots.
    pub fn bind<S>(self, upstream: S) -> BatchStream<T>
    where
        S: Stream<Item = BatchResult<T>> + Send + 'static,
    {
        BatchStream::new(
            self.sampler,
            Box::pin(upstream),
            self.exhaust_on_done,
            self.cancel_on_error,
        )
    }
}

/// Fluent builder for [`Batcher`], validating at build time.
pub struct BatcherBuilder<T> {
    sampler: Option<Box<dyn Sampler<T>>>,
    exhaust_on_done: bool,
    cancel_on_error: bool,
}

impl<T: Send + 'static> BatcherBuilder<T> {
    pub fn new() -> Self {
        Self {
            sampler: None,
            exhaust_on_done: true,
            cancel_on_error: true,
        }
    }

    /// Sets the sampling strategy.
    pub fn sampler(mut self, sampler: impl Sampler<T> + 'static) -> Self {
        self.sampler = Some(Box::new(sampler));
        self
    }

    /// Sets an already-boxed sampling strategy, as produced by dynamic
    /// configuration.
    pub fn boxed_sampler(mut self, sampler: Box<dyn Sampler<T>>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// See [`Batcher::exhaust_on_done`].
    pub fn exhaust_on_done(mut self, exhaust: bool) -> Self {
        self.exhaust_on_done = exhaust;
        self
    }

    /// See [`Batcher::cancel_on_error`].
    pub fn cancel_on_error(mut self, cancel: bool) -> Self {
        self.cancel_on_error = cancel;
        self
    }

    /// Validates the configuration and produces the [`Batcher`].
    ///
    /// # Errors
    ///
    /// [`BatchError::SamplerMissing`] when no strategy was supplied.
    pub fn build(self) -> BatchResult<Batcher<T>> {
        let sampler = self.sampler.ok_or(BatchError::SamplerMissing)?;
        Ok(Batcher {
            sampler,
            exhaust_on_done: self.exhaust_on_done,
            cancel_on_error: self.cancel_on_error,
        })
    }
}

impl<T: Send + 'static> Default for BatcherBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
