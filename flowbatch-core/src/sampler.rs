//! The sampling-strategy contract
//!
//! A [`Sampler`] decides, per upstream item or per independent timing source,
//! when buffered items are appended and when the buffer is flushed. The
//! engine hands the strategy the upstream sequence and a [`BufferHandle`] and
//! drives the subordinate stream the strategy returns; everything else —
//! buffer ownership, snapshot emission, lifecycle, error and completion
//! policy — stays in the engine.

use std::pin::Pin;

use futures_core::Stream;

use crate::buffer::BufferHandle;
use crate::error::BatchResult;

/// Boxed upstream sequence of items.
///
/// Errors travel in-band as `Err` items.
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = BatchResult<T>> + Send>>;

/// Boxed subordinate sequence of flush signals.
///
/// `Ok(())` marks a flush already performed through the [`BufferHandle`]; the
/// engine ignores the value and reacts only to errors and to completion.
/// Stream end is subordinate completion and triggers the engine's completion
/// policy.
pub type SignalStream = Pin<Box<dyn Stream<Item = BatchResult<()>> + Send>>;

/// A pluggable strategy deciding when buffered items are appended vs flushed.
///
/// # Contract
///
/// - Call [`BufferHandle::append`] to add an item without emitting, and
///   [`BufferHandle::flush`] / [`BufferHandle::flush_retaining`] to emit a
///   snapshot; yield `Ok(())` on the returned stream once per flush.
/// - Forward upstream faults as `Err` items on the returned stream; end the
///   stream when the strategy's notion of the sequence ends (normally when
///   the upstream ends).
/// - Do not keep any access path to the buffer other than the given handle.
/// - Release private timers and other async resources when the returned
///   stream is dropped; the engine drops it synchronously on cancellation.
///
/// Append and flush are never invoked concurrently: the engine polls the
/// returned stream from a single logical loop, so all handle calls happen in
/// discrete turns.
///
/// # Wiring
///
/// `attach` is the explicit fallible wiring step. Returning `Err` (for
/// example on invalid strategy parameters) makes the engine surface a single
/// error event downstream and close the binding; it is never retried.
pub trait Sampler<T>: Send {
    /// Wires the strategy to `upstream`, returning the subordinate stream of
    /// flush signals.
    fn attach(
        self: Box<Self>,
        upstream: ItemStream<T>,
        buffer: BufferHandle<T>,
    ) -> BatchResult<SignalStream>;
}
