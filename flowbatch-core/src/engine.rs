//! The buffer engine: drives a sampler-wired binding
//!
//! [`BatchStream`] is the downstream sequence produced by
//! [`Batcher::bind`](crate::Batcher::bind). It owns the binding lifecycle:
//!
//! - **Cold start**: nothing happens — no sampler invocation, no upstream
//!   demand — until the first `poll_next`.
//! - **Activation**: the first poll wires the sampler to the upstream and
//!   subscribes to the returned signal stream. A wiring fault becomes a
//!   single downstream error event followed by a normal close.
//! - **Draining**: snapshots flushed by the sampler go downstream in flush
//!   order, strictly after the appends they contain.
//! - **Errors**: a fault on the signal stream is forwarded after any
//!   snapshots flushed before it; with `cancel_on_error` the binding then
//!   closes and the live buffer is discarded without emission.
//! - **Completion**: when the signal stream ends, `exhaust_on_done` decides
//!   whether a non-empty live buffer is emitted as one final snapshot before
//!   the close.
//! - **Cancellation**: dropping the stream closes the binding; the signal
//!   stream and every sampler-owned resource are dropped with it.
//!
//! Backpressure is poll-driven: the signal stream (and through it the
//! upstream) is polled only when the downstream consumer polls this stream,
//! so demand is forwarded unchanged and nothing is queued beyond snapshots
//! already flushed.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::buffer::BufferHandle;
use crate::error::{BatchError, BatchResult};
use crate::sampler::{ItemStream, Sampler, SignalStream};

/// Binding lifecycle. No transition leaves `Closed`; each binding is
/// single-use.
enum Stage<T> {
    Unstarted {
        sampler: Box<dyn Sampler<T>>,
        upstream: ItemStream<T>,
    },
    Active {
        signals: SignalStream,
    },
    Closed,
}

/// Terminal event decided while draining, delivered once the snapshot queue
/// is empty.
enum Terminal {
    /// Natural completion; close with no further emission.
    Complete,
    /// Error that closes the binding after being forwarded.
    Fail(BatchError),
    /// Error forwarded while the binding stays active
    /// (`cancel_on_error = false`).
    Report(BatchError),
}

/// Downstream sequence of buffer snapshots.
///
/// Yields `Ok(Vec<T>)` per flushed snapshot and `Err` for forwarded faults.
/// Single consumer, single use.
pub struct BatchStream<T> {
    stage: Stage<T>,
    buffer: BufferHandle<T>,
    exhaust_on_done: bool,
    cancel_on_error: bool,
    terminal: Option<Terminal>,
}

impl<T> BatchStream<T> {
    pub(crate) fn new(
        sampler: Box<dyn Sampler<T>>,
        upstream: ItemStream<T>,
        exhaust_on_done: bool,
        cancel_on_error: bool,
    ) -> Self {
        Self {
            stage: Stage::Unstarted { sampler, upstream },
            buffer: BufferHandle::new(),
            exhaust_on_done,
            cancel_on_error,
            terminal: None,
        }
    }

    /// Idempotent close: drops the signal stream and marks the shared buffer
    /// state closed so late handle calls are no-ops.
    fn shut(&mut self) {
        self.stage = Stage::Closed;
        self.buffer.close();
    }
}

impl<T> Stream for BatchStream<T> {
    type Item = BatchResult<Vec<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            // Snapshots flushed by the sampler drain first, in flush order.
            if let Some(snapshot) = this.buffer.state().pop_flushed() {
                tracing::trace!(len = snapshot.len(), "emitting snapshot");
                return Poll::Ready(Some(Ok(snapshot)));
            }

            match this.terminal.take() {
                Some(Terminal::Complete) => {
                    tracing::debug!("batch binding completed");
                    this.shut();
                    return Poll::Ready(None);
                }
                Some(Terminal::Fail(err)) => {
                    tracing::warn!(%err, "batch binding failed");
                    this.shut();
                    return Poll::Ready(Some(Err(err)));
                }
                Some(Terminal::Report(err)) => {
                    tracing::warn!(%err, "upstream fault forwarded, binding stays active");
                    return Poll::Ready(Some(Err(err)));
                }
                None => {}
            }

            let stage = &mut this.stage;
            match stage {
                Stage::Closed => return Poll::Ready(None),
                Stage::Unstarted { .. } => {
                    let (sampler, upstream) = match std::mem::replace(stage, Stage::Closed) {
                        Stage::Unstarted { sampler, upstream } => (sampler, upstream),
                        _ => unreachable!("guarded by the match arm"),
                    };
                    match sampler.attach(upstream, this.buffer.clone()) {
                        Ok(signals) => {
                            tracing::debug!("batch binding activated");
                            this.stage = Stage::Active { signals };
                        }
                        Err(err) => {
                            tracing::warn!(%err, "sampler wiring failed");
                            this.shut();
                            return Poll::Ready(Some(Err(err)));
                        }
                    }
                }
                Stage::Active { signals } => match signals.as_mut().poll_next(cx) {
                    // Flush already performed through the handle; the next
                    // loop turn drains it.
                    Poll::Ready(Some(Ok(()))) => {}
                    Poll::Ready(Some(Err(err))) => {
                        this.terminal = Some(if this.cancel_on_error {
                            Terminal::Fail(err)
                        } else {
                            Terminal::Report(err)
                        });
                    }
                    Poll::Ready(None) => {
                        if this.exhaust_on_done {
                            this.buffer.state().flush_remaining();
                        }
                        this.terminal = Some(Terminal::Complete);
                    }
                    Poll::Pending => return Poll::Pending,
                },
            }
        }
    }
}

impl<T> Drop for BatchStream<T> {
    fn drop(&mut self) {
        // Cancellation path: the signal stream is dropped with us, and the
        // shared state must refuse any handle call still in flight.
        self.buffer.close();
    }
}
