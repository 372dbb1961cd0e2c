//! Concrete sampling strategies
//!
//! Each strategy is an independent [`Sampler`](crate::Sampler)
//! implementation over the same handle-driven contract:
//!
//! | Strategy | Flush trigger |
//! |---|---|
//! | [`CountSampler`] | every `count` appended items (optionally sliding) |
//! | [`PredicateSampler`] | the appended item satisfies a test |
//! | [`IntervalSampler`] | a [`Ticker`](crate::time::Ticker) tick, independent of item arrival |
//! | [`DeferredSampler`] | completion of an async operation, re-created after each flush |
//! | [`SignalSampler`] | emission of an independent notifier stream |
//!
//! The time- and notifier-driven strategies merge the upstream with their
//! trigger source into one event loop, so the whole strategy lives in a
//! single drop-cancelable stream and no task is ever spawned.

mod count;
mod deferred;
mod interval;
mod predicate;
mod signal;

pub use count::CountSampler;
pub use deferred::DeferredSampler;
pub use interval::IntervalSampler;
pub use predicate::PredicateSampler;
pub use signal::SignalSampler;

use async_stream::stream;
use futures_core::Stream;
use futures_util::{future, pin_mut, stream, StreamExt};

use crate::buffer::BufferHandle;
use crate::sampler::{ItemStream, SignalStream};

/// One event of a merged item-or-trigger loop.
enum Arm<T> {
    Item(crate::BatchResult<T>),
    Tick,
    Done,
}

/// Tags upstream items and marks upstream completion, so a merged loop can
/// end even while its trigger arm keeps ticking.
fn item_arms<T>(upstream: ItemStream<T>) -> impl Stream<Item = Arm<T>> + Send + 'static
where
    T: Send + 'static,
{
    upstream
        .map(Arm::Item)
        .chain(stream::once(future::ready(Arm::Done)))
}

/// Event loop shared by the trigger-driven strategies: append items, flush on
/// ticks, forward faults, end on upstream completion.
fn signal_loop<T, M>(merged: M, buffer: BufferHandle<T>) -> SignalStream
where
    T: Send + 'static,
    M: Stream<Item = Arm<T>> + Send + 'static,
{
    Box::pin(stream! {
        pin_mut!(merged);
        while let Some(arm) = merged.next().await {
            match arm {
                Arm::Item(Ok(item)) => buffer.append(item),
                Arm::Item(Err(err)) => yield Err(err),
                Arm::Tick => {
                    buffer.flush();
                    yield Ok(());
                }
                Arm::Done => break,
            }
        }
    })
}
