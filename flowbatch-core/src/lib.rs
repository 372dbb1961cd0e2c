//! flowbatch core engine
//!
//! A sampler-driven buffering operator for async item streams: a
//! [`Batcher`] wires a pluggable [`Sampler`] to an upstream `Stream` of
//! items and yields a downstream [`BatchStream`] of `Vec<T>` snapshots.
//! Where the buffer boundaries fall — every Nth item, on a timer tick, on a
//! matching item, on an external trigger — is entirely the sampler's call;
//! the engine owns the buffer, the lifecycle and the policies.
//!
//! # Architecture
//!
//! ```text
//! upstream ──► Sampler ── append/flush ──► BufferHandle
//!                 │                            │
//!                 ▼ flush signals              ▼ snapshots
//!             BatchStream ───────────────► downstream
//! ```
//!
//! The engine guarantees, for any sampler satisfying the contract:
//!
//! - cold start: no work until the first downstream poll
//! - snapshots emitted in flush order, as copies that never alias the buffer
//! - poll-driven backpressure forwarded unchanged to the sampler's sources
//! - drop-based cancellation, propagated synchronously
//! - exactly-once close, with an optional final flush of a non-empty buffer
//!   on natural completion (`exhaust_on_done`)
//!
//! # Example
//!
//! ```rust,ignore
//! use flowbatch_core::{samplers::CountSampler, Batcher};
//! use futures_util::stream::{self, StreamExt};
//!
//! let upstream = stream::iter(1..=5).map(Ok);
//! let mut batches = Batcher::new(CountSampler::new(3)).bind(upstream);
//!
//! assert_eq!(batches.next().await.unwrap()?, vec![1, 2, 3]);
//! // exhaust_on_done emits the partial tail
//! assert_eq!(batches.next().await.unwrap()?, vec![4, 5]);
//! ```
//!
//! Time-driven sampling is generic over [`time::Ticker`]; the
//! `flowbatch-tokio-adapter` crate supplies the Tokio implementation.

mod builder;
mod engine;
mod error;

pub mod buffer;
pub mod sampler;
pub mod samplers;
pub mod time;

pub use builder::{Batcher, BatcherBuilder};
pub use buffer::BufferHandle;
pub use engine::BatchStream;
pub use error::{BatchError, BatchResult};
pub use sampler::{ItemStream, Sampler, SignalStream};
