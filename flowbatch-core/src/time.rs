//! Time-source abstraction for time-driven sampling
//!
//! Keeps the core crate runtime-agnostic: time-driven samplers are generic
//! over [`Ticker`], and runtime adapter crates supply the implementation
//! (`flowbatch-tokio-adapter` provides one over `tokio::time`).

use core::future::Future;

/// A repeating time source.
///
/// Each call to [`next_tick`](Self::next_tick) completes when the next tick
/// elapses. Implementations own their timer state and tear it down on drop.
pub trait Ticker: Send + 'static {
    /// Completes when the next tick elapses.
    fn next_tick(&mut self) -> impl Future<Output = ()> + Send;
}
