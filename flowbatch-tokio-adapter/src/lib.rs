//! Tokio adapter for flowbatch
//!
//! Implements the core crate's [`Ticker`](flowbatch_core::time::Ticker)
//! abstraction with `tokio::time`, so interval-based sampling runs on the
//! Tokio runtime:
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use flowbatch_core::Batcher;
//! use flowbatch_tokio_adapter::interval_sampler;
//!
//! let batches = Batcher::new(interval_sampler(Duration::from_millis(250)))
//!     .bind(upstream);
//! ```

mod time;

pub use time::{interval_sampler, TokioTicker};
