//! Error handling for flowbatch bindings
//!
//! A single crate-wide error enum with message-carrying variants and a
//! `Result` alias. The three variants map to the three moments a binding can
//! fail:
//!
//! - **Configuration** ([`BatchError::SamplerMissing`]): raised synchronously
//!   by the builder, before any binding exists
//! - **Activation** ([`BatchError::WiringFailed`]): the sampler could not be
//!   wired to the upstream; surfaced as a single downstream error event
//!   followed by a normal close
//! - **Runtime** ([`BatchError::Upstream`]): a fault forwarded from the
//!   upstream sequence or from a sampler-owned timing source
//!
//! No error is retried internally.

use thiserror::Error;

/// Result type for flowbatch operations
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors surfaced by batch bindings
#[derive(Debug, Error)]
pub enum BatchError {
    /// No sampling strategy was supplied to the builder
    #[error("no sampler configured for batch binding")]
    SamplerMissing,

    /// The sampler could not be wired to the upstream during activation
    #[error("sampler wiring failed: {reason}")]
    WiringFailed { reason: String },

    /// A fault forwarded from the upstream sequence or a sampler-owned
    /// timing source
    #[error("upstream failed: {reason}")]
    Upstream { reason: String },
}

impl BatchError {
    /// Shorthand for [`BatchError::WiringFailed`]
    pub fn wiring(reason: impl Into<String>) -> Self {
        Self::WiringFailed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`BatchError::Upstream`]
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::Upstream {
            reason: reason.into(),
        }
    }
}
