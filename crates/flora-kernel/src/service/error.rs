//! Error types for the service-integration contract.
//!
//! [`ServiceError`] covers every failure mode of the dispatch layer.
//! Inside the executor all of these are captured and rendered into the
//! failure envelope's `error` string; only registration-time failures
//! (a rejecting discovery hook) propagate to callers as `Err` values.

use thiserror::Error;

/// Failure modes of the service dispatch layer.
///
/// The `Display` rendering of a variant is exactly the `error` string an
/// external caller sees in a failure envelope.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    // ── Resolution ───────────────────────────────────────────────────────────
    /// No provider is registered under the requested service id.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// The provider exists but indexes no capability under this id.
    #[error("Capability not found: {capability} (service '{service}')")]
    CapabilityNotFound {
        service: String,
        capability: String,
    },

    /// The capability is indexed but the provider's handler does not
    /// implement it.
    #[error("Capability '{capability}' is not implemented by service '{service}'")]
    UnsupportedCapability {
        service: String,
        capability: String,
    },

    // ── Invocation ───────────────────────────────────────────────────────────
    /// The request parameters are missing or malformed for this capability.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The upstream service answered with a non-success status.
    #[error("Upstream error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure reaching the upstream service.
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream answered successfully but the body did not parse.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    /// The provider call exceeded the executor's per-request bound.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}

/// Convenience alias used throughout the service layer.
pub type ServiceResult<T> = Result<T, ServiceError>;
