//! Flora dispatch runtime — concrete implementations of the service-layer
//! kernel contract.
//!
//! The runtime is three small pieces wired together by [`ServiceLayer`]:
//!
//! ```text
//! caller ──▶ ServiceLayer::execute(request)
//!               │
//!               ▼
//!            ServiceExecutor ── resolve ──▶ ServiceRegistry
//!               │                             providers by id
//!               │                             capabilities by "service:capability"
//!               ▼
//!            Arc<dyn ServiceProvider>::invoke(capability, parameters)
//!               │
//!               ▼
//!            ServiceResponse  (uniform envelope, success or failure)
//! ```
//!
//! Every failure inside `execute` — unknown service, unknown capability,
//! provider error, timeout — is captured into the failure envelope; the
//! call itself never errors.  Registration failures (a rejecting discovery
//! hook) propagate normally, since registration happens outside the
//! request/response protocol.

pub mod bridge;
pub mod executor;
pub mod layer;
pub mod registry;

// ── Flat re-exports ────────────────────────────────────────────────────────

pub use bridge::{AgentCall, Handshake, PROTOCOL_VERSION, SERVER_NAME, ServerInfo};
pub use executor::{DEFAULT_EXECUTE_TIMEOUT, ServiceExecutor};
pub use layer::ServiceLayer;
pub use registry::ServiceRegistry;

#[cfg(test)]
pub(crate) mod test_util;
