//! Service-integration kernel contract.
//!
//! This module defines the *value types and trait interfaces* shared by
//! every piece of the service layer.  No concrete implementations live here
//! — those belong in `flora-services` (dispatch runtime) and
//! `flora-providers` (network backends).
//!
//! # Architecture mapping
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              flora-kernel  (this module)                    │
//! │  ServiceProvider trait      ServiceCapability               │
//! │  ServiceRequest/Response    ServiceError                    │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │  depends on
//! ┌──────────────────────────▼──────────────────────────────────┐
//! │              flora-services  (runtime crate)                │
//! │  ServiceRegistry  (provider + capability index)             │
//! │  ServiceExecutor  (timed, bounded dispatch)                 │
//! │  ServiceLayer     (facade + agent-protocol bridge)          │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │  dispatches to
//! ┌──────────────────────────▼──────────────────────────────────┐
//! │              flora-providers  (backend crate)               │
//! │  GbifProvider    (occurrence/species REST API)              │
//! │  OpenAiProvider  (chat-completion REST API)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod types;

// ── Flat re-exports ────────────────────────────────────────────────────────

pub use error::{ServiceError, ServiceResult};
pub use provider::{ServicePlugin, ServiceProvider};
pub use types::{
    RequestMetadata, ResponseMetadata, ServiceCapability, ServiceRequest, ServiceResponse,
    UserType,
};
