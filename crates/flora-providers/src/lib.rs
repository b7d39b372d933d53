//! Backend providers for the Faces of Plants service layer.
//!
//! Each provider implements the `flora-kernel` [`ServiceProvider`] contract
//! over one external collaborator:
//!
//! - [`GbifProvider`] — occurrence search and species lookup against the
//!   GBIF REST API, always constrained to the Plantae kingdom.
//! - [`OpenAiProvider`] — natural-language query assistance through an
//!   OpenAI-compatible chat-completion endpoint.

// config module
pub mod config;

// backend modules
pub mod gbif;
pub mod llm;

pub use config::LlmConfig;
pub use gbif::{
    DEFAULT_GBIF_BASE_URL, GBIF_SERVICE_ID, GbifProvider, OccurrencePage, persona_search_params,
};
pub use llm::{LLM_SERVICE_ID, OpenAiProvider};

use flora_kernel::service::ServicePlugin;
use std::sync::Arc;

/// The platform's standard provider set, bundled for one-call registration.
pub fn standard_plugin(llm: LlmConfig) -> ServicePlugin {
    ServicePlugin {
        providers: vec![
            Arc::new(GbifProvider::from_env()),
            Arc::new(OpenAiProvider::new(llm)),
        ],
    }
}
