//! The provider contract.
//!
//! A [`ServiceProvider`] is a named source of capabilities: the GBIF REST
//! API, a chat-completion endpoint, or any future backend.  Providers are
//! registered as trait objects, so the set of backends is open — the
//! dispatch layer never needs to know concrete provider types.

use super::error::ServiceResult;
use super::types::ServiceCapability;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A named source of one or more capabilities.
///
/// # Example
///
/// ```rust,ignore
/// use flora_kernel::service::{ServiceCapability, ServiceProvider, ServiceResult};
///
/// struct EchoProvider;
///
/// #[async_trait::async_trait]
/// impl ServiceProvider for EchoProvider {
///     fn id(&self) -> &str {
///         "echo"
///     }
///
///     fn name(&self) -> &str {
///         "Echo Service"
///     }
///
///     fn capabilities(&self) -> Vec<ServiceCapability> {
///         vec![ServiceCapability::new("echo", "Echo", "1.0.0")]
///     }
///
///     async fn invoke(
///         &self,
///         capability_id: &str,
///         parameters: &serde_json::Map<String, serde_json::Value>,
///     ) -> ServiceResult<serde_json::Value> {
///         Ok(serde_json::Value::Object(parameters.clone()))
///     }
/// }
/// ```
#[async_trait]
pub trait ServiceProvider: Send + Sync {
    /// Unique id across the registry.  Re-registering a provider under an
    /// existing id replaces the previous entry wholesale.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Base URL of the remote service, when there is one.
    fn base_url(&self) -> Option<&str> {
        None
    }

    /// Statically declared capabilities.  The registry may extend this list
    /// with whatever [`discover`](Self::discover) returns.
    fn capabilities(&self) -> Vec<ServiceCapability>;

    /// Credential exchange with the remote service.  Reserved: the dispatch
    /// path does not call this yet.
    async fn authenticate(&self) -> ServiceResult<()> {
        Ok(())
    }

    /// Dynamic capability discovery, invoked exactly once at registration
    /// time.  The returned capabilities are appended to
    /// [`capabilities`](Self::capabilities) before indexing.  An error here
    /// aborts the whole registration.
    async fn discover(&self) -> ServiceResult<Vec<ServiceCapability>> {
        Ok(Vec::new())
    }

    /// Execute one capability with the given parameters.
    ///
    /// Implementations match on `capability_id` to pick the concrete remote
    /// operation and return
    /// [`ServiceError::UnsupportedCapability`](super::ServiceError::UnsupportedCapability)
    /// for ids they do not handle.
    async fn invoke(
        &self,
        capability_id: &str,
        parameters: &Map<String, Value>,
    ) -> ServiceResult<Value>;
}

/// A bundle of providers shipped and registered together.
pub struct ServicePlugin {
    /// Providers registered in order when the plugin is installed.
    pub providers: Vec<Arc<dyn ServiceProvider>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl ServiceProvider for EchoProvider {
        fn id(&self) -> &str {
            "echo"
        }

        fn name(&self) -> &str {
            "Echo Service"
        }

        fn capabilities(&self) -> Vec<ServiceCapability> {
            vec![ServiceCapability::new("echo", "Echo", "1.0.0")]
        }

        async fn invoke(
            &self,
            _capability_id: &str,
            parameters: &Map<String, Value>,
        ) -> ServiceResult<Value> {
            Ok(Value::Object(parameters.clone()))
        }
    }

    #[tokio::test]
    async fn optional_hooks_default_to_no_ops() {
        let provider = EchoProvider;
        assert!(provider.base_url().is_none());
        assert!(provider.authenticate().await.is_ok());
        assert!(provider.discover().await.unwrap().is_empty());
    }
}
