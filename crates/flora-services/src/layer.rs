//! Service integration facade.
//!
//! [`ServiceLayer`] is the single entry point external callers use.  It
//! owns exactly one [`ServiceRegistry`] and one [`ServiceExecutor`],
//! constructed together and never swapped; independent layers can coexist
//! (in tests, notably) without sharing any state.

use crate::executor::ServiceExecutor;
use crate::registry::ServiceRegistry;
use flora_kernel::service::{
    ServiceCapability, ServicePlugin, ServiceProvider, ServiceRequest, ServiceResponse,
    ServiceResult,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Facade over the service registry and executor.
pub struct ServiceLayer {
    registry: Arc<ServiceRegistry>,
    executor: ServiceExecutor,
}

impl ServiceLayer {
    /// A fresh layer with an empty registry and the default timeout.
    pub fn new() -> Self {
        let registry = Arc::new(ServiceRegistry::new());
        let executor = ServiceExecutor::new(Arc::clone(&registry));
        Self { registry, executor }
    }

    /// A fresh layer with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let registry = Arc::new(ServiceRegistry::new());
        let executor = ServiceExecutor::new(Arc::clone(&registry)).with_timeout(timeout);
        Self { registry, executor }
    }

    /// Register one provider.  See
    /// [`ServiceRegistry::register_provider`] for replacement and
    /// discovery semantics.
    pub async fn register_provider(&self, provider: Arc<dyn ServiceProvider>) -> ServiceResult<()> {
        self.registry.register_provider(provider).await
    }

    /// Register several providers strictly in order.  The first failing
    /// registration halts the batch; earlier providers stay registered.
    pub async fn register_providers(
        &self,
        providers: Vec<Arc<dyn ServiceProvider>>,
    ) -> ServiceResult<()> {
        for provider in providers {
            self.registry.register_provider(provider).await?;
        }
        Ok(())
    }

    /// Register every provider shipped in a plugin bundle.
    pub async fn register_plugin(&self, plugin: ServicePlugin) -> ServiceResult<()> {
        self.register_providers(plugin.providers).await
    }

    /// Every indexed capability across all registered providers.
    pub async fn get_all_capabilities(&self) -> Vec<ServiceCapability> {
        self.registry.get_all_capabilities().await
    }

    /// Execute one request.  Never errors — see [`ServiceExecutor::execute`].
    pub async fn execute(&self, request: &ServiceRequest) -> ServiceResponse {
        self.executor.execute(request).await
    }

    /// Run requests strictly one at a time, in order, stopping immediately
    /// after the first failure.
    ///
    /// The returned vector is a prefix of the input: every successful
    /// response up to and including the first failing one.  Later steps may
    /// depend on earlier ones succeeding, so nothing past a failure is ever
    /// invoked.
    pub async fn run_workflow(&self, requests: &[ServiceRequest]) -> Vec<ServiceResponse> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            let response = self.execute(request).await;
            let failed = !response.success;
            responses.push(response);
            if failed {
                debug!(
                    completed = responses.len(),
                    total = requests.len(),
                    "workflow stopped at first failure"
                );
                break;
            }
        }
        responses
    }

    /// The owned registry, for direct lookups.
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }
}

impl Default for ServiceLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockProvider;
    use flora_kernel::service::RequestMetadata;

    #[tokio::test]
    async fn workflow_stops_at_first_failure_and_skips_the_rest() {
        let layer = ServiceLayer::new();
        let provider = Arc::new(MockProvider::new("mock", &["ping", "boom"]));
        layer.register_provider(provider.clone()).await.unwrap();

        let requests = vec![
            ServiceRequest::new("mock", "ping"),
            ServiceRequest::new("mock", "boom"),
            ServiceRequest::new("mock", "ping"),
        ];
        let responses = layer.run_workflow(&requests).await;

        assert_eq!(responses.len(), 2);
        assert!(responses[0].success);
        assert!(!responses[1].success);
        // the third step was never invoked
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn workflow_preserves_input_order_on_success() {
        let layer = ServiceLayer::new();
        layer
            .register_provider(Arc::new(MockProvider::new("mock", &["ping"])))
            .await
            .unwrap();

        let requests: Vec<ServiceRequest> = (0..3)
            .map(|i| {
                ServiceRequest::new("mock", "ping")
                    .with_metadata(RequestMetadata::new(format!("req-{i}")))
            })
            .collect();
        let responses = layer.run_workflow(&requests).await;

        assert_eq!(responses.len(), 3);
        for (i, response) in responses.iter().enumerate() {
            assert!(response.success);
            assert_eq!(response.metadata.request_id, format!("req-{i}"));
        }
    }

    #[tokio::test]
    async fn batch_registration_halts_on_the_first_error() {
        let layer = ServiceLayer::new();
        let result = layer
            .register_providers(vec![
                Arc::new(MockProvider::new("first", &["ping"])),
                Arc::new(MockProvider::new("broken", &["ping"]).failing_discovery()),
                Arc::new(MockProvider::new("last", &["ping"])),
            ])
            .await;

        assert!(result.is_err());
        assert!(layer.registry().get_provider("first").await.is_some());
        assert!(layer.registry().get_provider("broken").await.is_none());
        assert!(layer.registry().get_provider("last").await.is_none());
    }

    #[tokio::test]
    async fn plugin_bundles_register_all_their_providers() {
        let layer = ServiceLayer::new();
        let plugin = ServicePlugin {
            providers: vec![
                Arc::new(MockProvider::new("alpha", &["ping"])),
                Arc::new(MockProvider::new("beta", &["pong"])),
            ],
        };
        layer.register_plugin(plugin).await.unwrap();

        assert_eq!(layer.get_all_capabilities().await.len(), 2);
    }
}
