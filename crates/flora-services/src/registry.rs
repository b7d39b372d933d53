//! In-memory service registry.
//!
//! Holds every registered provider plus a composite index of their
//! capabilities for O(1) lookup at dispatch time.  Entries are only ever
//! inserted or overwritten — there is no deregistration, so the registry
//! grows monotonically over the process lifetime.

use flora_kernel::service::{ServiceCapability, ServiceProvider, ServiceResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A provider together with its capability list as expanded at
/// registration time (the static list plus whatever `discover` returned).
struct RegisteredService {
    provider: Arc<dyn ServiceProvider>,
    capabilities: Vec<ServiceCapability>,
}

/// Registry of providers and their capabilities.
///
/// Two maps are kept consistent: providers by id, and capabilities by the
/// composite key `"{service}:{capability}"`.  Every capability reachable
/// through a stored provider is also reachable through the composite index
/// and vice versa.  Both maps sit behind [`RwLock`]s — writes happen only
/// in [`register_provider`](Self::register_provider), reads everywhere
/// else.  When both locks are taken, the provider map is locked first.
pub struct ServiceRegistry {
    providers: RwLock<HashMap<String, RegisteredService>>,
    capabilities: RwLock<HashMap<String, ServiceCapability>>,
}

fn composite_key(service_id: &str, capability_id: &str) -> String {
    format!("{service_id}:{capability_id}")
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
            capabilities: RwLock::new(HashMap::new()),
        }
    }

    /// Register `provider`, replacing any previous provider with the same id.
    ///
    /// When the provider implements `discover`, it is invoked exactly once
    /// here and the returned capabilities are appended to the static list
    /// before indexing — a one-shot expansion, never re-run on lookup.  If
    /// discovery fails the provider is not stored at all and the error
    /// propagates.
    ///
    /// Replacement is last-write-wins on the whole provider: every
    /// composite-index entry of the previous registration is evicted, even
    /// for capability ids the new registration does not carry.  Duplicate
    /// capability ids within one provider overwrite each other silently.
    pub async fn register_provider(&self, provider: Arc<dyn ServiceProvider>) -> ServiceResult<()> {
        let mut capabilities = provider.capabilities();
        let discovered = provider.discover().await?;
        if !discovered.is_empty() {
            debug!(
                service = provider.id(),
                discovered = discovered.len(),
                "discovery hook expanded capability list"
            );
        }
        capabilities.extend(discovered);

        let id = provider.id().to_string();
        let mut providers = self.providers.write().await;
        let mut index = self.capabilities.write().await;

        if let Some(previous) = providers.remove(&id) {
            for capability in &previous.capabilities {
                index.remove(&composite_key(&id, &capability.id));
            }
        }
        for capability in &capabilities {
            index.insert(composite_key(&id, &capability.id), capability.clone());
        }

        info!(
            service = %id,
            capabilities = capabilities.len(),
            "registered service provider"
        );
        providers.insert(
            id,
            RegisteredService {
                provider,
                capabilities,
            },
        );
        Ok(())
    }

    /// Look up a provider by id.  Returns `None` if none is registered.
    pub async fn get_provider(&self, id: &str) -> Option<Arc<dyn ServiceProvider>> {
        let providers = self.providers.read().await;
        providers.get(id).map(|entry| Arc::clone(&entry.provider))
    }

    /// Look up one capability by provider id and capability id.
    pub async fn get_capability(
        &self,
        service_id: &str,
        capability_id: &str,
    ) -> Option<ServiceCapability> {
        let index = self.capabilities.read().await;
        index.get(&composite_key(service_id, capability_id)).cloned()
    }

    /// Every indexed capability across all providers.  Order is not
    /// significant.
    pub async fn get_all_capabilities(&self) -> Vec<ServiceCapability> {
        let index = self.capabilities.read().await;
        index.values().cloned().collect()
    }

    /// Every registered provider, for enumeration by orchestration code.
    pub async fn discover_services(&self) -> Vec<Arc<dyn ServiceProvider>> {
        let providers = self.providers.read().await;
        providers
            .values()
            .map(|entry| Arc::clone(&entry.provider))
            .collect()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{MockProvider, capability};

    fn sorted_ids(capabilities: &[ServiceCapability]) -> Vec<String> {
        let mut ids: Vec<String> = capabilities.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn register_and_lookup() {
        let registry = ServiceRegistry::new();
        registry
            .register_provider(Arc::new(MockProvider::new("mock", &["ping"])))
            .await
            .unwrap();

        assert!(registry.get_provider("mock").await.is_some());
        assert!(registry.get_provider("unknown").await.is_none());
        assert!(registry.get_capability("mock", "ping").await.is_some());
        assert!(registry.get_capability("mock", "pong").await.is_none());
    }

    #[tokio::test]
    async fn discovery_expands_the_capability_list() {
        let registry = ServiceRegistry::new();
        let provider = MockProvider::new("mock", &["ping"]).with_discovered(&["traceroute"]);
        registry.register_provider(Arc::new(provider)).await.unwrap();

        let all = registry.get_all_capabilities().await;
        assert_eq!(sorted_ids(&all), vec!["ping", "traceroute"]);
        assert!(registry.get_capability("mock", "traceroute").await.is_some());
    }

    #[tokio::test]
    async fn failed_discovery_registers_nothing() {
        let registry = ServiceRegistry::new();
        let provider = MockProvider::new("mock", &["ping"]).failing_discovery();

        assert!(registry.register_provider(Arc::new(provider)).await.is_err());
        assert!(registry.get_provider("mock").await.is_none());
        assert!(registry.get_all_capabilities().await.is_empty());
    }

    #[tokio::test]
    async fn reregistration_is_last_write_wins() {
        let registry = ServiceRegistry::new();
        registry
            .register_provider(Arc::new(MockProvider::new("mock", &["ping", "pong"])))
            .await
            .unwrap();
        registry
            .register_provider(Arc::new(MockProvider::new("mock", &["pong", "echo"])))
            .await
            .unwrap();

        // non-colliding capability of the first registration is evicted
        assert!(registry.get_capability("mock", "ping").await.is_none());
        assert!(registry.get_capability("mock", "pong").await.is_some());
        assert!(registry.get_capability("mock", "echo").await.is_some());
        assert_eq!(registry.discover_services().await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_capability_ids_overwrite_silently() {
        let registry = ServiceRegistry::new();
        let provider = MockProvider::new("mock", &["ping"]).with_discovered_capability(
            capability("ping").with_description("rediscovered"),
        );
        registry.register_provider(Arc::new(provider)).await.unwrap();

        let stored = registry.get_capability("mock", "ping").await.unwrap();
        assert_eq!(stored.description, "rediscovered");
        assert_eq!(registry.get_all_capabilities().await.len(), 1);
    }

    #[tokio::test]
    async fn capability_listing_is_idempotent() {
        let registry = ServiceRegistry::new();
        registry
            .register_provider(Arc::new(MockProvider::new("mock", &["ping", "pong"])))
            .await
            .unwrap();

        let first = sorted_ids(&registry.get_all_capabilities().await);
        let second = sorted_ids(&registry.get_all_capabilities().await);
        assert_eq!(first, second);
    }
}
