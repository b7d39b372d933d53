//! Mock provider shared by the unit tests in this crate.

use async_trait::async_trait;
use flora_kernel::service::{
    ServiceCapability, ServiceError, ServiceProvider, ServiceResult,
};
use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A capability descriptor with the id doubling as the name.
pub(crate) fn capability(id: &str) -> ServiceCapability {
    ServiceCapability::new(id, id, "1.0.0")
}

/// Scriptable in-memory provider.
///
/// Invoking any known capability returns `"ok"`, except the special id
/// `"boom"` which fails with an upstream error.  Invocations are counted so
/// tests can prove which workflow steps actually ran.
pub(crate) struct MockProvider {
    id: String,
    static_caps: Vec<ServiceCapability>,
    discovered: Vec<ServiceCapability>,
    fail_discovery: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(id: &str, capability_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            static_caps: capability_ids.iter().map(|id| capability(id)).collect(),
            discovered: Vec::new(),
            fail_discovery: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_discovered(mut self, capability_ids: &[&str]) -> Self {
        self.discovered = capability_ids.iter().map(|id| capability(id)).collect();
        self
    }

    pub fn with_discovered_capability(mut self, cap: ServiceCapability) -> Self {
        self.discovered.push(cap);
        self
    }

    pub fn failing_discovery(mut self) -> Self {
        self.fail_discovery = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceProvider for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock Service"
    }

    fn capabilities(&self) -> Vec<ServiceCapability> {
        self.static_caps.clone()
    }

    async fn discover(&self) -> ServiceResult<Vec<ServiceCapability>> {
        if self.fail_discovery {
            return Err(ServiceError::Network("discovery endpoint unreachable".to_string()));
        }
        Ok(self.discovered.clone())
    }

    async fn invoke(
        &self,
        capability_id: &str,
        _parameters: &Map<String, Value>,
    ) -> ServiceResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match capability_id {
            "boom" => Err(ServiceError::Upstream {
                status: 502,
                message: "mock upstream exploded".to_string(),
            }),
            known
                if self
                    .static_caps
                    .iter()
                    .chain(self.discovered.iter())
                    .any(|c| c.id == known) =>
            {
                Ok(json!("ok"))
            }
            other => Err(ServiceError::UnsupportedCapability {
                service: self.id.clone(),
                capability: other.to_string(),
            }),
        }
    }
}
