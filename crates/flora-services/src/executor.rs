//! Request dispatcher.
//!
//! [`ServiceExecutor::execute`] is the single catch boundary of the
//! dispatch layer: resolution failures, provider errors and timeouts are
//! all captured into a failure envelope.  Callers branch on
//! `response.success`, never on errors, which keeps every invocation
//! infallible at the type level.

use crate::registry::ServiceRegistry;
use flora_kernel::service::{
    ResponseMetadata, ServiceError, ServiceRequest, ServiceResponse,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Default bound on a single provider invocation.
pub const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Correlation id reported when the request carried none, and the version
/// reported when the failure may predate capability resolution.
const UNKNOWN: &str = "unknown";

/// Executes [`ServiceRequest`]s against the registry's providers.
pub struct ServiceExecutor {
    registry: Arc<ServiceRegistry>,
    timeout: Duration,
}

impl ServiceExecutor {
    /// Create an executor over `registry` with the default timeout.
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_EXECUTE_TIMEOUT,
        }
    }

    /// Builder: override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute one request, producing a response envelope.
    ///
    /// Elapsed time is measured around the whole attempt, so even failure
    /// envelopes carry how long resolution and the (possibly partial)
    /// invocation took.
    #[instrument(
        skip(self, request),
        fields(service = %request.service_id, capability = %request.capability_id)
    )]
    pub async fn execute(&self, request: &ServiceRequest) -> ServiceResponse {
        let start = Instant::now();
        let request_id = request
            .metadata
            .as_ref()
            .map(|m| m.request_id.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());

        match self.dispatch(request).await {
            Ok((data, service_version)) => {
                let execution_time = elapsed_ms(start);
                debug!(elapsed_ms = execution_time, "capability dispatched");
                ServiceResponse::ok(
                    data,
                    ResponseMetadata {
                        request_id,
                        execution_time,
                        service_version,
                    },
                )
            }
            Err(err) => {
                warn!(error = %err, "capability dispatch failed");
                ServiceResponse::fail(
                    err.to_string(),
                    ResponseMetadata {
                        request_id,
                        execution_time: elapsed_ms(start),
                        service_version: UNKNOWN.to_string(),
                    },
                )
            }
        }
    }

    /// Resolve the provider and capability, then run the bounded invocation.
    /// Returns the handler's raw value and the capability version to echo.
    async fn dispatch(&self, request: &ServiceRequest) -> Result<(Value, String), ServiceError> {
        let provider = self
            .registry
            .get_provider(&request.service_id)
            .await
            .ok_or_else(|| ServiceError::ServiceNotFound(request.service_id.clone()))?;
        let capability = self
            .registry
            .get_capability(&request.service_id, &request.capability_id)
            .await
            .ok_or_else(|| ServiceError::CapabilityNotFound {
                service: request.service_id.clone(),
                capability: request.capability_id.clone(),
            })?;

        let invocation = provider.invoke(&request.capability_id, &request.parameters);
        let data = tokio::time::timeout(self.timeout, invocation)
            .await
            .map_err(|_| ServiceError::Timeout(duration_ms(self.timeout)))??;
        Ok((data, capability.version))
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    duration_ms(start.elapsed())
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
