//! Agent-protocol bridge.
//!
//! A minimal shim for an external agent-style calling convention: a static
//! handshake advertising the capability list, and a translation from
//! `service/capability` method strings into [`ServiceRequest`]s.  The
//! translation performs no semantic validation — a method without a `/`
//! separator yields an empty capability id, which fails capability lookup
//! downstream with the standard failure envelope.

use crate::layer::ServiceLayer;
use flora_kernel::service::{RequestMetadata, ServiceCapability, ServiceRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version advertised by the handshake.  Static, not negotiated.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Server name advertised by the handshake.
pub const SERVER_NAME: &str = "Faces of Plants Service Layer";

/// Static identity of this server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// The handshake answer: protocol version, current capability list and
/// server identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub protocol_version: String,
    pub capabilities: Vec<ServiceCapability>,
    pub server_info: ServerInfo,
}

/// An inbound agent-style call: a `service/capability` method string plus
/// parameters, call id and optional caller context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCall {
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl AgentCall {
    /// Translate into the internal request shape.
    ///
    /// The method string is split on `/`: the first segment becomes the
    /// service id, the second the capability id.  Extra segments are
    /// dropped; a missing second segment leaves the capability id empty.
    pub fn into_request(self) -> ServiceRequest {
        let mut segments = self.method.split('/');
        let service_id = segments.next().unwrap_or_default().to_string();
        let capability_id = segments.next().unwrap_or_default().to_string();

        let mut metadata = RequestMetadata::new(self.id);
        if let Some(context) = self.context {
            metadata = metadata.with_context(context);
        }

        ServiceRequest {
            service_id,
            capability_id,
            parameters: self.params,
            metadata: Some(metadata),
        }
    }
}

impl ServiceLayer {
    /// Answer a protocol handshake.
    ///
    /// The protocol version and server identity are fixed; only the
    /// capability list reflects registry state.
    pub async fn handshake(&self) -> Handshake {
        Handshake {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: self.get_all_capabilities().await,
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockProvider;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn handshake_advertises_the_current_capability_list() {
        let layer = ServiceLayer::new();
        layer
            .register_provider(Arc::new(MockProvider::new("mock", &["ping", "pong"])))
            .await
            .unwrap();

        let handshake = layer.handshake().await;
        assert_eq!(handshake.protocol_version, "1.0.0");
        assert_eq!(handshake.server_info.name, SERVER_NAME);
        assert_eq!(handshake.capabilities.len(), 2);

        // wire shape is camelCase
        let value = serde_json::to_value(&handshake).unwrap();
        assert!(value.get("protocolVersion").is_some());
        assert!(value["serverInfo"].get("name").is_some());
    }

    #[test]
    fn call_translation_splits_the_method_string() {
        let mut params = Map::new();
        params.insert("q".to_string(), json!("Quercus"));
        let call = AgentCall {
            method: "gbif/species_search".to_string(),
            params,
            id: "call-9".to_string(),
            context: None,
        };

        let request = call.into_request();
        assert_eq!(request.service_id, "gbif");
        assert_eq!(request.capability_id, "species_search");
        assert_eq!(request.parameters["q"], json!("Quercus"));
        assert_eq!(request.metadata.unwrap().request_id, "call-9");
    }

    #[test]
    fn extra_method_segments_are_dropped() {
        let call = AgentCall {
            method: "gbif/species_search/extra".to_string(),
            params: Map::new(),
            id: "call-1".to_string(),
            context: None,
        };
        let request = call.into_request();
        assert_eq!(request.capability_id, "species_search");
    }

    #[tokio::test]
    async fn malformed_method_fails_downstream_with_the_standard_envelope() {
        let layer = ServiceLayer::new();
        layer
            .register_provider(Arc::new(MockProvider::new("mock", &["ping"])))
            .await
            .unwrap();

        let call = AgentCall {
            method: "mock".to_string(), // no separator
            params: Map::new(),
            id: "call-2".to_string(),
            context: None,
        };
        let request = call.into_request();
        assert_eq!(request.capability_id, "");

        let response = layer.execute(&request).await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("Capability not found"));
        assert_eq!(response.metadata.request_id, "call-2");
    }
}
