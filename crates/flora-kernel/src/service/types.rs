//! Core data types for the service-integration contract.
//!
//! These types are shared across the registry, the executor and every
//! backend provider, and carry no runtime dependencies beyond `serde` and
//! `std`.  All wire-facing structs serialize with camelCase field names so
//! the JSON shapes match what external callers exchange.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Capability
// ─────────────────────────────────────────────────────────────────────────────

/// One named, versioned operation a provider can perform.
///
/// The input/output schemas are opaque structural descriptors.  They are
/// carried for future validation and advertised through the handshake, but
/// the dispatch layer itself does not enforce them.  Capabilities are
/// created at provider registration time and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCapability {
    /// Unique id within the owning provider.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the capability does.
    pub description: String,
    /// Declared input shape (not enforced).
    #[serde(default)]
    pub input_schema: Value,
    /// Declared output shape (not enforced).
    #[serde(default)]
    pub output_schema: Value,
    /// Version string echoed into the response envelope of every successful
    /// invocation.
    pub version: String,
}

impl ServiceCapability {
    /// Construct a minimal capability descriptor.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            input_schema: Value::Null,
            output_schema: Value::Null,
            version: version.into(),
        }
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: declare the input shape.
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Builder: declare the output shape.
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = schema;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────────────────

/// The persona a request is made on behalf of.
///
/// Citizens get conservative result-page defaults; researchers get larger
/// pages.  The language-model prompt also mentions the persona so answers
/// are pitched at the right level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Citizen,
    Researcher,
}

impl UserType {
    /// Return the lowercase string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Citizen => "citizen",
            UserType::Researcher => "researcher",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// Caller-supplied correlation metadata attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    /// Correlation id echoed into the response envelope.
    pub request_id: String,
    /// Identity of the end user on whose behalf the call is made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Free-form caller context, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl RequestMetadata {
    /// Metadata with an explicit correlation id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            user_id: None,
            context: None,
        }
    }

    /// Metadata with a freshly generated correlation id.
    pub fn generated() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    /// Builder: attach the end-user identity.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Builder: attach caller context.
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }
}

/// An immutable description of one capability invocation.
///
/// `parameters` is an open key/value mapping handed to the backend handler
/// verbatim — key names are never translated.  Requests are transient
/// per-call inputs and are not stored anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    /// Id of the provider to target.
    pub service_id: String,
    /// Id of the capability to invoke, scoped to that provider.
    pub capability_id: String,
    /// Backend parameters, passed through untouched.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Optional correlation metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RequestMetadata>,
}

impl ServiceRequest {
    /// Construct a request with empty parameters and no metadata.
    pub fn new(service_id: impl Into<String>, capability_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            capability_id: capability_id.into(),
            parameters: Map::new(),
            metadata: None,
        }
    }

    /// Builder: add one backend parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Builder: replace the whole parameter map.
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Builder: attach correlation metadata.
    pub fn with_metadata(mut self, metadata: RequestMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────────────────────────────────

/// Timing and version metadata attached to every response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// The request's correlation id, or the literal `"unknown"` when the
    /// request carried none.
    pub request_id: String,
    /// Wall-clock milliseconds measured around the dispatch attempt.
    pub execution_time: u64,
    /// The invoked capability's version on success; the literal `"unknown"`
    /// on failure, since the failure may predate capability resolution.
    pub service_version: String,
}

/// The uniform envelope every invocation returns, success or failure.
///
/// Callers branch on [`success`](Self::success); the dispatch layer never
/// surfaces errors any other way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    /// Outcome discriminator.
    pub success: bool,
    /// The backend handler's raw return value; present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable failure message; present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Timing and version metadata, present on every outcome.
    pub metadata: ResponseMetadata,
}

impl ServiceResponse {
    /// A success envelope wrapping the handler's return value.
    pub fn ok(data: Value, metadata: ResponseMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata,
        }
    }

    /// A failure envelope carrying a human-readable message.
    pub fn fail(error: impl Into<String>, metadata: ResponseMetadata) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            metadata,
        }
    }
}
