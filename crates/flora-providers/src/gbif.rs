//! GBIF occurrence and species backend.
//!
//! Speaks to the GBIF REST API.  Search parameters are forwarded verbatim —
//! key names are never translated — except that results are always
//! constrained to the Plantae kingdom, whatever the caller asked for.

use async_trait::async_trait;
use flora_kernel::service::{
    ServiceCapability, ServiceError, ServiceProvider, ServiceResult, UserType,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

/// Service id under which the provider registers.
pub const GBIF_SERVICE_ID: &str = "gbif";

/// Public API root used when `GBIF_API_URL` is unset.
pub const DEFAULT_GBIF_BASE_URL: &str = "https://api.gbif.org/v1";

/// One page of occurrence search results.
///
/// Absent fields default to an empty page: no results, zero count, not the
/// end of the record set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OccurrencePage {
    pub results: Vec<Value>,
    pub count: u64,
    pub end_of_records: bool,
}

/// Proxies occurrence searches and species lookups to the GBIF REST API.
pub struct GbifProvider {
    base_url: String,
    client: Client,
}

impl GbifProvider {
    /// Provider against the public GBIF API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_GBIF_BASE_URL)
    }

    /// Provider with the API root read from `GBIF_API_URL`, falling back to
    /// the public API.
    pub fn from_env() -> Self {
        match std::env::var("GBIF_API_URL") {
            Ok(url) => Self::with_base_url(url),
            Err(_) => Self::new(),
        }
    }

    /// Provider against an explicit API root.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Occurrence search with caller parameters forwarded verbatim and the
    /// Plantae constraint applied on top.
    #[instrument(skip(self, parameters))]
    async fn search_occurrences(&self, parameters: &Map<String, Value>) -> ServiceResult<Value> {
        let query = search_query(parameters);
        let url = format!("{}/occurrence/search", self.base_url);
        debug!(url = %url, params = query.len(), "searching occurrences");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let page: OccurrencePage = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        debug!(count = page.count, end_of_records = page.end_of_records, "occurrence page received");
        serde_json::to_value(page).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }

    /// Species detail lookup by GBIF taxon key.
    #[instrument(skip(self, parameters))]
    async fn species_info(&self, parameters: &Map<String, Value>) -> ServiceResult<Value> {
        let key = parameters
            .get("key")
            .filter(|v| !v.is_null())
            .map(query_value)
            .ok_or_else(|| {
                ServiceError::InvalidParameters("species lookup requires a 'key'".to_string())
            })?;
        let url = format!("{}/species/{}", self.base_url, key);
        debug!(url = %url, "fetching species detail");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}

impl Default for GbifProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceProvider for GbifProvider {
    fn id(&self) -> &str {
        GBIF_SERVICE_ID
    }

    fn name(&self) -> &str {
        "GBIF Biodiversity Data"
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    fn capabilities(&self) -> Vec<ServiceCapability> {
        vec![
            ServiceCapability::new("species_search", "Occurrence Search", "1.0.0")
                .with_description(
                    "Search plant occurrence records; parameters are GBIF occurrence \
                     search filters passed through verbatim",
                )
                .with_input_schema(json!({
                    "type": "object",
                    "properties": {
                        "q": {"type": "string"},
                        "limit": {"type": "integer"},
                        "offset": {"type": "integer"},
                        "country": {"type": "string"},
                        "scientificName": {"type": "string"},
                        "hasCoordinate": {"type": "boolean"},
                        "year": {"type": "string"}
                    }
                }))
                .with_output_schema(json!({
                    "type": "object",
                    "properties": {
                        "results": {"type": "array"},
                        "count": {"type": "integer"},
                        "endOfRecords": {"type": "boolean"}
                    }
                })),
            ServiceCapability::new("species_info", "Species Detail", "1.0.0")
                .with_description("Look up one species record by its GBIF taxon key")
                .with_input_schema(json!({
                    "type": "object",
                    "required": ["key"],
                    "properties": {"key": {"type": ["string", "integer"]}}
                }))
                .with_output_schema(json!({"type": "object"})),
        ]
    }

    async fn invoke(
        &self,
        capability_id: &str,
        parameters: &Map<String, Value>,
    ) -> ServiceResult<Value> {
        match capability_id {
            "species_search" => self.search_occurrences(parameters).await,
            "species_info" => self.species_info(parameters).await,
            other => Err(ServiceError::UnsupportedCapability {
                service: GBIF_SERVICE_ID.to_string(),
                capability: other.to_string(),
            }),
        }
    }
}

/// Flatten the parameter map into query-string pairs.  Null values are
/// skipped; the Plantae kingdom filter always wins over a caller-supplied
/// one.
fn search_query(parameters: &Map<String, Value>) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = parameters
        .iter()
        .filter(|(key, value)| !value.is_null() && key.as_str() != "kingdom")
        .map(|(key, value)| (key.clone(), query_value(value)))
        .collect();
    query.push(("kingdom".to_string(), "Plantae".to_string()));
    query
}

/// Render a JSON value as a query-string value (strings unquoted).
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Baseline occurrence-search parameters for a persona.
///
/// Researchers get 100-record pages, citizens 20; both are restricted to
/// georeferenced records without known geospatial issues.  Caller-supplied
/// `filters` win on key collision.
pub fn persona_search_params(
    user_type: UserType,
    filters: &Map<String, Value>,
) -> Map<String, Value> {
    let limit = match user_type {
        UserType::Researcher => 100,
        UserType::Citizen => 20,
    };
    let mut params = Map::new();
    params.insert("limit".to_string(), json!(limit));
    params.insert("hasCoordinate".to_string(), json!(true));
    params.insert("hasGeospatialIssue".to_string(), json!(false));
    for (key, value) in filters {
        params.insert(key.clone(), value.clone());
    }
    params
}
