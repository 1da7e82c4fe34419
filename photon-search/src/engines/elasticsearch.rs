//! Elasticsearch backend.
//!
//! Sends the query DSL body from [`crate::query::build_elasticsearch_query`]
//! to `<endpoint>/<index>/_search`. Localized attributes are stored as
//! nested objects keyed by language code, with a `default` entry:
//!
//! ```json
//! {"name": {"default": "München", "en": "Munich"}}
//! ```

use serde_json::{Map, Value};
use url::Url;

use crate::config::{parse_endpoint, SearchConfig};
use crate::engine::GeocodingEngine;
use crate::error::SearchError;
use crate::query::build_elasticsearch_query;
use crate::types::{EngineKind, Hit, Localized, SearchRequest};

use super::{parse_osm_id, scalar_to_string};

/// Key holding the language-neutral value in nested localized objects.
const DEFAULT_KEY: &str = "default";

/// Elasticsearch geocoding backend.
#[derive(Debug, Clone)]
pub struct ElasticsearchEngine {
    client: reqwest::Client,
    search_url: Url,
}

impl ElasticsearchEngine {
    /// Create an engine searching `index` on the cluster at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `endpoint` is not a valid URL.
    pub fn new(client: reqwest::Client, endpoint: &str, index: &str) -> Result<Self, SearchError> {
        let base = parse_endpoint("elasticsearch_url", endpoint)?;
        let search_url = base
            .join(&format!("{index}/_search"))
            .map_err(|e| SearchError::Config(format!("invalid index '{index}': {e}")))?;
        Ok(Self { client, search_url })
    }

    /// Create an engine from the `elasticsearch_*` settings of `config`.
    pub fn from_config(client: reqwest::Client, config: &SearchConfig) -> Result<Self, SearchError> {
        Self::new(
            client,
            &config.elasticsearch_url,
            &config.elasticsearch_index,
        )
    }

    /// The `_search` URL requests are sent to.
    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

impl GeocodingEngine for ElasticsearchEngine {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Hit>, SearchError> {
        let body = build_elasticsearch_query(request);
        tracing::debug!(query = %body, "Elasticsearch query");

        let response = self
            .client
            .post(self.search_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Elasticsearch", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Elasticsearch HTTP error: {e}")))?;

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("Elasticsearch", e))?;

        tracing::trace!(bytes = text.len(), "Elasticsearch response received");

        parse_elasticsearch_response(&text)
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Elasticsearch
    }
}

/// Parse an Elasticsearch `_search` response body into hits.
///
/// Extracted as a separate function for testability with canned responses.
pub fn parse_elasticsearch_response(body: &str) -> Result<Vec<Hit>, SearchError> {
    let response: Value = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Elasticsearch response is not JSON: {e}")))?;

    let hits = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Parse("Elasticsearch response has no hits.hits array".into()))?;

    let parsed = hits
        .iter()
        .map(|hit| {
            let source = hit
                .get("_source")
                .and_then(Value::as_object)
                .ok_or_else(|| SearchError::Parse("Elasticsearch hit without _source".into()))?;
            let mut parsed = parse_source(source)?;
            parsed.score = hit.get("_score").and_then(Value::as_f64);
            Ok(parsed)
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    tracing::debug!(count = parsed.len(), "Elasticsearch hits parsed");
    Ok(parsed)
}

/// Parse a single `_source` document.
fn parse_source(source: &Map<String, Value>) -> Result<Hit, SearchError> {
    let text = |key: &str| source.get(key).and_then(scalar_to_string);
    let localized = |key: &str| source.get(key).map(nested_localized).unwrap_or_default();

    Ok(Hit {
        osm_id: source.get("osm_id").map(parse_osm_id).transpose()?,
        osm_key: text("osm_key"),
        osm_value: text("osm_value"),
        street: text("street"),
        postcode: text("postcode"),
        housenumber: text("housenumber"),
        coordinate: text("coordinate"),
        score: None,
        name: localized("name"),
        country: localized("country"),
        city: localized("city"),
    })
}

/// Read a nested `{"<lang>": ..., "default": ...}` object. A bare string is
/// treated as the default value.
fn nested_localized(value: &Value) -> Localized {
    let mut localized = Localized::new();
    match value {
        Value::Object(entries) => {
            for (key, entry) in entries {
                let Some(text) = scalar_to_string(entry) else {
                    continue;
                };
                if key == DEFAULT_KEY {
                    localized.set_fallback(text);
                } else {
                    localized.insert(key.clone(), text);
                }
            }
        }
        other => {
            if let Some(text) = scalar_to_string(other) {
                localized.set_fallback(text);
            }
        }
    }
    localized
}
