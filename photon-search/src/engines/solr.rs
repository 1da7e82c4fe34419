//! Solr backend.
//!
//! Queries the `/select` handler of a Solr core. Language selection and
//! proximity ranking live in Solr request handlers (`qt=<lang>` and
//! `qt=<lang>_loc`). Localized attributes are flat fields suffixed by the
//! language code, with the unsuffixed field as fallback:
//!
//! ```json
//! {"name": "München", "name_en": "Munich"}
//! ```

use serde_json::{json, Map, Value};
use url::Url;

use crate::config::{parse_endpoint, SearchConfig};
use crate::engine::GeocodingEngine;
use crate::error::SearchError;
use crate::query::build_solr_params;
use crate::types::{EngineKind, Hit, Language, Localized, SearchRequest};

use super::{parse_osm_id, scalar_to_string};

/// Query used by [`SolrEngine::raw_search`] when none is given.
pub const MATCH_ALL_QUERY: &str = "*:*";

/// Rows returned by [`SolrEngine::raw_search`].
const RAW_SEARCH_ROWS: &str = "10";

/// Solr geocoding backend.
#[derive(Debug, Clone)]
pub struct SolrEngine {
    client: reqwest::Client,
    select_url: Url,
}

impl SolrEngine {
    /// Create an engine querying the Solr core at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `endpoint` is not a valid URL.
    pub fn new(client: reqwest::Client, endpoint: &str) -> Result<Self, SearchError> {
        let base = parse_endpoint("solr_url", endpoint)?;
        let select_url = base
            .join("select")
            .map_err(|e| SearchError::Config(format!("invalid solr_url '{endpoint}': {e}")))?;
        Ok(Self { client, select_url })
    }

    /// Create an engine from the `solr_url` setting of `config`.
    pub fn from_config(client: reqwest::Client, config: &SearchConfig) -> Result<Self, SearchError> {
        Self::new(client, &config.solr_url)
    }

    /// The `/select` URL requests are sent to.
    pub fn select_url(&self) -> &Url {
        &self.select_url
    }

    /// Run a plain highlighted query and return Solr's documents and
    /// highlighting verbatim as `{"docs": [...], "highlight": {...}}`.
    ///
    /// Intended for inspecting the index, not for geocoding.
    pub async fn raw_search(&self, query: Option<&str>) -> Result<Value, SearchError> {
        let q = query.filter(|q| !q.is_empty()).unwrap_or(MATCH_ALL_QUERY);
        tracing::debug!(query = q, "Solr raw search");

        let response = self
            .get_json(&[("q", q), ("hl", "true"), ("rows", RAW_SEARCH_ROWS), ("wt", "json")])
            .await?;

        let docs = response
            .pointer("/response/docs")
            .cloned()
            .ok_or_else(|| SearchError::Parse("Solr response has no response.docs".into()))?;
        let highlight = response
            .get("highlighting")
            .cloned()
            .unwrap_or_else(|| json!({}));

        Ok(json!({"docs": docs, "highlight": highlight}))
    }

    async fn get_json<Q: serde::Serialize + ?Sized>(&self, params: &Q) -> Result<Value, SearchError> {
        let response = self
            .client
            .get(self.select_url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Solr", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Solr HTTP error: {e}")))?;

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("Solr", e))?;

        tracing::trace!(bytes = text.len(), "Solr response received");

        serde_json::from_str(&text)
            .map_err(|e| SearchError::Parse(format!("Solr response is not JSON: {e}")))
    }
}

impl GeocodingEngine for SolrEngine {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Hit>, SearchError> {
        let params = build_solr_params(request);
        tracing::debug!(q = %params.q, qt = %params.qt, pt = ?params.pt, rows = params.rows, "Solr query");

        let response = self.get_json(&params).await?;
        parse_solr_value(&response)
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Solr
    }
}

/// Parse a Solr JSON response body into hits.
///
/// Extracted as a separate function for testability with canned responses.
pub fn parse_solr_response(body: &str) -> Result<Vec<Hit>, SearchError> {
    let response: Value = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Solr response is not JSON: {e}")))?;
    parse_solr_value(&response)
}

fn parse_solr_value(response: &Value) -> Result<Vec<Hit>, SearchError> {
    let docs = response
        .pointer("/response/docs")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Parse("Solr response has no response.docs array".into()))?;

    let hits = docs
        .iter()
        .map(|doc| {
            doc.as_object()
                .ok_or_else(|| SearchError::Parse("Solr document is not an object".into()))
                .and_then(parse_doc)
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    tracing::debug!(count = hits.len(), "Solr documents parsed");
    Ok(hits)
}

/// Parse a single flat Solr document.
fn parse_doc(doc: &Map<String, Value>) -> Result<Hit, SearchError> {
    let text = |key: &str| doc.get(key).and_then(field_text);

    Ok(Hit {
        osm_id: doc.get("osm_id").map(first_value).map(parse_osm_id).transpose()?,
        osm_key: text("osm_key"),
        osm_value: text("osm_value"),
        street: text("street"),
        postcode: text("postcode"),
        housenumber: text("housenumber"),
        coordinate: text("coordinate"),
        score: doc.get("score").and_then(Value::as_f64),
        name: flat_localized(doc, "name"),
        country: flat_localized(doc, "country"),
        city: flat_localized(doc, "city"),
    })
}

/// Collect `<attr>_<lang>` fields plus the unsuffixed `<attr>` fallback.
fn flat_localized(doc: &Map<String, Value>, attr: &str) -> Localized {
    let mut localized = Localized::new();
    for language in Language::all() {
        let key = format!("{attr}_{}", language.code());
        if let Some(value) = doc.get(&key).and_then(field_text) {
            localized.insert(language.code().to_owned(), value);
        }
    }
    if let Some(value) = doc.get(attr).and_then(field_text) {
        localized.set_fallback(value);
    }
    localized
}

/// Multi-valued fields come back as arrays; only the first value is used.
fn first_value(value: &Value) -> &Value {
    match value {
        Value::Array(values) => values.first().unwrap_or(value),
        other => other,
    }
}

fn field_text(value: &Value) -> Option<String> {
    scalar_to_string(first_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_RESPONSE: &str = r#"{
        "responseHeader": {"status": 0, "QTime": 2},
        "response": {
            "numFound": 2,
            "start": 0,
            "docs": [
                {
                    "osm_id": 62422,
                    "osm_key": "place",
                    "osm_value": "city",
                    "coordinate": "52.5170365,13.3888599",
                    "name": "Berlin",
                    "name_it": "Berlino",
                    "country": "Deutschland",
                    "country_en": "Germany",
                    "country_fr": "Allemagne"
                },
                {
                    "osm_id": "77",
                    "street": "Via del Corso",
                    "housenumber": "12",
                    "postcode": 186,
                    "coordinate": "41.9,12.48",
                    "city": ["Roma"],
                    "city_en": "Rome"
                }
            ]
        }
    }"#;

    #[test]
    fn parse_mock_response_returns_docs_in_order() {
        let hits = parse_solr_response(MOCK_RESPONSE).expect("should parse");
        assert_eq!(hits.len(), 2);

        assert_eq!(hits[0].osm_id, Some(62422));
        assert_eq!(hits[0].osm_value.as_deref(), Some("city"));
        assert_eq!(hits[0].coordinate.as_deref(), Some("52.5170365,13.3888599"));

        assert_eq!(hits[1].osm_id, Some(77));
        assert_eq!(hits[1].street.as_deref(), Some("Via del Corso"));
        assert_eq!(hits[1].postcode.as_deref(), Some("186"));
    }

    #[test]
    fn flat_fields_resolve_with_unsuffixed_fallback() {
        let hits = parse_solr_response(MOCK_RESPONSE).expect("should parse");
        assert_eq!(hits[0].name.resolve(Language::It), Some("Berlino"));
        assert_eq!(hits[0].name.resolve(Language::En), Some("Berlin"));
        assert_eq!(hits[0].country.resolve(Language::Fr), Some("Allemagne"));
        assert_eq!(hits[0].country.resolve(Language::De), Some("Deutschland"));
        assert_eq!(hits[1].city.resolve(Language::En), Some("Rome"));
        assert_eq!(hits[1].city.resolve(Language::It), Some("Roma"));
    }

    #[test]
    fn missing_docs_is_parse_error() {
        let err = parse_solr_response(r#"{"error": {"msg": "undefined field"}}"#).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn empty_docs_is_ok() {
        let hits = parse_solr_response(r#"{"response": {"docs": []}}"#).expect("parse");
        assert!(hits.is_empty());
    }

    #[test]
    fn multi_valued_osm_id_uses_first_value() {
        let hits =
            parse_solr_response(r#"{"response": {"docs": [{"osm_id": [5, 6]}]}}"#).expect("parse");
        assert_eq!(hits[0].osm_id, Some(5));
    }

    #[test]
    fn select_url_appended_to_core() {
        let engine = SolrEngine::new(reqwest::Client::new(), "http://localhost:8983/solr/testing")
            .expect("valid");
        assert_eq!(
            engine.select_url().as_str(),
            "http://localhost:8983/solr/testing/select"
        );
        assert_eq!(engine.kind(), EngineKind::Solr);
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SolrEngine>();
    }
}
