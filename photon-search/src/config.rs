//! Search backend configuration with sensible defaults.
//!
//! [`SearchConfig`] tells the engines where Elasticsearch and Solr live and
//! how long to wait for them. The defaults match a single-host development
//! setup.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;

/// Configuration for the search engine backends.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the Elasticsearch cluster.
    pub elasticsearch_url: String,
    /// Elasticsearch index holding the geocoding documents.
    pub elasticsearch_index: String,
    /// Base URL of the Solr core (the `/select` handler is appended).
    pub solr_url: String,
    /// Timeout for a single engine request in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, `photon/<version>` is sent.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            elasticsearch_url: "http://localhost:9200".to_owned(),
            elasticsearch_index: "photon".to_owned(),
            solr_url: "http://localhost:8983/solr/testing".to_owned(),
            timeout_seconds: 10,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `elasticsearch_index` must not be empty
    /// - both engine URLs must parse as absolute URLs
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.elasticsearch_index.trim().is_empty() {
            return Err(SearchError::Config(
                "elasticsearch_index must not be empty".into(),
            ));
        }
        parse_endpoint("elasticsearch_url", &self.elasticsearch_url)?;
        parse_endpoint("solr_url", &self.solr_url)?;
        Ok(())
    }
}

/// Parse an engine base URL, normalising it to end with a `/` so that
/// relative paths can be joined onto it.
pub(crate) fn parse_endpoint(field: &str, raw: &str) -> Result<Url, SearchError> {
    let mut url = Url::parse(raw)
        .map_err(|e| SearchError::Config(format!("{field} '{raw}' is not a valid URL: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
