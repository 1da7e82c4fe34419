//! Inbound parameter validation and defaulting.
//!
//! Only a missing search term is an error. Unusable `lon`, `lat` or `limit`
//! values are silently replaced by their defaults: a bad coordinate means
//! "no proximity", not "bad request".

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::{Coordinate, Language, SearchRequest};

/// Number of hits returned when `limit` is absent or unparsable.
pub const DEFAULT_LIMIT: usize = 15;

/// Upper bound applied to every `limit`.
pub const MAX_LIMIT: usize = 50;

/// Message returned when the search term is missing.
pub const MISSING_QUERY_MESSAGE: &str = "missing search term 'q': /?q=berlin";

/// Raw query-string parameters as received by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSearchParams {
    pub q: Option<String>,
    pub lang: Option<String>,
    pub lon: Option<String>,
    pub lat: Option<String>,
    pub limit: Option<String>,
}

impl RawSearchParams {
    /// Validate and default the raw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] if `q` is absent or empty.
    pub fn parse(&self) -> Result<SearchRequest, SearchError> {
        let query = match self.q.as_deref() {
            Some(q) if !q.is_empty() => q.to_owned(),
            _ => return Err(SearchError::Validation(MISSING_QUERY_MESSAGE.into())),
        };

        Ok(SearchRequest {
            query,
            language: Language::parse_or_default(self.lang.as_deref()),
            coordinate: parse_coordinate(self.lon.as_deref(), self.lat.as_deref()),
            limit: parse_limit(self.limit.as_deref()),
        })
    }
}

/// Parse a longitude/latitude pair. Both must parse as finite floats,
/// otherwise neither is used.
pub fn parse_coordinate(lon: Option<&str>, lat: Option<&str>) -> Option<Coordinate> {
    let lon = parse_finite(lon?)?;
    let lat = parse_finite(lat?)?;
    Some(Coordinate::new(lon, lat))
}

/// Parse the `limit` parameter: a non-negative integer capped at
/// [`MAX_LIMIT`], [`DEFAULT_LIMIT`] when absent or unparsable.
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT)
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
