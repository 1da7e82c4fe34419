//! Trait definition for pluggable search engine backends.
//!
//! Each backend (Elasticsearch, Solr) implements [`GeocodingEngine`] to
//! turn a [`SearchRequest`] into typed [`Hit`] records. Normalisation into
//! GeoJSON is shared and lives in [`crate::geojson`].

use crate::error::SearchError;
use crate::types::{EngineKind, Hit, SearchRequest};

/// A pluggable geocoding search backend.
///
/// Implementors handle:
///
/// - Query construction for their native query language
/// - A single HTTP request, bounded by the client timeout and never retried
/// - Parsing the native response into [`Hit`] values, in engine order
///
/// All implementations must be `Send + Sync` so one instance can serve
/// concurrent requests.
pub trait GeocodingEngine: Send + Sync {
    /// Run `request` against the engine and return its hits in rank order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Timeout`] or [`SearchError::Http`] when the
    /// engine cannot be reached, [`SearchError::Parse`] when the response
    /// is not in the expected format and [`SearchError::DataShape`] when a
    /// single hit carries a malformed field.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<Vec<Hit>, SearchError>> + Send;

    /// Returns which [`EngineKind`] this implementation represents.
    fn kind(&self) -> EngineKind;
}
