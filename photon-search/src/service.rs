//! Geocoding pipeline: engine query followed by GeoJSON normalisation.

use crate::engine::GeocodingEngine;
use crate::error::SearchError;
use crate::geojson::to_feature_collection;
use crate::types::{EngineKind, FeatureCollection, Hit, SearchRequest};

/// Runs validated requests against one engine and normalises the hits.
///
/// Holds no per-request state; share it behind an `Arc` across tasks.
#[derive(Debug, Clone)]
pub struct Geocoder<E> {
    engine: E,
}

impl<E: GeocodingEngine> Geocoder<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn kind(&self) -> EngineKind {
        self.engine.kind()
    }

    /// Search and return a feature collection in engine hit order.
    ///
    /// # Errors
    ///
    /// Engine failures are logged at warn level and returned unchanged;
    /// [`SearchError::DataShape`] is returned if any hit cannot be converted.
    pub async fn search(&self, request: &SearchRequest) -> Result<FeatureCollection, SearchError> {
        let engine = self.engine.kind();
        tracing::trace!(%engine, query = %request.query, "geocoding search");

        let hits = self.engine.search(request).await.inspect_err(|err| {
            tracing::warn!(%engine, error = %err, "engine query failed");
        })?;
        for (rank, hit) in hits.iter().enumerate() {
            tracing::trace!(%engine, rank, osm_id = ?hit.osm_id, score = ?hit.score, "engine hit");
        }

        let collection = to_feature_collection(&hits, request.language).inspect_err(|err| {
            tracing::warn!(%engine, error = %err, "engine returned a malformed hit");
        })?;

        tracing::debug!(
            %engine,
            language = %request.language,
            proximity = request.coordinate.is_some(),
            count = collection.features.len(),
            top_score = ?top_score(&hits),
            "geocoding search complete"
        );
        Ok(collection)
    }
}

/// Highest engine-reported score among `hits`, ignoring unscored ones.
fn top_score(hits: &[Hit]) -> Option<f64> {
    hits.iter().filter_map(|hit| hit.score).reduce(f64::max)
}
