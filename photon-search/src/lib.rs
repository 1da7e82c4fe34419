//! # photon-search
//!
//! Query construction and result normalisation for the Photon geocoding API.
//!
//! ## Design
//!
//! - Validates raw `q`/`lang`/`lon`/`lat`/`limit` parameters into a [`SearchRequest`]
//! - Builds engine-native queries: an Elasticsearch `dis_max` over the analysed
//!   and raw `collector.<lang>` fields, optionally wrapped in a score-replacing
//!   distance decay, or Solr `/select` parameters
//! - Parses engine responses into typed [`Hit`] values, one adapter per engine
//! - Normalises hits into a GeoJSON [`FeatureCollection`] with language
//!   fallback and housenumber/street composition
//!
//! Engines own an injected [`reqwest::Client`]; there is no global state.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> photon_search::Result<()> {
//! use photon_search::{ElasticsearchEngine, Geocoder, RawSearchParams, SearchConfig};
//!
//! let config = SearchConfig::default();
//! let client = photon_search::http::build_client(&config)?;
//! let geocoder = Geocoder::new(ElasticsearchEngine::from_config(client, &config)?);
//!
//! let params = RawSearchParams {
//!     q: Some("berlin".into()),
//!     ..Default::default()
//! };
//! let collection = geocoder.search(&params.parse()?).await?;
//! println!("{} features", collection.features.len());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod geojson;
pub mod http;
pub mod query;
pub mod request;
pub mod service;
pub mod types;

pub use config::SearchConfig;
pub use engine::GeocodingEngine;
pub use engines::{ElasticsearchEngine, SolrEngine};
pub use error::{Result, SearchError};
pub use request::RawSearchParams;
pub use service::Geocoder;
pub use types::{
    Coordinate, EngineKind, Feature, FeatureCollection, Geometry, Hit, Language, Localized,
    Properties, SearchRequest,
};
