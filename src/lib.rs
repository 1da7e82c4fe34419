//! Photon: a GeoJSON geocoding API on top of Elasticsearch and Solr.
//!
//! Inbound requests flow through:
//! parameter validation → query builder → search engine → GeoJSON normaliser
//!
//! # Architecture
//!
//! - **photon-search**: query construction, engine adapters and result
//!   normalisation (no HTTP server)
//! - **config**: TOML file plus environment overrides
//! - **server**: axum routes, shared engine state, error-to-status mapping

pub mod config;
pub mod error;
pub mod server;

pub use config::PhotonConfig;
pub use error::{PhotonError, Result};
pub use server::PhotonServer;
