//! HTTP surface of the geocoding API.
//!
//! ## Endpoints
//!
//! - `GET /api/`: geocode via Elasticsearch
//! - `GET /api/solr/`: geocode via Solr
//! - `GET /search/`: raw highlighted Solr query, for inspecting the index
//! - `GET /health`: liveness probe
//!
//! The geocoding endpoints take `q`, `lang`, `lon`, `lat` and `limit` and
//! answer with a GeoJSON `FeatureCollection`.

use axum::Router;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use photon_search::{
    ElasticsearchEngine, EngineKind, FeatureCollection, Geocoder, GeocodingEngine,
    RawSearchParams, SolrEngine,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Instrument, info};
use uuid::Uuid;

use crate::config::PhotonConfig;
use crate::error::{ApiError, PhotonError};

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers. Engines hold the pooled HTTP client.
#[derive(Clone)]
struct AppState {
    elasticsearch: Arc<Geocoder<ElasticsearchEngine>>,
    solr: Arc<Geocoder<SolrEngine>>,
}

/// Query parameters of `GET /search/`.
#[derive(Debug, Deserialize)]
struct RawSearchQuery {
    q: Option<String>,
}

/// Build the API router for the given engines.
pub fn router(elasticsearch: ElasticsearchEngine, solr: SolrEngine) -> Router {
    let state = AppState {
        elasticsearch: Arc::new(Geocoder::new(elasticsearch)),
        solr: Arc::new(Geocoder::new(solr)),
    };

    Router::new()
        .route("/api", get(handle_elasticsearch))
        .route("/api/", get(handle_elasticsearch))
        .route("/api/solr", get(handle_solr))
        .route("/api/solr/", get(handle_solr))
        .route("/search", get(handle_raw_search))
        .route("/search/", get(handle_raw_search))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Build the API router from configuration, sharing one HTTP client
/// between both engines.
///
/// # Errors
///
/// Returns an error if the search configuration is invalid.
pub fn router_from_config(config: &PhotonConfig) -> crate::error::Result<Router> {
    config.validate()?;
    let client = photon_search::http::build_client(&config.search)?;
    let elasticsearch = ElasticsearchEngine::from_config(client.clone(), &config.search)?;
    let solr = SolrEngine::from_config(client, &config.search)?;
    Ok(router(elasticsearch, solr))
}

// ---------------------------------------------------------------------------
// PhotonServer
// ---------------------------------------------------------------------------

/// The geocoding HTTP server running in a background tokio task.
pub struct PhotonServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl PhotonServer {
    /// Start the server.
    ///
    /// Binds to `{server.host}:{server.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the TCP listener
    /// cannot bind.
    pub async fn start(config: &PhotonConfig) -> crate::error::Result<Self> {
        let app = router_from_config(config)?;
        Self::start_with_router(app, &config.server.host, config.server.port).await
    }

    /// Start serving a pre-built router.
    pub async fn start_with_router(
        app: Router,
        host: &str,
        port: u16,
    ) -> crate::error::Result<Self> {
        let bind_addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| PhotonError::Config(format!("bind to {bind_addr} failed: {e}")))?;
        let addr = listener.local_addr()?;

        info!("photon listening on http://{addr}/api/");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("photon server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for PhotonServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /api/`: geocode via Elasticsearch.
async fn handle_elasticsearch(
    State(state): State<AppState>,
    Query(params): Query<RawSearchParams>,
) -> Result<Json<FeatureCollection>, ApiError> {
    geocode(&state.elasticsearch, &params)
        .instrument(request_span(EngineKind::Elasticsearch))
        .await
        .map(Json)
}

/// `GET /api/solr/`: geocode via Solr.
async fn handle_solr(
    State(state): State<AppState>,
    Query(params): Query<RawSearchParams>,
) -> Result<Json<FeatureCollection>, ApiError> {
    geocode(&state.solr, &params)
        .instrument(request_span(EngineKind::Solr))
        .await
        .map(Json)
}

/// `GET /search/`: Solr documents and highlighting, unnormalised.
async fn handle_raw_search(
    State(state): State<AppState>,
    Query(query): Query<RawSearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .solr
        .engine()
        .raw_search(query.q.as_deref())
        .instrument(request_span(EngineKind::Solr))
        .await
        .map(Json)
        .map_err(ApiError::from)
}

/// `GET /health`: liveness probe.
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Validate the parameters, then search. Validation failures never reach
/// the engine.
async fn geocode<E: GeocodingEngine>(
    geocoder: &Geocoder<E>,
    params: &RawSearchParams,
) -> Result<FeatureCollection, ApiError> {
    let request = params.parse()?;
    Ok(geocoder.search(&request).await?)
}

fn request_span(engine: EngineKind) -> tracing::Span {
    tracing::info_span!("request", request_id = %Uuid::new_v4(), %engine)
}
