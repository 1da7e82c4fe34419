//! Photon API server binary.
//!
//! Reads the config file named by `PHOTON_CONFIG` (or the platform default
//! path, if present), applies environment overrides and serves until
//! Ctrl-C.

use photon::{PhotonConfig, PhotonServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = PhotonConfig::default_config_path();
    let mut config = PhotonConfig::load_or_default(&config_path)?;
    config.apply_env_overrides()?;

    // Suppress noisy dependency logs by default; RUST_LOG overrides.
    let default_filter = if config.server.debug {
        "photon=debug,photon_search=debug"
    } else {
        "photon=info,photon_search=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        elasticsearch = %config.search.elasticsearch_url,
        solr = %config.search.solr_url,
        "photon starting"
    );

    let server = PhotonServer::start(&config).await.map_err(|e| {
        tracing::error!(error = %e, "photon failed to start");
        anyhow::anyhow!("photon failed to start: {e}")
    })?;

    tokio::signal::ctrl_c().await?;
    server.shutdown();

    tracing::info!("photon shut down cleanly");
    Ok(())
}
