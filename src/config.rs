//! Configuration types for the Photon API server.
//!
//! Settings come from an optional TOML file, then environment variables
//! override individual fields (`PHOTON_PORT`, `DEBUG`, `SOLR_ENDPOINT`,
//! `ELASTICSEARCH_ENDPOINT`).

use photon_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_ENV: &str = "PHOTON_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Search backend settings.
    pub search: SearchConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind (0 = auto-assign).
    pub port: u16,
    /// Verbose logging, including every constructed engine query.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5001,
            debug: false,
        }
    }
}

impl PhotonConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::PhotonError::Config(e.to_string()))
    }

    /// Load configuration from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PhotonError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the config file path: `$PHOTON_CONFIG`, else
    /// `<platform config dir>/photon/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("photon")
            .join("config.toml")
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> crate::error::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PhotonError::Config`] if `PHOTON_PORT` is not a port number.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> crate::error::Result<()> {
        if let Some(port) = lookup("PHOTON_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                crate::error::PhotonError::Config(format!("PHOTON_PORT '{port}' is not a port"))
            })?;
        }
        if let Some(debug) = lookup("DEBUG") {
            self.server.debug = is_truthy(&debug);
        }
        if let Some(url) = lookup("SOLR_ENDPOINT") {
            self.search.solr_url = url;
        }
        if let Some(url) = lookup("ELASTICSEARCH_ENDPOINT") {
            self.search.elasticsearch_url = url;
        }
        Ok(())
    }

    /// Validate all sections.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(crate::error::PhotonError::Config(
                "server.host must not be empty".into(),
            ));
        }
        self.search.validate()?;
        Ok(())
    }
}

fn is_truthy(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
