//! Service configuration

use crate::{Error, Result};
use directories::ProjectDirs;
use registrar_client::ClientConfig;
use registrar_core::Domain;
use registrar_params::{Network, NetworkType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the registry endpoint
pub const API_URL_ENV: &str = "REGISTRAR_API_URL";
/// Overrides the data directory
pub const DATA_DIR_ENV: &str = "REGISTRAR_DATA_DIR";

const DATABASE_FILE: &str = "registrar.db";

/// Registrar configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Network preset
    pub network: NetworkType,
    /// Registry endpoint; preset endpoint when unset
    pub api_base_url: Option<String>,
    /// Local state directory; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Request timeout in seconds; no timeout when unset
    pub request_timeout_secs: Option<u64>,
    /// Labels seeded as reserved on a fresh cache
    pub reserved_labels: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            network: NetworkType::Mainnet,
            api_base_url: None,
            data_dir: None,
            request_timeout_secs: None,
            reserved_labels: vec!["admin".to_string(), "system".to_string()],
        }
    }
}

impl ServiceConfig {
    /// Read `path` if given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                serde_json::from_str(&text).map_err(|e| {
                    Error::Config(format!("Cannot parse {}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(DATA_DIR_ENV).ok(),
        );
        Ok(config)
    }

    /// Apply endpoint and data directory overrides; blank values are ignored
    pub fn apply_overrides(&mut self, api_url: Option<String>, data_dir: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            debug!("Registry endpoint overridden: {}", url);
            self.api_base_url = Some(url.trim().to_string());
        }
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir.trim()));
        }
    }

    /// Network parameters
    pub fn network(&self) -> Network {
        Network::from_type(self.network)
    }

    /// Directory holding local state
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        ProjectDirs::from("net", "PHPCoin", "Registrar")
            .map(|dirs| dirs.data_local_dir().join(self.network().name))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILE)
    }

    /// Registry client settings
    pub fn client_config(&self) -> ClientConfig {
        let network = self.network();
        let mut config = ClientConfig::for_network(&network);
        if let Some(url) = &self.api_base_url {
            config.base_url = url.clone();
        }
        config.timeout_secs = self.request_timeout_secs;
        config
    }

    /// Reserved records seeded into an empty cache
    pub fn reserved_seed(&self) -> Vec<Domain> {
        let extension = self.network().default_extension;
        self.reserved_labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .map(|label| Domain::reserved(&format!("{}{}", label, extension)))
            .collect()
    }
}
