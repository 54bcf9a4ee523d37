use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ClientError, Result};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "polex.json";

/// Connection parameters for the appliance REST API.
///
/// `client_id`/`client_secret` are the OAuth client credentials registered on
/// the appliance ahead of time; the admin username/password come from the CLI
/// at run time, not from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Appliance hostname or IP address
    pub host_name: String,

    /// Appliance REST API port
    pub port: u16,

    /// Pre-registered OAuth client id
    pub client_id: String,

    /// Pre-registered OAuth client secret
    pub client_secret: String,

    /// Accept the appliance's self-signed TLS certificate
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Load config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ClientError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::ConfigError(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ClientError::ConfigError(format!("Invalid JSON: {}", e)))
    }

    /// Base URL of the appliance REST API
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host_name, self.port)
    }
}

fn default_accept_invalid_certs() -> bool {
    // Appliances ship with self-signed certificates
    true
}
