//! Configuration snapshot for volbroker.
//!
//! The configuration is loaded once (from JSON) and then only read. Every
//! section is optional; an absent section behaves like one with all flags
//! off and all strings empty, which the accessors on [`Config`] encode.

use serde::{Deserialize, Serialize};
use std::path::Path;

use volbroker_common::{Error, Result, Secret};

/// Classic infrastructure (block and file) backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftlayerConfig {
    /// Whether the block storage backend is enabled.
    pub softlayer_block_enabled: bool,
    /// Identifier the block provider is registered under.
    pub softlayer_block_provider_name: String,
    /// Whether the file storage backend is enabled.
    pub softlayer_file_enabled: bool,
    /// Identifier the file provider is registered under.
    pub softlayer_file_provider_name: String,
    /// Datacenter used to scope credential resolution (e.g. "dal10").
    pub softlayer_datacenter: String,
    /// Backend-native username.
    pub softlayer_username: String,
    /// Backend-native API key.
    pub softlayer_api_key: Secret,
}

/// Platform-wide identity settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BluemixConfig {
    /// Account identifier passed to every credential resolution.
    pub iam_client_id: String,
    /// Platform IAM API key.
    pub iam_api_key: Secret,
}

/// Next-generation backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Gen2Config {
    pub gen2_provider_enabled: bool,
}

/// Immutable configuration snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub softlayer: Option<SoftlayerConfig>,
    pub bluemix: Option<BluemixConfig>,
    pub gen2: Option<Gen2Config>,
}

impl Config {
    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// - File cannot be read
    /// - File is not valid configuration JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn block_enabled(&self) -> bool {
        self.softlayer
            .as_ref()
            .is_some_and(|s| s.softlayer_block_enabled)
    }

    pub fn block_provider_name(&self) -> &str {
        self.softlayer
            .as_ref()
            .map_or("", |s| s.softlayer_block_provider_name.as_str())
    }

    pub fn file_enabled(&self) -> bool {
        self.softlayer
            .as_ref()
            .is_some_and(|s| s.softlayer_file_enabled)
    }

    pub fn file_provider_name(&self) -> &str {
        self.softlayer
            .as_ref()
            .map_or("", |s| s.softlayer_file_provider_name.as_str())
    }

    pub fn gen2_enabled(&self) -> bool {
        self.gen2.as_ref().is_some_and(|g| g.gen2_provider_enabled)
    }

    pub fn datacenter(&self) -> &str {
        self.softlayer
            .as_ref()
            .map_or("", |s| s.softlayer_datacenter.as_str())
    }

    pub fn account_id(&self) -> &str {
        self.bluemix.as_ref().map_or("", |b| b.iam_client_id.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.softlayer
            .as_ref()
            .map(|s| s.softlayer_username.as_str())
    }

    pub fn api_key(&self) -> Option<&Secret> {
        self.softlayer.as_ref().map(|s| &s.softlayer_api_key)
    }

    pub fn iam_api_key(&self) -> Option<&Secret> {
        self.bluemix.as_ref().map(|b| &b.iam_api_key)
    }

    /// Check whether `provider_id` names one of the backend-specific
    /// (block or file) providers.
    pub fn is_backend_provider(&self, provider_id: &str) -> bool {
        provider_id == self.block_provider_name() || provider_id == self.file_provider_name()
    }
}
