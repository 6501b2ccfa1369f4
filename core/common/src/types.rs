//! Common types used throughout volbroker.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Authentication strategy a set of credentials was resolved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Backend-native username and API key.
    IaasApiKey,
    /// Platform-wide IAM API key.
    IamApiKey,
}

impl AuthType {
    /// Get the string form used in logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::IaasApiKey => "iaas_api_key",
            AuthType::IamApiKey => "iam_api_key",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secret string that zeroizes on drop.
///
/// Absent and empty secrets are treated the same everywhere: a missing
/// configuration field deserializes to an empty `Secret`.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Create a new secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret([REDACTED])")
        }
    }
}

/// Returns true when an optional string is absent or empty.
pub fn is_empty_value(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}
