//! Common error types for volbroker.

use thiserror::Error;

/// Top-level error type for volbroker operations.
///
/// Every variant carries a stable code (see [`Error::code`]) so callers and
/// logs can match on the failure kind without parsing messages.
#[derive(Debug, Error)]
pub enum Error {
    /// An enabled backend family failed to construct its provider.
    #[error("Provider construction failed for {family}: {reason}")]
    ProviderConstructionFailed { family: String, reason: String },

    /// Bootstrap finished without any enabled backend family.
    #[error("No providers registered")]
    NoProvidersRegistered,

    /// Lookup of an unknown provider identifier.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// The provider does not serve the requested datacenter.
    #[error("Invalid datacenter: {0}")]
    InvalidDatacenter(String),

    /// No credential strategy matched the configuration.
    #[error("Insufficient authentication credentials")]
    InsufficientAuthentication,

    /// Credentials were supplied but could not be resolved.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Opening or using a backend session failed.
    #[error("Session error: {0}")]
    Session(String),

    /// Resource already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::ProviderConstructionFailed { .. } => "ErrorProviderConstructionFailed",
            Error::NoProvidersRegistered => "ErrorNoProvidersRegistered",
            Error::ProviderNotFound(_) => "ErrorProviderNotFound",
            Error::InvalidDatacenter(_) => "ErrorInvalidDatacenter",
            Error::InsufficientAuthentication => "ErrorInsufficientAuthentication",
            Error::Authentication(_) => "ErrorAuthentication",
            Error::Session(_) => "ErrorSession",
            Error::AlreadyExists(_) => "ErrorAlreadyExists",
            Error::Io(_) => "ErrorIo",
            Error::Serialization(_) => "ErrorSerialization",
            Error::InvalidInput(_) => "ErrorInvalidInput",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ProviderNotFound("x".to_string()).code(),
            "ErrorProviderNotFound"
        );
        assert_eq!(
            Error::InsufficientAuthentication.code(),
            "ErrorInsufficientAuthentication"
        );
        assert_eq!(Error::NoProvidersRegistered.code(), "ErrorNoProvidersRegistered");
    }

    #[test]
    fn test_construction_failure_message() {
        let err = Error::ProviderConstructionFailed {
            family: "softlayer-block".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Provider construction failed for softlayer-block: boom"
        );
    }

    #[test]
    fn test_serde_error_conversion() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
