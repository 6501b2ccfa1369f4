//! Opening provider sessions with classified failures.
//!
//! Resolution runs in four gated steps: provider lookup, datacenter
//! credentials factory, credential strategy, session open. The first two fail
//! fatally (the same request can never succeed); the last two are retryable.

use tracing::{error, info};

use volbroker_common::Error;
use volbroker_config::Config;
use volbroker_provider::{ProviderRegistry, Session, SessionContext};
use crate::strategy::generate_context_credentials;

/// Failure of [`open_provider_session`], tagged with its severity.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Will fail again with the same inputs; do not retry.
    #[error("fatal: {0}")]
    Fatal(#[source] Error),
    /// May succeed after adjusting credentials or once a transient
    /// condition clears.
    #[error("retryable: {0}")]
    Retryable(#[source] Error),
}

impl SessionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Fatal(_))
    }

    /// The underlying error.
    pub fn error(&self) -> &Error {
        match self {
            SessionError::Fatal(e) | SessionError::Retryable(e) => e,
        }
    }

    pub fn into_error(self) -> Error {
        match self {
            SessionError::Fatal(e) | SessionError::Retryable(e) => e,
        }
    }

    /// Stable code of the underlying error.
    pub fn code(&self) -> &'static str {
        self.error().code()
    }
}

/// Open a session against `provider_id` with a fresh request context.
///
/// See [`open_provider_session_with_context`].
pub async fn open_provider_session(
    config: &Config,
    registry: &ProviderRegistry,
    provider_id: &str,
) -> Result<Box<dyn Session>, SessionError> {
    open_provider_session_with_context(config, registry, provider_id, &SessionContext::new()).await
}

/// Open a session against `provider_id`.
///
/// # Errors
/// - `Fatal(ProviderNotFound)` for an unregistered provider
/// - `Fatal(..)` when the provider rejects the configured datacenter
/// - `Retryable(InsufficientAuthentication)` when no credential strategy
///   applies, `Retryable(..)` when credential resolution fails
/// - `Retryable(..)` carrying the provider's own error when opening fails
pub async fn open_provider_session_with_context(
    config: &Config,
    registry: &ProviderRegistry,
    provider_id: &str,
    ctx: &SessionContext,
) -> Result<Box<dyn Session>, SessionError> {
    info!(provider = %provider_id, request_id = %ctx.request_id, "Opening provider session");

    let provider = registry.get(provider_id).map_err(|e| {
        error!(provider = %provider_id, error = %e, "Not able to get the provider");
        SessionError::Fatal(e)
    })?;

    let datacenter = config.datacenter();
    let factory = provider.context_credentials_factory(datacenter).map_err(|e| {
        error!(
            provider = %provider_id,
            datacenter = %datacenter,
            error = %e,
            "Not able to resolve credentials factory"
        );
        SessionError::Fatal(e)
    })?;

    let credentials = generate_context_credentials(config, provider_id, factory.as_ref())
        .await
        .map_err(|e| {
            error!(provider = %provider_id, error = %e, fatal = false, "Failed to open provider session");
            SessionError::Retryable(e)
        })?;

    let session = provider
        .open_session(ctx, credentials)
        .await
        .map_err(SessionError::Retryable)?;

    info!(
        provider = %provider_id,
        session_id = %session.session_id(),
        auth_type = %session.auth_type(),
        "Provider session opened"
    );
    Ok(session)
}
