//! Provider, session and credentials-factory trait definitions.

use async_trait::async_trait;
use uuid::Uuid;

use volbroker_common::{AuthType, Result, Secret};
use crate::credentials::ContextCredentials;

/// Per-request context passed through to the backend on session open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Correlation id for logs on both sides of the backend call.
    pub request_id: String,
}

impl SessionContext {
    /// Create a context with a fresh request id.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a context with a caller-supplied request id.
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves authentication material for one provider in one datacenter.
///
/// Obtained from [`Provider::context_credentials_factory`] for each
/// session-open attempt and not retained afterwards.
#[async_trait]
pub trait ContextCredentialsFactory: Send + Sync {
    /// Resolve credentials from a backend-native username and API key.
    ///
    /// # Errors
    /// - Credentials rejected by the backend
    async fn for_iaas_api_key(
        &self,
        account_id: &str,
        username: &str,
        api_key: &Secret,
    ) -> Result<ContextCredentials>;

    /// Resolve credentials from a platform IAM API key.
    ///
    /// # Errors
    /// - Key rejected by the identity service
    async fn for_iam_api_key(&self, account_id: &str, iam_api_key: &Secret)
        -> Result<ContextCredentials>;
}

/// Authenticated channel to a backend.
///
/// The I/O surface belongs to each backend; the broker only needs identity
/// and lifecycle.
#[async_trait]
pub trait Session: Send + Sync {
    /// Name of the provider that opened this session.
    fn provider_name(&self) -> &str;

    /// Unique id of this session.
    fn session_id(&self) -> &str;

    /// Strategy the session was authenticated with.
    fn auth_type(&self) -> AuthType;

    /// Close the session and release backend resources.
    async fn close(&self) -> Result<()>;
}

/// Storage backend provider.
///
/// Providers are constructed once at bootstrap, stored in the
/// [`ProviderRegistry`](crate::ProviderRegistry) as `Arc<dyn Provider>` and
/// never mutated afterwards, so implementations must be safe to share.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name (e.g., "softlayer-block").
    fn name(&self) -> &str;

    /// Derive the credentials factory for a datacenter.
    ///
    /// # Errors
    /// - `InvalidDatacenter` if the backend does not serve `datacenter`
    fn context_credentials_factory(
        &self,
        datacenter: &str,
    ) -> Result<Box<dyn ContextCredentialsFactory>>;

    /// Open a session with resolved credentials.
    ///
    /// # Errors
    /// - Backend-specific failures, returned unchanged to the caller
    async fn open_session(
        &self,
        ctx: &SessionContext,
        credentials: ContextCredentials,
    ) -> Result<Box<dyn Session>>;
}
