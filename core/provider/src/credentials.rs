//! Resolved context credentials.

use serde::Serialize;

use volbroker_common::{AuthType, Secret};

/// Authentication material resolved for one session-open attempt.
///
/// Produced by a [`ContextCredentialsFactory`](crate::ContextCredentialsFactory)
/// and consumed by [`Provider::open_session`](crate::Provider::open_session).
/// The secret is zeroized when the credentials are dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ContextCredentials {
    /// Strategy these credentials were resolved with.
    pub auth_type: AuthType,
    /// Account the credentials are scoped to.
    pub account_id: String,
    /// Backend user (empty for IAM credentials).
    pub user_id: String,
    /// API key or token.
    #[serde(skip)]
    pub credential: Secret,
    /// Datacenter the factory was derived for.
    pub datacenter: String,
}

impl ContextCredentials {
    /// Credentials for a backend-native username and API key.
    pub fn iaas(
        account_id: impl Into<String>,
        user_id: impl Into<String>,
        api_key: Secret,
        datacenter: impl Into<String>,
    ) -> Self {
        Self {
            auth_type: AuthType::IaasApiKey,
            account_id: account_id.into(),
            user_id: user_id.into(),
            credential: api_key,
            datacenter: datacenter.into(),
        }
    }

    /// Credentials for a platform IAM API key.
    pub fn iam(
        account_id: impl Into<String>,
        api_key: Secret,
        datacenter: impl Into<String>,
    ) -> Self {
        Self {
            auth_type: AuthType::IamApiKey,
            account_id: account_id.into(),
            user_id: String::new(),
            credential: api_key,
            datacenter: datacenter.into(),
        }
    }
}
