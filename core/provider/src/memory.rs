//! In-memory provider for testing and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use volbroker_common::{AuthType, Error, Result, Secret};
use crate::credentials::ContextCredentials;
use crate::provider::{ContextCredentialsFactory, Provider, Session, SessionContext};

/// Record of an open in-memory session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub auth_type: AuthType,
    pub account_id: String,
    pub datacenter: String,
    pub request_id: String,
    pub opened_at: DateTime<Utc>,
}

type SessionTable = Arc<RwLock<HashMap<String, SessionRecord>>>;

/// In-memory provider.
///
/// Accepts any non-empty datacenter and secret unless restricted with
/// [`with_datacenters`](Self::with_datacenters) or
/// [`with_accepted_secrets`](Self::with_accepted_secrets). Sessions are kept
/// in memory until closed.
pub struct MemoryProvider {
    name: String,
    datacenters: Option<HashSet<String>>,
    accepted_secrets: Option<Arc<HashSet<String>>>,
    open_failure: Option<String>,
    sessions: SessionTable,
}

impl MemoryProvider {
    /// Create a provider with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datacenters: None,
            accepted_secrets: None,
            open_failure: None,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Restrict the datacenters this provider serves.
    pub fn with_datacenters<I, S>(mut self, datacenters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datacenters = Some(datacenters.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict the API keys the credentials factory accepts.
    pub fn with_accepted_secrets<I, S>(mut self, secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_secrets = Some(Arc::new(secrets.into_iter().map(Into::into).collect()));
        self
    }

    /// Make every `open_session` call fail with a session error.
    pub fn with_open_failure(mut self, message: impl Into<String>) -> Self {
        self.open_failure = Some(message.into());
        self
    }

    /// Number of sessions currently open.
    pub async fn open_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Look up an open session by id.
    pub async fn session(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(session_id).cloned()
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn context_credentials_factory(
        &self,
        datacenter: &str,
    ) -> Result<Box<dyn ContextCredentialsFactory>> {
        let known = match &self.datacenters {
            Some(datacenters) => datacenters.contains(datacenter),
            None => !datacenter.is_empty(),
        };
        if !known {
            return Err(Error::InvalidDatacenter(format!(
                "'{}' is not served by provider '{}'",
                datacenter, self.name
            )));
        }

        Ok(Box::new(MemoryCredentialsFactory {
            datacenter: datacenter.to_string(),
            accepted_secrets: self.accepted_secrets.clone(),
        }))
    }

    async fn open_session(
        &self,
        ctx: &SessionContext,
        credentials: ContextCredentials,
    ) -> Result<Box<dyn Session>> {
        if let Some(message) = &self.open_failure {
            return Err(Error::Session(message.clone()));
        }

        let session_id = Uuid::new_v4().to_string();
        let record = SessionRecord {
            auth_type: credentials.auth_type,
            account_id: credentials.account_id.clone(),
            datacenter: credentials.datacenter.clone(),
            request_id: ctx.request_id.clone(),
            opened_at: Utc::now(),
        };

        self.sessions
            .write()
            .await
            .insert(session_id.clone(), record);

        tracing::debug!(
            provider = %self.name,
            session_id = %session_id,
            auth_type = %credentials.auth_type,
            "Memory session opened"
        );

        Ok(Box::new(MemorySession {
            provider_name: self.name.clone(),
            session_id,
            auth_type: credentials.auth_type,
            sessions: Arc::clone(&self.sessions),
        }))
    }
}

/// Credentials factory handed out by [`MemoryProvider`].
struct MemoryCredentialsFactory {
    datacenter: String,
    accepted_secrets: Option<Arc<HashSet<String>>>,
}

impl MemoryCredentialsFactory {
    fn check_secret(&self, secret: &Secret) -> Result<()> {
        if secret.is_empty() {
            return Err(Error::Authentication("Empty API key".to_string()));
        }
        if let Some(accepted) = &self.accepted_secrets {
            if !accepted.contains(secret.expose()) {
                return Err(Error::Authentication("API key rejected".to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ContextCredentialsFactory for MemoryCredentialsFactory {
    async fn for_iaas_api_key(
        &self,
        account_id: &str,
        username: &str,
        api_key: &Secret,
    ) -> Result<ContextCredentials> {
        self.check_secret(api_key)?;
        Ok(ContextCredentials::iaas(
            account_id,
            username,
            api_key.clone(),
            self.datacenter.as_str(),
        ))
    }

    async fn for_iam_api_key(
        &self,
        account_id: &str,
        iam_api_key: &Secret,
    ) -> Result<ContextCredentials> {
        self.check_secret(iam_api_key)?;
        Ok(ContextCredentials::iam(
            account_id,
            iam_api_key.clone(),
            self.datacenter.as_str(),
        ))
    }
}

/// Session opened by [`MemoryProvider`].
pub struct MemorySession {
    provider_name: String,
    session_id: String,
    auth_type: AuthType,
    sessions: SessionTable,
}

#[async_trait]
impl Session for MemorySession {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    async fn close(&self) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(&self.session_id)
            .map(|_| ())
            .ok_or_else(|| Error::Session(format!("Session '{}' is not open", self.session_id)))
    }
}
