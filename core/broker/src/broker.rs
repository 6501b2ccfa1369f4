//! Broker handle shared by request handlers.

use std::sync::Arc;

use volbroker_common::Result;
use volbroker_config::Config;
use volbroker_provider::{ProviderRegistry, Session, SessionContext};
use crate::bootstrap::{init_providers, ProviderFactories};
use crate::session::{open_provider_session_with_context, SessionError};
use crate::strategy::{select_strategy, CredentialStrategy};

/// Bootstrapped configuration and registry.
///
/// Cloning is cheap; every clone reads the same immutable registry.
#[derive(Clone)]
pub struct Broker {
    config: Arc<Config>,
    registry: Arc<ProviderRegistry>,
}

impl Broker {
    /// Bootstrap providers for `config`.
    ///
    /// # Errors
    /// - Any bootstrap error from [`init_providers`]
    pub fn bootstrap(config: Config, factories: &ProviderFactories) -> Result<Self> {
        let registry = init_providers(&config, factories)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create with a registry built elsewhere.
    pub fn with_registry(config: Config, registry: ProviderRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Credential strategy that would be used for `provider_id`.
    pub fn strategy_for(&self, provider_id: &str) -> Result<CredentialStrategy> {
        select_strategy(&self.config, provider_id)
    }

    /// Open a session against `provider_id`.
    pub async fn open_session(
        &self,
        provider_id: &str,
    ) -> std::result::Result<Box<dyn Session>, SessionError> {
        self.open_session_with_context(provider_id, &SessionContext::new())
            .await
    }

    pub async fn open_session_with_context(
        &self,
        provider_id: &str,
        ctx: &SessionContext,
    ) -> std::result::Result<Box<dyn Session>, SessionError> {
        open_provider_session_with_context(&self.config, &self.registry, provider_id, ctx).await
    }
}
