//! Credential strategy selection.
//!
//! Strategies are tried in [`STRATEGY_ORDER`]; the first one whose
//! predicate holds is the only one used. Backend-native keys come first, the
//! platform IAM key is the fallback.

use tracing::debug;

use volbroker_common::{is_empty_value, AuthType, Error, Result};
use volbroker_config::Config;
use volbroker_provider::{ContextCredentials, ContextCredentialsFactory};

/// Mutually exclusive ways of authenticating against a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialStrategy {
    /// Backend username and API key; block and file providers only.
    IaasApiKey,
    /// Platform IAM API key; any provider.
    IamApiKey,
}

/// Evaluation order, highest priority first.
pub const STRATEGY_ORDER: [CredentialStrategy; 2] =
    [CredentialStrategy::IaasApiKey, CredentialStrategy::IamApiKey];

impl CredentialStrategy {
    /// Whether this strategy can authenticate `provider_id` with `config`.
    pub fn applies(&self, config: &Config, provider_id: &str) -> bool {
        match self {
            CredentialStrategy::IaasApiKey => {
                config.is_backend_provider(provider_id)
                    && !is_empty_value(config.username())
                    && !is_empty_value(config.api_key().map(|k| k.expose()))
            }
            CredentialStrategy::IamApiKey => {
                !is_empty_value(config.iam_api_key().map(|k| k.expose()))
            }
        }
    }

    /// Resolve credentials through `factory` using this strategy's inputs.
    ///
    /// # Errors
    /// - `InsufficientAuthentication` if the strategy's inputs are absent
    /// - Whatever the factory returns
    pub async fn resolve(
        &self,
        config: &Config,
        factory: &dyn ContextCredentialsFactory,
    ) -> Result<ContextCredentials> {
        let account_id = config.account_id();
        match self {
            CredentialStrategy::IaasApiKey => {
                let username = config.username().ok_or(Error::InsufficientAuthentication)?;
                let api_key = config.api_key().ok_or(Error::InsufficientAuthentication)?;
                factory.for_iaas_api_key(account_id, username, api_key).await
            }
            CredentialStrategy::IamApiKey => {
                let iam_api_key = config
                    .iam_api_key()
                    .ok_or(Error::InsufficientAuthentication)?;
                factory.for_iam_api_key(account_id, iam_api_key).await
            }
        }
    }

    pub fn auth_type(&self) -> AuthType {
        match self {
            CredentialStrategy::IaasApiKey => AuthType::IaasApiKey,
            CredentialStrategy::IamApiKey => AuthType::IamApiKey,
        }
    }
}

/// Pick the first applicable strategy for `provider_id`.
///
/// # Errors
/// - `InsufficientAuthentication` if no strategy applies
pub fn select_strategy(config: &Config, provider_id: &str) -> Result<CredentialStrategy> {
    STRATEGY_ORDER
        .into_iter()
        .find(|strategy| strategy.applies(config, provider_id))
        .ok_or(Error::InsufficientAuthentication)
}

/// Select a strategy and resolve credentials with it.
pub async fn generate_context_credentials(
    config: &Config,
    provider_id: &str,
    factory: &dyn ContextCredentialsFactory,
) -> Result<ContextCredentials> {
    let strategy = select_strategy(config, provider_id)?;
    debug!(provider = %provider_id, strategy = ?strategy, "Generating context credentials");
    strategy.resolve(config, factory).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use volbroker_common::Secret;
    use volbroker_config::{BluemixConfig, SoftlayerConfig};
    use volbroker_provider::{MemoryProvider, Provider};

    fn make_config(username: &str, api_key: &str, iam_api_key: &str) -> Config {
        Config {
            softlayer: Some(SoftlayerConfig {
                softlayer_block_enabled: true,
                softlayer_block_provider_name: "softlayer-block".to_string(),
                softlayer_file_enabled: true,
                softlayer_file_provider_name: "softlayer-file".to_string(),
                softlayer_datacenter: "dal10".to_string(),
                softlayer_username: username.to_string(),
                softlayer_api_key: Secret::new(api_key),
            }),
            bluemix: Some(BluemixConfig {
                iam_client_id: "acct-1".to_string(),
                iam_api_key: Secret::new(iam_api_key),
            }),
            gen2: None,
        }
    }

    #[test]
    fn test_backend_keys_win_over_iam() {
        let config = make_config("u1", "k1", "iam1");

        assert_eq!(
            select_strategy(&config, "softlayer-block").unwrap(),
            CredentialStrategy::IaasApiKey
        );
        assert_eq!(
            select_strategy(&config, "softlayer-file").unwrap(),
            CredentialStrategy::IaasApiKey
        );
    }

    #[test]
    fn test_iam_for_non_backend_provider() {
        let config = make_config("u1", "k1", "iam1");
        assert_eq!(
            select_strategy(&config, "other-backend").unwrap(),
            CredentialStrategy::IamApiKey
        );
    }

    #[test]
    fn test_iam_when_backend_keys_incomplete() {
        for (user, key) in [("", "k1"), ("u1", ""), ("", "")] {
            let config = make_config(user, key, "iam1");
            assert_eq!(
                select_strategy(&config, "softlayer-block").unwrap(),
                CredentialStrategy::IamApiKey
            );
        }
    }

    #[test]
    fn test_absent_sections_equal_empty() {
        let mut config = make_config("", "", "iam1");
        config.softlayer = None;
        assert_eq!(
            select_strategy(&config, "softlayer-block").unwrap(),
            CredentialStrategy::IamApiKey
        );

        config.bluemix = None;
        assert!(matches!(
            select_strategy(&config, "softlayer-block"),
            Err(Error::InsufficientAuthentication)
        ));
    }

    #[test]
    fn test_nothing_configured() {
        let config = make_config("", "", "");
        assert!(matches!(
            select_strategy(&config, "softlayer-block"),
            Err(Error::InsufficientAuthentication)
        ));
    }

    #[test]
    fn test_backend_keys_only_for_other_provider() {
        let config = make_config("u1", "k1", "");
        assert!(matches!(
            select_strategy(&config, "other-backend"),
            Err(Error::InsufficientAuthentication)
        ));
    }

    #[tokio::test]
    async fn test_generate_resolves_with_selected_strategy() {
        let provider = MemoryProvider::new("softlayer-block");
        let factory = provider.context_credentials_factory("dal10").unwrap();

        let config = make_config("u1", "k1", "iam1");
        let creds = generate_context_credentials(&config, "softlayer-block", factory.as_ref())
            .await
            .unwrap();
        assert_eq!(creds.auth_type, AuthType::IaasApiKey);
        assert_eq!(creds.user_id, "u1");
        assert_eq!(creds.account_id, "acct-1");
        assert_eq!(creds.credential.expose(), "k1");

        let config = make_config("", "k1", "iam1");
        let creds = generate_context_credentials(&config, "softlayer-block", factory.as_ref())
            .await
            .unwrap();
        assert_eq!(creds.auth_type, AuthType::IamApiKey);
        assert_eq!(creds.credential.expose(), "iam1");
    }

    #[tokio::test]
    async fn test_generate_propagates_factory_error() {
        let provider = MemoryProvider::new("softlayer-block").with_accepted_secrets(["other"]);
        let factory = provider.context_credentials_factory("dal10").unwrap();

        let config = make_config("u1", "k1", "");
        let result =
            generate_context_credentials(&config, "softlayer-block", factory.as_ref()).await;
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    fn arb_value() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-z0-9]{1,8}"]
    }

    fn arb_provider_id() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("softlayer-block".to_string()),
            Just("softlayer-file".to_string()),
            Just("gen2".to_string()),
            "[a-z-]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn selection_is_deterministic_and_ordered(
            username in arb_value(),
            api_key in arb_value(),
            iam_api_key in arb_value(),
            provider_id in arb_provider_id(),
        ) {
            let config = make_config(&username, &api_key, &iam_api_key);
            let first = select_strategy(&config, &provider_id).ok();
            let second = select_strategy(&config, &provider_id).ok();
            prop_assert_eq!(first, second);

            let backend = provider_id == "softlayer-block" || provider_id == "softlayer-file";
            let expected = if backend && !username.is_empty() && !api_key.is_empty() {
                Some(CredentialStrategy::IaasApiKey)
            } else if !iam_api_key.is_empty() {
                Some(CredentialStrategy::IamApiKey)
            } else {
                None
            };
            prop_assert_eq!(first, expected);
        }
    }
}
