//! Provider bootstrap: turns configuration into a populated registry.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use volbroker_common::{Error, Result};
use volbroker_config::Config;
use volbroker_provider::{MemoryProvider, Provider, ProviderRegistry};

/// Factory function type for constructing a backend family's provider.
pub type ProviderFactory = Box<dyn Fn(&Config) -> Result<Arc<dyn Provider>> + Send + Sync>;

/// Backend families known to the bootstrapper, in bootstrap order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendFamily {
    SoftlayerBlock,
    SoftlayerFile,
    /// Next-generation backend. Not implemented yet: enabling it counts as
    /// having a provider but registers nothing.
    Gen2,
}

impl BackendFamily {
    pub const ALL: [BackendFamily; 3] = [
        BackendFamily::SoftlayerBlock,
        BackendFamily::SoftlayerFile,
        BackendFamily::Gen2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendFamily::SoftlayerBlock => "softlayer-block",
            BackendFamily::SoftlayerFile => "softlayer-file",
            BackendFamily::Gen2 => "gen2",
        }
    }

    /// Whether this family is switched on in `config`.
    pub fn is_enabled(&self, config: &Config) -> bool {
        match self {
            BackendFamily::SoftlayerBlock => config.block_enabled(),
            BackendFamily::SoftlayerFile => config.file_enabled(),
            BackendFamily::Gen2 => config.gen2_enabled(),
        }
    }

    /// Identifier the family registers under, if it registers at all.
    pub fn provider_name<'a>(&self, config: &'a Config) -> Option<&'a str> {
        match self {
            BackendFamily::SoftlayerBlock => Some(config.block_provider_name()),
            BackendFamily::SoftlayerFile => Some(config.file_provider_name()),
            BackendFamily::Gen2 => None,
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider constructors for each implemented backend family.
#[derive(Default)]
pub struct ProviderFactories {
    block: Option<ProviderFactory>,
    file: Option<ProviderFactory>,
}

impl ProviderFactories {
    /// Create an empty set of factories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the block storage constructor.
    pub fn with_block(mut self, factory: ProviderFactory) -> Self {
        self.block = Some(factory);
        self
    }

    /// Install the file storage constructor.
    pub fn with_file(mut self, factory: ProviderFactory) -> Self {
        self.file = Some(factory);
        self
    }

    /// Factories backed by [`MemoryProvider`], named from configuration.
    pub fn memory() -> Self {
        Self::new()
            .with_block(Box::new(|config: &Config| {
                Ok(Arc::new(MemoryProvider::new(config.block_provider_name())) as Arc<dyn Provider>)
            }))
            .with_file(Box::new(|config: &Config| {
                Ok(Arc::new(MemoryProvider::new(config.file_provider_name())) as Arc<dyn Provider>)
            }))
    }

    fn get(&self, family: BackendFamily) -> Option<&ProviderFactory> {
        match family {
            BackendFamily::SoftlayerBlock => self.block.as_ref(),
            BackendFamily::SoftlayerFile => self.file.as_ref(),
            BackendFamily::Gen2 => None,
        }
    }
}

/// Construct and register a provider for every enabled backend family.
///
/// # Postconditions
/// - Every enabled, implemented family is registered under its configured name
///
/// # Errors
/// - `ProviderConstructionFailed` if an enabled family's factory fails or is
///   missing; bootstrap stops at the first failure
/// - `AlreadyExists` if two families share a provider name
/// - `NoProvidersRegistered` if no family is enabled
pub fn init_providers(config: &Config, factories: &ProviderFactories) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    let mut have_providers = false;

    for family in BackendFamily::ALL {
        if !family.is_enabled(config) {
            continue;
        }

        let Some(name) = family.provider_name(config) else {
            // Placeholder family: counted, nothing to register yet.
            info!(family = %family, "Configuring provider");
            warn!(family = %family, "Provider family is not implemented; nothing registered");
            have_providers = true;
            continue;
        };

        let factory = factories.get(family).ok_or_else(|| Error::ProviderConstructionFailed {
            family: family.to_string(),
            reason: "no factory installed".to_string(),
        })?;

        let provider = factory(config).map_err(|e| match e {
            Error::ProviderConstructionFailed { .. } => e,
            other => Error::ProviderConstructionFailed {
                family: family.to_string(),
                reason: other.to_string(),
            },
        })?;

        registry.register(name, provider)?;
        info!(family = %family, provider = %name, "Provider registered");
        have_providers = true;
    }

    if !have_providers {
        return Err(Error::NoProvidersRegistered);
    }

    info!(count = registry.len(), "Provider registration done");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> Config {
        Config::from_json(json).unwrap()
    }

    fn failing() -> ProviderFactory {
        Box::new(|_: &Config| Err(Error::InvalidInput("missing endpoint".to_string())))
    }

    #[test]
    fn test_block_and_file_registered() {
        let config = config(
            r#"{"softlayer": {
                "softlayer_block_enabled": true,
                "softlayer_block_provider_name": "softlayer-block",
                "softlayer_file_enabled": true,
                "softlayer_file_provider_name": "softlayer-file"
            }}"#,
        );

        let registry = init_providers(&config, &ProviderFactories::memory()).unwrap();
        assert_eq!(
            registry.providers(),
            vec!["softlayer-block".to_string(), "softlayer-file".to_string()]
        );
        assert_eq!(registry.get("softlayer-file").unwrap().name(), "softlayer-file");
    }

    #[test]
    fn test_only_enabled_families_registered() {
        let config = config(
            r#"{"softlayer": {
                "softlayer_block_enabled": false,
                "softlayer_block_provider_name": "softlayer-block",
                "softlayer_file_enabled": true,
                "softlayer_file_provider_name": "softlayer-file"
            }}"#,
        );

        let registry = init_providers(&config, &ProviderFactories::memory()).unwrap();
        assert_eq!(registry.providers(), vec!["softlayer-file".to_string()]);
    }

    #[test]
    fn test_nothing_enabled() {
        let result = init_providers(&config("{}"), &ProviderFactories::memory());
        assert!(matches!(result, Err(Error::NoProvidersRegistered)));

        let disabled = config(
            r#"{"softlayer": {"softlayer_block_provider_name": "softlayer-block"}}"#,
        );
        let result = init_providers(&disabled, &ProviderFactories::memory());
        assert!(matches!(result, Err(Error::NoProvidersRegistered)));
    }

    #[test]
    fn test_factory_failure_aborts() {
        let config = config(
            r#"{"softlayer": {
                "softlayer_block_enabled": true,
                "softlayer_block_provider_name": "softlayer-block"
            }}"#,
        );
        let factories = ProviderFactories::memory().with_block(failing());

        let err = init_providers(&config, &factories).err().unwrap();
        assert_eq!(err.code(), "ErrorProviderConstructionFailed");
        assert!(err.to_string().contains("missing endpoint"));
    }

    #[test]
    fn test_factory_failure_after_success_aborts() {
        let config = config(
            r#"{"softlayer": {
                "softlayer_block_enabled": true,
                "softlayer_block_provider_name": "softlayer-block",
                "softlayer_file_enabled": true,
                "softlayer_file_provider_name": "softlayer-file"
            }}"#,
        );
        let factories = ProviderFactories::memory().with_file(failing());

        let result = init_providers(&config, &factories);
        assert!(matches!(
            result,
            Err(Error::ProviderConstructionFailed { family, .. }) if family == "softlayer-file"
        ));
    }

    #[test]
    fn test_missing_factory() {
        let config = config(
            r#"{"softlayer": {
                "softlayer_file_enabled": true,
                "softlayer_file_provider_name": "softlayer-file"
            }}"#,
        );

        let result = init_providers(&config, &ProviderFactories::new());
        assert!(matches!(result, Err(Error::ProviderConstructionFailed { .. })));
    }

    #[test]
    fn test_shared_provider_name_rejected() {
        let config = config(
            r#"{"softlayer": {
                "softlayer_block_enabled": true,
                "softlayer_block_provider_name": "softlayer",
                "softlayer_file_enabled": true,
                "softlayer_file_provider_name": "softlayer"
            }}"#,
        );

        let result = init_providers(&config, &ProviderFactories::memory());
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
    }

    #[test]
    fn test_gen2_placeholder_counts_without_registering() {
        let config = config(r#"{"gen2": {"gen2_provider_enabled": true}}"#);

        let registry = init_providers(&config, &ProviderFactories::new()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_family_names() {
        let names: Vec<&str> = BackendFamily::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["softlayer-block", "softlayer-file", "gen2"]);
    }
}
