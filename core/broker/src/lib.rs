//! Session broker for volbroker.
//!
//! This module provides:
//! - Provider bootstrap from configuration
//! - Credential strategy selection
//! - Session opening with fatal/retryable error classification
//!
//! # Architecture
//! Bootstrap runs once and produces a [`ProviderRegistry`] that is only read
//! afterwards. Each request then goes through
//! [`open_provider_session`], which never retries and leaves the retry
//! decision to the caller via [`SessionError`].
//!
//! [`ProviderRegistry`]: volbroker_provider::ProviderRegistry

pub mod bootstrap;
pub mod broker;
pub mod session;
pub mod strategy;

pub use bootstrap::{init_providers, BackendFamily, ProviderFactories, ProviderFactory};
pub use broker::Broker;
pub use session::{open_provider_session, open_provider_session_with_context, SessionError};
pub use strategy::{generate_context_credentials, select_strategy, CredentialStrategy, STRATEGY_ORDER};
