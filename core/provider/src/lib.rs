//! Storage backend provider abstraction for volbroker.
//!
//! This module provides the trait-based interface every backend family
//! implements (block, file, ...) and the registry the broker resolves
//! providers from.
//!
//! # Design Principles
//! - Provider isolation: no backend-specific logic outside provider impls
//! - Registry as a value: no global state, one registry per host
//! - Secrets stay in [`Secret`](volbroker_common::Secret) end to end

pub mod credentials;
pub mod memory;
pub mod provider;
pub mod registry;

pub use credentials::ContextCredentials;
pub use memory::{MemoryProvider, MemorySession, SessionRecord};
pub use provider::{ContextCredentialsFactory, Provider, Session, SessionContext};
pub use registry::ProviderRegistry;
