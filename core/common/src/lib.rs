//! Common utilities and types shared across volbroker modules.
//!
//! This module provides the error taxonomy and the small value types
//! (secrets, auth types) used by the config, provider and broker crates.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{is_empty_value, AuthType, Secret};
