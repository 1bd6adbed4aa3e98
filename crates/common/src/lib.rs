//! Shared types for the Open Cloud client workspace
//!
//! Holds the pieces every other crate leans on: the `Secret` wrapper for
//! keys and tokens, configuration loading, and the configuration error type.

mod config;
mod error;
mod secret;

pub use config::{ApiConfig, Config, OAuthAppConfig};
pub use error::{Error, Result};
pub use secret::Secret;
