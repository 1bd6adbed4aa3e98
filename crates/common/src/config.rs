//! Configuration types and loading
//!
//! Config precedence: env vars > config file > defaults. The API key and the
//! OAuth client secret are loaded from env vars or from files named in the
//! config, never stored in the TOML directly to avoid leaking secrets.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::secret::Secret;

/// Env var holding the Open Cloud API key.
pub const API_KEY_ENV: &str = "OPEN_CLOUD_API_KEY";

/// Env var holding the OAuth 2.0 client secret.
pub const CLIENT_SECRET_ENV: &str = "OPEN_CLOUD_CLIENT_SECRET";

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "OPEN_CLOUD_CONFIG";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub oauth: Option<OAuthAppConfig>,
}

/// Endpoints and transport settings for the dispatcher
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_oauth_base_url")]
    pub oauth_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: Option<Secret<String>>,
    /// Path to a file containing the API key (alternative to OPEN_CLOUD_API_KEY)
    #[serde(default)]
    pub api_key_file: Option<PathBuf>,
}

/// Registered OAuth 2.0 application
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthAppConfig {
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    pub redirect_uri: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_base_url() -> String {
    "https://apis.roblox.com/cloud".into()
}

fn default_oauth_base_url() -> String {
    "https://apis.roblox.com/oauth".into()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            oauth_base_url: default_oauth_base_url(),
            timeout_secs: default_timeout(),
            api_key: None,
            api_key_file: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Secret resolution order (API key and client secret alike):
    /// 1. env var
    /// 2. `*_file` path from config
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        config.api.validate()?;

        config.api.api_key = resolve_secret(API_KEY_ENV, config.api.api_key_file.as_deref())?;
        if let Some(oauth) = config.oauth.as_mut() {
            oauth.client_secret =
                resolve_secret(CLIENT_SECRET_ENV, oauth.client_secret_file.as_deref())?;
        }

        Ok(config)
    }

    /// Resolve config file path from a caller-supplied value or OPEN_CLOUD_CONFIG.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from("open-cloud.toml")
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("base_url", &self.base_url),
            ("oauth_base_url", &self.oauth_base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(Error::Config(format!(
                    "{field} must start with http:// or https://, got: {value}"
                )));
            }
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }

        Ok(())
    }
}

/// Env var wins over the file. A whitespace-only file yields no secret.
fn resolve_secret(env: &str, file: Option<&Path>) -> Result<Option<Secret<String>>> {
    if let Ok(value) = std::env::var(env) {
        return Ok(Some(Secret::new(value)));
    }

    let Some(file) = file else {
        return Ok(None);
    };

    let value = std::fs::read_to_string(file)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", file.display())))?;
    let value = value.trim().to_owned();
    Ok((!value.is_empty()).then(|| Secret::new(value)))
}
