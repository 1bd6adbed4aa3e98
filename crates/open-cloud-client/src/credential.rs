//! Credentials that authenticate outgoing requests
//!
//! A closed set of variants sharing one capability, `headers()`:
//! - `ApiKey`: static `x-api-key` header, never expires
//! - `OAuthToken`: `authorization` bearer header, refreshed when stale
//!
//! The OAuth record sits behind a `tokio::sync::Mutex` that is held for the
//! whole stale-check-and-refresh. Concurrent callers that find the token
//! stale queue on the lock and re-check once they get it, so one refresh
//! serves all of them and readers never observe a half-replaced record.

use std::sync::Arc;
use std::time::Duration;

use common::{ApiConfig, Secret};
use open_cloud_auth::{OAuthScope, OAuthTokenData, now_millis};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::sync::Mutex;
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::oauth;

/// Header carrying an Open Cloud API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Source of the current time in unix milliseconds.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Open Cloud API key.
#[derive(Debug, Clone)]
pub struct ApiKey(Secret<String>);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret::new(value.into()))
    }

    /// Key resolved by `Config::load` from `OPEN_CLOUD_API_KEY` or `api_key_file`.
    pub fn from_config(config: &ApiConfig) -> Option<Self> {
        config.api_key.clone().map(Self)
    }

    pub fn headers(&self) -> Result<HeaderMap> {
        let mut value = HeaderValue::from_str(self.0.expose()).map_err(|_| Error::InvalidHeader {
            name: API_KEY_HEADER,
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, value);
        Ok(headers)
    }
}

impl From<Secret<String>> for ApiKey {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

/// OAuth 2.0 token that refreshes itself when stale.
pub struct OAuthToken {
    data: Mutex<OAuthTokenData>,
    clock: Clock,
    refresh_margin: Duration,
}

impl OAuthToken {
    pub fn new(data: OAuthTokenData) -> Self {
        Self {
            data: Mutex::new(data),
            clock: Arc::new(now_millis),
            refresh_margin: Duration::ZERO,
        }
    }

    /// Replace the wall clock used for staleness checks and `issued_at` stamps.
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Treat the token as stale `margin` before it actually expires.
    /// Defaults to zero: refresh happens at `issued_at + expires_in`.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Copy of the current record, e.g. for persisting with `open_cloud_auth::save_token`.
    pub async fn snapshot(&self) -> OAuthTokenData {
        self.data.lock().await.clone()
    }

    /// Whether the current token was granted `scope`. Never touches the network.
    pub async fn has_scope(&self, scope: impl AsRef<str>) -> bool {
        self.data.lock().await.has_scope(scope)
    }

    /// `authorization` header for a token that is fresh at call time.
    ///
    /// A stale token is refreshed first. If the refresh fails the record is
    /// left as it was and the error is returned; no header is produced.
    pub async fn headers(&self, dispatcher: &Dispatcher) -> Result<HeaderMap> {
        let mut data = self.data.lock().await;

        if data.is_stale_at((self.clock)(), self.refresh_margin) {
            debug!(
                client_id = %data.client_id,
                expires_at = data.expires_at(),
                "oauth token stale, refreshing"
            );
            let refreshed = oauth::refresh_tokens(dispatcher, &data, || (self.clock)()).await?;
            *data = refreshed;
        }

        let mut value = HeaderValue::from_str(&data.authorization_value()).map_err(|_| {
            Error::InvalidHeader {
                name: "authorization",
            }
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("refresh_margin", &self.refresh_margin)
            .finish_non_exhaustive()
    }
}

/// Proof of identity attached to API requests.
#[derive(Debug)]
pub enum Credential {
    ApiKey(ApiKey),
    OAuth(OAuthToken),
}

impl Credential {
    pub fn api_key(value: impl Into<String>) -> Self {
        Credential::ApiKey(ApiKey::new(value))
    }

    pub fn oauth(data: OAuthTokenData) -> Self {
        Credential::OAuth(OAuthToken::new(data))
    }

    /// Authentication headers for one request. OAuth tokens may refresh here.
    pub async fn headers(&self, dispatcher: &Dispatcher) -> Result<HeaderMap> {
        match self {
            Credential::ApiKey(key) => key.headers(),
            Credential::OAuth(token) => token.headers(dispatcher).await,
        }
    }

    /// Whether this credential carries scopes (and acts on behalf of a user).
    /// API key permissions are configured server-side and cannot be checked here.
    pub fn supports_scopes(&self) -> bool {
        matches!(self, Credential::OAuth(_))
    }

    pub fn as_oauth(&self) -> Option<&OAuthToken> {
        match self {
            Credential::OAuth(token) => Some(token),
            Credential::ApiKey(_) => None,
        }
    }

    /// Fail fast with `MissingOAuthScope` before any network call.
    /// Credentials without scopes always pass.
    pub async fn require_scope(&self, scope: OAuthScope) -> Result<()> {
        let Some(token) = self.as_oauth() else {
            return Ok(());
        };
        if token.has_scope(scope).await {
            Ok(())
        } else {
            Err(Error::MissingOAuthScope(scope))
        }
    }
}

impl From<ApiKey> for Credential {
    fn from(key: ApiKey) -> Self {
        Credential::ApiKey(key)
    }
}

impl From<OAuthToken> for Credential {
    fn from(token: OAuthToken) -> Self {
        Credential::OAuth(token)
    }
}
