//! OAuth token record, staleness, and token endpoint bodies
//!
//! Both token endpoint interactions POST a form-urlencoded body to
//! `{oauth_base}/v1/token`:
//! 1. Authorization code exchange (initial OAuth flow completion)
//! 2. Token refresh (whenever the access token is stale)
//!
//! This module only builds the bodies and interprets the results; sending
//! them is the dispatcher's job.

use std::time::Duration;

use common::Secret;
use serde::{Deserialize, Serialize};

use crate::constants::INVALID_GRANT;
use crate::scope;

/// Successful response from the token endpoint for both exchange and refresh.
///
/// `expires_in` is a delta in seconds from the moment the response was
/// received; `OAuthTokenData` pairs it with an `issued_at` stamp.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Omitted when it equals the scope that was already granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
    /// Present when the `openid` scope was granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<Secret<String>>,
}

fn default_token_type() -> String {
    "Bearer".into()
}

/// The full OAuth credential state.
///
/// `client_id`/`client_secret` travel with the token because every refresh
/// has to present them again. `issued_at` is a unix timestamp in
/// milliseconds, stamped when the token endpoint answered.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OAuthTokenData {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
    pub token_type: String,
    pub scope: String,
    pub expires_in: u64,
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub issued_at: u64,
}

impl OAuthTokenData {
    /// Build a record from a token endpoint response.
    pub fn from_response(
        response: TokenResponse,
        client_id: impl Into<String>,
        client_secret: Secret<String>,
        issued_at: u64,
    ) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            scope: response.scope.unwrap_or_default(),
            expires_in: response.expires_in,
            client_id: client_id.into(),
            client_secret,
            issued_at,
        }
    }

    /// Record that replaces `self` after a refresh. Client credentials carry
    /// over, and so does the scope when the response leaves it out.
    pub fn refreshed(&self, mut response: TokenResponse, issued_at: u64) -> Self {
        if response.scope.is_none() {
            response.scope = Some(self.scope.clone());
        }
        Self::from_response(
            response,
            self.client_id.clone(),
            self.client_secret.clone(),
            issued_at,
        )
    }

    /// Expiry as a unix timestamp in milliseconds.
    pub fn expires_at(&self) -> u64 {
        self.issued_at
            .saturating_add(self.expires_in.saturating_mul(1000))
    }

    /// A token is stale once `now + margin` reaches `issued_at + expires_in`.
    /// With a zero margin this is exactly `now >= expires_at`.
    pub fn is_stale_at(&self, now_millis: u64, margin: Duration) -> bool {
        let margin = u64::try_from(margin.as_millis()).unwrap_or(u64::MAX);
        now_millis.saturating_add(margin) >= self.expires_at()
    }

    /// Whether the granted scope set contains `scope`.
    pub fn has_scope(&self, scope: impl AsRef<str>) -> bool {
        scope::has_scope(&self.scope, scope)
    }

    /// Value for the `authorization` header, e.g. `Bearer <access_token>`.
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token.expose())
    }
}

/// Inputs for the authorization code grant.
#[derive(Debug, Clone)]
pub struct CodeExchange {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub code: String,
    /// PKCE verifier, required when the link carried a `code_challenge`
    pub code_verifier: Option<String>,
}

/// Form body for `grant_type=refresh_token`.
pub fn refresh_form(data: &OAuthTokenData) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &data.client_id)
        .append_pair("grant_type", "refresh_token")
        .append_pair("client_secret", data.client_secret.expose())
        .append_pair("refresh_token", data.refresh_token.expose())
        .finish()
}

/// Form body for `grant_type=authorization_code`.
pub fn exchange_form(exchange: &CodeExchange) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("code", &exchange.code)
        .append_pair("client_id", &exchange.client_id)
        .append_pair("grant_type", "authorization_code")
        .append_pair("client_secret", exchange.client_secret.expose());

    if let Some(verifier) = exchange.code_verifier.as_deref().filter(|v| !v.is_empty()) {
        form.append_pair("code_verifier", verifier);
    }
    form.finish()
}

/// How an `error` code from the token endpoint should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenErrorKind {
    /// Revoked or expired grant. Not retryable without re-authorization.
    InvalidGrant,
    /// Any other token endpoint error
    Other,
}

impl TokenErrorKind {
    pub fn classify(error: &str) -> Self {
        if error == INVALID_GRANT {
            TokenErrorKind::InvalidGrant
        } else {
            TokenErrorKind::Other
        }
    }
}

/// Current wall clock time as unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
