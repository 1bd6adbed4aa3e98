//! PKCE (RFC 7636) and the authorization link
//!
//! The verifier stays with the caller and is sent during code exchange; the
//! S256 challenge goes into the authorization link so the server can tie the
//! exchange back to the party that started the flow.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::OAuthAppConfig;
use rand::RngExt;
use sha2::{Digest, Sha256};
use url::Url;

use crate::constants::AUTHORIZE_PATH;
use crate::error::{Error, Result};
use crate::scope::OAuthScope;

/// Generate a cryptographically random PKCE code verifier.
///
/// 64 random bytes encoded as URL-safe base64 without padding (86 chars,
/// inside the 43-128 range RFC 7636 allows).
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 64];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compute the S256 code challenge from a verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// `prompt` parameter of the authorization link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptType {
    None,
    Login,
    Consent,
    #[default]
    SelectAccount,
}

impl PromptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptType::None => "none",
            PromptType::Login => "login",
            PromptType::Consent => "consent",
            PromptType::SelectAccount => "select_account",
        }
    }
}

/// `response_type` parameter of the authorization link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    None,
    #[default]
    Code,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::None => "none",
            ResponseType::Code => "code",
        }
    }
}

/// Parameters of the authorization link.
///
/// Empty optional values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub redirect_uri: String,
    /// Space-delimited scopes, see `OAuthScope::join`
    pub scope: String,
    pub prompt: PromptType,
    pub response_type: ResponseType,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

impl AuthorizationRequest {
    /// Request for a configured application. Every configured scope must be
    /// one the authorization server knows.
    pub fn for_app(app: &OAuthAppConfig) -> Result<Self> {
        let scopes = app
            .scopes
            .iter()
            .map(|s| s.parse::<OAuthScope>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            client_id: app.client_id.clone(),
            redirect_uri: app.redirect_uri.clone(),
            scope: OAuthScope::join(&scopes),
            ..Self::default()
        })
    }

    /// Attach a PKCE S256 challenge computed from `verifier`.
    pub fn with_pkce(mut self, verifier: &str) -> Self {
        self.code_challenge = Some(compute_challenge(verifier));
        self.code_challenge_method = Some("S256".into());
        self
    }
}

/// Build the authorization link users open to grant the application access.
pub fn build_authorization_url(oauth_base_url: &str, request: &AuthorizationRequest) -> Result<String> {
    let base = format!("{}/", oauth_base_url.trim_end_matches('/'));
    let mut url = Url::parse(&base)
        .and_then(|base| base.join(AUTHORIZE_PATH))
        .map_err(|e| Error::InvalidUrl(format!("{oauth_base_url}: {e}")))?;

    {
        let mut params = url.query_pairs_mut();
        params
            .append_pair("scope", &request.scope)
            .append_pair("prompt", request.prompt.as_str())
            .append_pair("client_id", &request.client_id)
            .append_pair("redirect_uri", &request.redirect_uri)
            .append_pair("response_type", request.response_type.as_str());

        let optional = [
            ("state", &request.state),
            ("nonce", &request.nonce),
            ("code_challenge", &request.code_challenge),
            ("code_challenge_method", &request.code_challenge_method),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                params.append_pair(name, value);
            }
        }
    }

    Ok(url.into())
}
