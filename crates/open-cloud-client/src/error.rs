//! Error types for client operations
//!
//! A flat taxonomy: callers match on the variant instead of walking a
//! hierarchy. Nothing in this crate retries on any of them.

use open_cloud_auth::OAuthScope;

/// Boxed underlying cause of a transport or decoding failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from dispatching requests and managing credentials.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure, or a body that could not be decoded.
    #[error("web request failed: {context}")]
    WebRequest {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Refresh token or authorization code revoked, expired, or reused.
    /// The user has to go through the authorization flow again.
    #[error("invalid OAuth 2.0 grant: {error_description}")]
    InvalidOAuthGrant { error_description: String },

    /// Any other error returned by the token endpoint during refresh.
    #[error("failed to refresh OAuth 2.0 tokens: {error}")]
    RefreshTokens {
        error: String,
        error_description: String,
    },

    /// Local precondition: the OAuth token was not granted this scope.
    #[error("missing OAuth 2.0 scope: {0}")]
    MissingOAuthScope(OAuthScope),

    /// The API answered with an `error` body.
    #[error("request failed: {error}")]
    GenericRequest {
        error: String,
        error_description: String,
    },

    /// A key or token contains bytes that are not allowed in a header.
    #[error("invalid value for header {name}")]
    InvalidHeader { name: &'static str },
}

impl Error {
    pub(crate) fn web_request(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::WebRequest {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Whether recovering from this error needs a fresh user authorization.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(self, Error::InvalidOAuthGrant { .. })
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn web_request_keeps_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::web_request("decoding JSON response body", cause);
        assert_eq!(
            err.to_string(),
            "web request failed: decoding JSON response body"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_scope_names_scope() {
        let err = Error::MissingOAuthScope(OAuthScope::InventoryItemRead);
        assert_eq!(
            err.to_string(),
            "missing OAuth 2.0 scope: user.inventory-item:read"
        );
    }

    #[test]
    fn only_invalid_grant_requires_reauthorization() {
        assert!(
            Error::InvalidOAuthGrant {
                error_description: "revoked".into()
            }
            .requires_reauthorization()
        );
        assert!(
            !Error::RefreshTokens {
                error: "server_error".into(),
                error_description: String::new()
            }
            .requires_reauthorization()
        );
    }
}
