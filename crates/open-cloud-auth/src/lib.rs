//! Roblox Open Cloud OAuth 2.0 building blocks
//!
//! Pure, transport-free pieces of the OAuth flow: scope handling, the token
//! record and its staleness rule, token endpoint form bodies, PKCE and the
//! authorization link, plus an optional token file for callers that persist
//! tokens across restarts. The HTTP side lives in `open-cloud-client`.
//!
//! Credential flow:
//! 1. Caller builds a link with `pkce::build_authorization_url()`
//! 2. User authorizes and the redirect carries an authorization code
//! 3. Client exchanges the code using `token::exchange_form()`
//! 4. Response becomes an `OAuthTokenData` record stamped with `issued_at`
//! 5. Once stale, the client refreshes using `token::refresh_form()`

pub mod constants;
pub mod error;
pub mod pkce;
pub mod scope;
pub mod store;
pub mod token;

pub use constants::*;
pub use error::{Error, Result};
pub use pkce::{
    AuthorizationRequest, PromptType, ResponseType, build_authorization_url, compute_challenge,
    generate_verifier,
};
pub use scope::{OAuthScope, has_scope};
pub use store::{load_token, save_token};
pub use token::{
    CodeExchange, OAuthTokenData, TokenErrorKind, TokenResponse, exchange_form, now_millis,
    refresh_form,
};
