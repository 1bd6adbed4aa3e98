//! Open Cloud endpoint constants
//!
//! Production hosts. Both bases can be overridden through `common::ApiConfig`,
//! which is how tests point the client at a mock server.

/// Base URL for resource endpoints (users, groups, inventory)
pub const API_BASE_URL: &str = "https://apis.roblox.com/cloud";

/// Base URL for the OAuth 2.0 authorization server
pub const OAUTH_BASE_URL: &str = "https://apis.roblox.com/oauth";

/// Token endpoint, relative to the OAuth base. Serves both the
/// `authorization_code` and `refresh_token` grants.
pub const TOKEN_PATH: &str = "v1/token";

/// OpenID Connect userinfo endpoint, relative to the OAuth base
pub const USERINFO_PATH: &str = "v1/userinfo";

/// Authorization (consent) page, relative to the OAuth base
pub const AUTHORIZE_PATH: &str = "v1/authorize";

/// Error code returned when a refresh token or authorization code is revoked,
/// expired, or otherwise unusable
pub const INVALID_GRANT: &str = "invalid_grant";
