//! OAuth 2.0 scopes
//!
//! A token's `scope` field is a space-delimited set. Membership is decided
//! per token, so `"openid profile"` grants `profile` but not `prof`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Scopes an Open Cloud OAuth 2.0 application can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OAuthScope {
    #[serde(rename = "openid")]
    OpenId,
    #[serde(rename = "profile")]
    Profile,
    #[serde(rename = "asset:read")]
    AssetRead,
    #[serde(rename = "asset:write")]
    AssetWrite,
    #[serde(rename = "user.inventory-item:read")]
    InventoryItemRead,
    #[serde(rename = "group:read")]
    GroupRead,
    #[serde(rename = "universe-messaging-service:publish")]
    UniverseMessagingPublish,
}

impl OAuthScope {
    pub const ALL: [OAuthScope; 7] = [
        OAuthScope::OpenId,
        OAuthScope::Profile,
        OAuthScope::AssetRead,
        OAuthScope::AssetWrite,
        OAuthScope::InventoryItemRead,
        OAuthScope::GroupRead,
        OAuthScope::UniverseMessagingPublish,
    ];

    /// Wire identifier of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthScope::OpenId => "openid",
            OAuthScope::Profile => "profile",
            OAuthScope::AssetRead => "asset:read",
            OAuthScope::AssetWrite => "asset:write",
            OAuthScope::InventoryItemRead => "user.inventory-item:read",
            OAuthScope::GroupRead => "group:read",
            OAuthScope::UniverseMessagingPublish => "universe-messaging-service:publish",
        }
    }

    /// Join scopes into the space-delimited form the authorization server expects.
    pub fn join(scopes: &[OAuthScope]) -> String {
        scopes
            .iter()
            .map(OAuthScope::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl AsRef<str> for OAuthScope {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OAuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OAuthScope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| Error::UnknownScope(s.to_string()))
    }
}

/// Whether the space-delimited `scopes` string contains `scope` as a whole token.
pub fn has_scope(scopes: &str, scope: impl AsRef<str>) -> bool {
    let scope = scope.as_ref();
    scopes.split_whitespace().any(|granted| granted == scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_scope_matches_whole_tokens_only() {
        assert!(has_scope("openid profile", "profile"));
        assert!(has_scope("openid profile", OAuthScope::OpenId));
        assert!(!has_scope("openid profile", "prof"));
        assert!(!has_scope("openid profile", "openid profile"));
        assert!(!has_scope("", "openid"));
    }

    #[test]
    fn has_scope_handles_colon_scopes() {
        let granted = "openid user.inventory-item:read";
        assert!(has_scope(granted, OAuthScope::InventoryItemRead));
        assert!(!has_scope(granted, "user.inventory-item"));
        assert!(!has_scope(granted, OAuthScope::GroupRead));
    }

    #[test]
    fn scope_parses_from_wire_identifier() {
        for scope in OAuthScope::ALL {
            assert_eq!(scope.as_str().parse::<OAuthScope>().unwrap(), scope);
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = "inventory:read".parse::<OAuthScope>().unwrap_err();
        assert!(matches!(err, Error::UnknownScope(s) if s == "inventory:read"));
    }

    #[test]
    fn scope_serde_uses_wire_identifier() {
        let json = serde_json::to_string(&OAuthScope::UniverseMessagingPublish).unwrap();
        assert_eq!(json, "\"universe-messaging-service:publish\"");
    }

    #[test]
    fn join_is_space_delimited() {
        assert_eq!(
            OAuthScope::join(&[OAuthScope::OpenId, OAuthScope::GroupRead]),
            "openid group:read"
        );
    }
}
