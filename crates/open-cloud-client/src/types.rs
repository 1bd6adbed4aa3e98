//! Resource types returned by the Open Cloud API

use serde::{Deserialize, Serialize};

/// A Roblox group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    /// `groups/{id}`
    pub path: String,
    /// `users/{id}`, absent for ownerless groups
    #[serde(default)]
    pub owner: Option<String>,
    pub locked: bool,
    pub verified: bool,
    pub create_time: String,
    pub update_time: String,
    pub display_name: String,
    pub description: String,
    pub member_count: u64,
    pub public_entry_allowed: bool,
}

/// An item in a user's inventory. Exactly one of the detail fields is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// `users/{id}/inventory-items/{item}`
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_details: Option<AssetDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_details: Option<BadgeDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_pass_details: Option<GamePassDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_server_details: Option<PrivateServerDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    pub asset_id: String,
    /// Left untyped: the API adds asset types without notice
    #[serde(default)]
    pub inventory_item_asset_type: serde_json::Value,
    /// Identifies the copy of the asset owned by the user
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collectible_details: Option<CollectibleDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectibleDetails {
    pub item_id: String,
    pub instance_id: String,
    pub instance_state: CollectibleInstanceState,
    /// Only for Limiteds: the nth replica of the asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<u64>,
}

/// Whether a collectible instance can be resold or traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectibleInstanceState {
    Hold,
    Available,
    CollectibleItemInstanceStateUnspecified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDetails {
    pub badge_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePassDetails {
    pub game_pass_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateServerDetails {
    pub private_server_id: String,
}

/// One page of inventory items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInventoryItemsResponse {
    #[serde(default)]
    pub inventory_items: Vec<InventoryItem>,
    /// Pass as `page_token` to fetch the next page; absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Claims returned by the OpenID Connect userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthUserInfo {
    /// Roblox user ID
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Account creation time, unix seconds
    #[serde(default)]
    pub created_at: Option<u64>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}
