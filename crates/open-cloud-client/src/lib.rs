//! Typed client for the Roblox Open Cloud REST API
//!
//! Every call funnels through one path:
//! `OpenCloudClient::request` → `Credential::headers` (may refresh an OAuth
//! token) → `Dispatcher::send` → `response::normalize`. The result is always a
//! `ClientRequestResponse`, so API-level failures (HTTP 200 with an `error`
//! body) are never mistaken for data.
//!
//! ```no_run
//! # async fn run() -> open_cloud_client::Result<()> {
//! use open_cloud_client::{ApiKey, OpenCloudClient};
//!
//! let client = OpenCloudClient::new(ApiKey::new("my-key"))?;
//! let group = client.groups().get(7).await?;
//! println!("{} has {} members", group.display_name, group.member_count);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credential;
pub mod dispatch;
pub mod error;
pub mod groups;
pub mod oauth;
pub mod response;
pub mod types;
pub mod users;

pub use client::OpenCloudClient;
pub use credential::{ApiKey, Credential, OAuthToken};
pub use dispatch::{Body, Dispatcher, ResponseBody};
pub use error::{Error, Result};
pub use oauth::{exchange_code, exchange_code_for_tokens, refresh_tokens};
pub use response::{ApiError, ClientRequestResponse, normalize};
pub use types::{Group, InventoryItem, ListInventoryItemsResponse, OAuthUserInfo};
pub use users::ListInventoryItems;

pub use open_cloud_auth::{CodeExchange, OAuthScope, OAuthTokenData};
