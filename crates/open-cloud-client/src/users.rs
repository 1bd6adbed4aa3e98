//! User resources: OAuth userinfo and inventory listing

use std::fmt::Display;

use open_cloud_auth::OAuthScope;
use reqwest::Method;

use crate::client::OpenCloudClient;
use crate::error::Result;
use crate::types::{ListInventoryItemsResponse, OAuthUserInfo};

/// Query parameters for [`Users::list_inventory_items`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInventoryItems {
    /// The service may return fewer; values above 100 are clamped server-side
    pub max_page_size: u32,
    pub filter: Option<String>,
    /// Token from a previous page. Other parameters must match that call.
    pub page_token: Option<String>,
}

impl Default for ListInventoryItems {
    fn default() -> Self {
        Self {
            max_page_size: 10,
            filter: None,
            page_token: None,
        }
    }
}

impl ListInventoryItems {
    fn query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("maxPageSize", &self.max_page_size.to_string());
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.is_empty()) {
            query.append_pair("filter", filter);
        }
        if let Some(token) = self.page_token.as_deref().filter(|t| !t.is_empty()) {
            query.append_pair("pageToken", token);
        }
        query.finish()
    }
}

pub struct Users<'a> {
    client: &'a OpenCloudClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a OpenCloudClient) -> Self {
        Self { client }
    }

    /// Claims about the user who authorized the current OAuth token.
    ///
    /// `None` for credentials that do not act on behalf of a user.
    pub async fn get(&self) -> Result<Option<OAuthUserInfo>> {
        if !self.client.credential().supports_scopes() {
            return Ok(None);
        }

        let url = self.client.dispatcher().userinfo_url();
        let info = self
            .client
            .request(&url, Method::GET, None, None, true)
            .await?
            .into_result()?;
        Ok(Some(info))
    }

    /// One page of the user's inventory.
    ///
    /// Visibility depends on the target user's privacy settings. OAuth tokens
    /// without `user.inventory-item:read` fail before any request is sent.
    pub async fn list_inventory_items(
        &self,
        user_id: impl Display,
        params: &ListInventoryItems,
    ) -> Result<ListInventoryItemsResponse> {
        self.client
            .credential()
            .require_scope(OAuthScope::InventoryItemRead)
            .await?;

        let path = format!("v2/users/{user_id}/inventory-items?{}", params.query());
        self.client
            .request(&path, Method::GET, None, None, true)
            .await?
            .into_result()
    }
}
