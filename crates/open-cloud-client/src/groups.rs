//! Group resources

use std::fmt::Display;

use reqwest::Method;

use crate::client::OpenCloudClient;
use crate::error::Result;
use crate::types::Group;

pub struct Groups<'a> {
    client: &'a OpenCloudClient,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(client: &'a OpenCloudClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, group_id: impl Display) -> Result<Group> {
        let path = format!("v2/groups/{group_id}");
        self.client
            .request(&path, Method::GET, None, None, true)
            .await?
            .into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::error::Error;
    use common::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenCloudClient {
        let config = ApiConfig {
            base_url: format!("{}/cloud", server.uri()),
            oauth_base_url: format!("{}/oauth", server.uri()),
            ..ApiConfig::default()
        };
        OpenCloudClient::with_config(&config, Credential::api_key("k")).unwrap()
    }

    #[tokio::test]
    async fn get_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloud/v2/groups/7"))
            .and(header("x-api-key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "7",
                "path": "groups/7",
                "locked": false,
                "verified": true,
                "createTime": "2009-07-30T00:00:00Z",
                "updateTime": "2024-01-01T00:00:00Z",
                "displayName": "Roblox",
                "description": "official",
                "memberCount": 12,
                "publicEntryAllowed": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let group = client(&server).groups().get(7).await.unwrap();
        assert_eq!(group.display_name, "Roblox");
        assert!(group.owner.is_none());
        assert_eq!(group.member_count, 12);
    }

    #[tokio::test]
    async fn get_group_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloud/v2/groups/0"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "NOT_FOUND",
                "error_description": "group does not exist",
                "code": 5
            })))
            .mount(&server)
            .await;

        let err = client(&server).groups().get("0").await.unwrap_err();
        match err {
            Error::GenericRequest {
                error,
                error_description,
            } => {
                assert_eq!(error, "NOT_FOUND");
                assert_eq!(error_description, "group does not exist");
            }
            other => panic!("expected GenericRequest, got {other:?}"),
        }
    }
}
