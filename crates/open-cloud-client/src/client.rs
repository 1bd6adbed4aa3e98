//! Open Cloud client: a dispatcher paired with the active credential

use std::sync::Arc;

use common::ApiConfig;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::credential::Credential;
use crate::dispatch::{Body, Dispatcher, ResponseBody};
use crate::error::Result;
use crate::groups::Groups;
use crate::response::{ClientRequestResponse, normalize};
use crate::users::Users;

/// Entry point for API calls.
///
/// The credential is shared behind an `Arc`, so several clients (e.g. one per
/// host configuration) can use the same OAuth token and its refresh guard.
#[derive(Debug, Clone)]
pub struct OpenCloudClient {
    dispatcher: Dispatcher,
    credential: Arc<Credential>,
}

impl OpenCloudClient {
    /// Client for the production endpoints.
    pub fn new(credential: impl Into<Credential>) -> Result<Self> {
        Self::with_config(&ApiConfig::default(), credential)
    }

    pub fn with_config(config: &ApiConfig, credential: impl Into<Credential>) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
            credential: Arc::new(credential.into()),
        })
    }

    pub fn from_parts(dispatcher: Dispatcher, credential: Arc<Credential>) -> Self {
        Self {
            dispatcher,
            credential,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Send a request and normalize its response.
    ///
    /// With `with_auth`, credential headers are generated first; a failed
    /// OAuth refresh aborts the request before anything is sent. JSON bodies
    /// are normalized and decoded into `T`. Other bodies skip normalization
    /// and are decoded from the raw text, so `T = String` receives them as is.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<Body>,
        headers: Option<&HeaderMap>,
        with_auth: bool,
    ) -> Result<ClientRequestResponse<T>> {
        let auth = if with_auth {
            Some(self.credential.headers(&self.dispatcher).await?)
        } else {
            None
        };

        match self.dispatcher.send(path, method, body, headers, auth).await? {
            ResponseBody::Json(value) => normalize(value).decode(),
            ResponseBody::Text(text) => ClientRequestResponse::Success(Value::String(text)).decode(),
        }
    }

    /// Authenticated `GET`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ClientRequestResponse<T>> {
        self.request(path, Method::GET, None, None, true).await
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }
}
