//! Request assembly and execution
//!
//! The dispatcher owns the HTTP client and the two base URLs. It knows
//! nothing about credentials: callers hand it the authentication headers to
//! merge, which is what lets OAuth refresh go through the same path without
//! recursing into the credential that is being refreshed.
//!
//! Header merge order, later wins: `accept`, computed `content-type`,
//! credential headers, caller headers.

use std::time::Duration;

use common::ApiConfig;
use open_cloud_auth::{TOKEN_PATH, USERINFO_PATH};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain";

/// Serialization strategy for a request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON-encoded, sent as `application/json`
    Json(Value),
    /// Sent unmodified as `text/plain`, unless the caller overrides the
    /// content type (pre-encoded form bodies do)
    Raw(String),
}

impl Body {
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| Error::web_request("encoding JSON request body", e))
    }

    /// Pre-encoded `application/x-www-form-urlencoded` body.
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        Body::Raw(encoded)
    }

    fn content_type(&self) -> &'static str {
        match self {
            Body::Json(_) => APPLICATION_JSON,
            Body::Raw(_) => TEXT_PLAIN,
        }
    }

    fn encode(self) -> Result<String> {
        match self {
            Body::Json(value) => serde_json::to_string(&value)
                .map_err(|e| Error::web_request("encoding JSON request body", e)),
            Body::Raw(raw) => Ok(raw),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<String> for Body {
    fn from(raw: String) -> Self {
        Body::Raw(raw)
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `application/json` responses
    Json(Value),
    /// Anything else, untouched
    Text(String),
}

/// Builds, sends, and decodes HTTP requests for one API host pair.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: reqwest::Client,
    base_url: String,
    oauth_base_url: String,
}

impl Dispatcher {
    /// Build a dispatcher with its own HTTP client, applying the configured timeout.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::web_request("building HTTP client", e))?;
        Ok(Self::with_client(http, config))
    }

    /// Build a dispatcher around an existing HTTP client.
    pub fn with_client(http: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            oauth_base_url: config.oauth_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; anything else is relative to `base_url`.
    pub fn resolve_url(&self, path: &str) -> String {
        if is_absolute(path) {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// `POST` target for both token grants.
    pub fn token_url(&self) -> String {
        format!("{}/{TOKEN_PATH}", self.oauth_base_url)
    }

    /// OpenID Connect userinfo endpoint on the OAuth host.
    pub fn userinfo_url(&self) -> String {
        format!("{}/{USERINFO_PATH}", self.oauth_base_url)
    }

    /// Send one request and decode its body.
    ///
    /// The HTTP status is not inspected: error bodies come back as data and
    /// are classified by `response::normalize`. A JSON content type with an
    /// unparseable body is a `WebRequest` error.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<Body>,
        extra_headers: Option<&HeaderMap>,
        auth_headers: Option<HeaderMap>,
    ) -> Result<ResponseBody> {
        let url = self.resolve_url(path);

        let content_type = body.as_ref().map_or(TEXT_PLAIN, Body::content_type);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        if let Some(auth) = &auth_headers {
            merge_headers(&mut headers, auth);
        }
        if let Some(extra) = extra_headers {
            merge_headers(&mut headers, extra);
        }

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body.encode()?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::web_request(format!("{method} {url}"), e))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(APPLICATION_JSON));

        let text = response
            .text()
            .await
            .map_err(|e| Error::web_request(format!("reading response body from {url}"), e))?;

        debug!(%status, json = is_json, bytes = text.len(), "response received");

        if is_json {
            serde_json::from_str(&text)
                .map(ResponseBody::Json)
                .map_err(|e| Error::web_request("decoding JSON response body", e))
        } else {
            Ok(ResponseBody::Text(text))
        }
    }
}

fn is_absolute(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Replace every header named in `source`, keeping multi-valued entries.
fn merge_headers(target: &mut HeaderMap, source: &HeaderMap) {
    for name in source.keys() {
        target.remove(name);
    }
    for (name, value) in source {
        target.append(name, value.clone());
    }
}
