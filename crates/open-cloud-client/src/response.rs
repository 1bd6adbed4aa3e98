//! Response normalization
//!
//! Open Cloud and its OAuth server can answer HTTP 200 with a body that
//! carries an `error` field. `normalize` is the one place that tells those
//! apart from real data; it runs on every JSON body before typed access.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Error fields of a failed response, passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub error: String,
    pub error_description: String,
    /// Remaining fields of the error body
    pub details: Map<String, Value>,
}

/// Discriminated result of an API call.
///
/// Serializes to the wire shape `{"success": true, "data": ...}` or
/// `{"success": false, "error": ..., "error_description": ..., ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequestResponse<T> {
    Success(T),
    Failure(ApiError),
}

/// Classify a decoded JSON body.
///
/// An object whose `error` field is truthy is a failure; anything else is
/// success data.
pub fn normalize(body: Value) -> ClientRequestResponse<Value> {
    match body {
        Value::Object(mut fields) if fields.get("error").is_some_and(is_truthy) => {
            let error = fields.remove("error").map(into_text).unwrap_or_default();
            let error_description = fields
                .remove("error_description")
                .map(into_text)
                .unwrap_or_default();
            ClientRequestResponse::Failure(ApiError {
                error,
                error_description,
                details: fields,
            })
        }
        body => ClientRequestResponse::Success(body),
    }
}

/// JavaScript truthiness, which is what API error bodies are written against.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl<T> ClientRequestResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ClientRequestResponse::Success(_))
    }

    /// Success data, discarding failure details.
    pub fn data(self) -> Option<T> {
        match self {
            ClientRequestResponse::Success(data) => Some(data),
            ClientRequestResponse::Failure(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ClientRequestResponse<U> {
        match self {
            ClientRequestResponse::Success(data) => ClientRequestResponse::Success(f(data)),
            ClientRequestResponse::Failure(err) => ClientRequestResponse::Failure(err),
        }
    }

    /// Turn a failure into `Error::GenericRequest`.
    pub fn into_result(self) -> Result<T> {
        match self {
            ClientRequestResponse::Success(data) => Ok(data),
            ClientRequestResponse::Failure(err) => Err(Error::GenericRequest {
                error: err.error,
                error_description: err.error_description,
            }),
        }
    }
}

impl ClientRequestResponse<Value> {
    /// Deserialize success data into `T`. Failures pass through untouched.
    pub fn decode<T: DeserializeOwned>(self) -> Result<ClientRequestResponse<T>> {
        match self {
            ClientRequestResponse::Success(data) => serde_json::from_value(data)
                .map(ClientRequestResponse::Success)
                .map_err(|e| Error::web_request("response body has an unexpected shape", e)),
            ClientRequestResponse::Failure(err) => Ok(ClientRequestResponse::Failure(err)),
        }
    }
}

impl<T: Serialize> Serialize for ClientRequestResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ClientRequestResponse::Success(data) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            ClientRequestResponse::Failure(err) => {
                let mut map = serializer.serialize_map(Some(3 + err.details.len()))?;
                for (key, value) in &err.details {
                    map.serialize_entry(key, value)?;
                }
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", &err.error)?;
                map.serialize_entry("error_description", &err.error_description)?;
                map.end()
            }
        }
    }
}
