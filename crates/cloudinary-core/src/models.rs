//! Response types decoded from the remote API.
//!
//! Every field is optional: the API omits fields that do not apply (a raw file
//! has no `format`, a destroy call only returns `result`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CloudinaryError;

/// Result of an upload or rename call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    /// Size in bytes
    #[serde(default, rename = "bytes")]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub result: Option<String>,
}

/// Result of a destroy call. `result == "ok"` means the asset is gone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestroyResponse {
    #[serde(default)]
    pub result: Option<String>,
}

impl DestroyResponse {
    pub fn is_ok(&self) -> bool {
        self.result.as_deref() == Some("ok")
    }
}

/// An image or raw file as listed by the admin API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub public_id: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default, rename = "bytes")]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub secure_url: Option<String>,
}

/// One page of the admin resource listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Pass back to fetch the next page; absent on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Derived asset (a stored transformation of the original).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    #[serde(default)]
    pub transformation: Option<String>,
    #[serde(default, rename = "bytes")]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDetails {
    pub public_id: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default, rename = "bytes")]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub derived: Vec<Derived>,
}

/// Body of the `{"error": {"message": "..."}}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

/// A decoded response body: either the success payload or the error envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success(T),
    Failure(ApiErrorBody),
}

impl<T: serde::de::DeserializeOwned> ApiResult<T> {
    /// Decode a JSON value. An `error` key selects the failure branch, and an
    /// `error` without a string `message` is a decode error.
    pub fn from_value(value: Value) -> Result<Self, CloudinaryError> {
        if value.get("error").is_some() {
            let envelope: ErrorEnvelope = serde_json::from_value(value).map_err(|e| {
                CloudinaryError::Decode(format!("Malformed error envelope: {}", e))
            })?;
            return Ok(ApiResult::Failure(envelope.error));
        }
        Ok(ApiResult::Success(serde_json::from_value(value)?))
    }
}
