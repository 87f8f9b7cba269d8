//! HTTP transport.
//!
//! [`Transport`] is the seam between request construction and the network.
//! [`HttpTransport`] sends requests with reqwest; tests substitute their own
//! implementation to observe requests without a server.

use async_trait::async_trait;
use cloudinary_core::{ApiResult, CloudinaryError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::request::{EncodedRequest, Method, RequestBody};

/// Header carrying the service's own error description.
pub const CLD_ERROR_HEADER: &str = "x-cld-error";

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the decoded JSON body of a successful response.
    ///
    /// Non-2xx statuses and error envelopes become [`CloudinaryError::Remote`];
    /// bodies that are not JSON, or envelopes of the wrong shape, become
    /// [`CloudinaryError::Decode`].
    async fn send(&self, request: EncodedRequest) -> Result<Value>;
}

/// reqwest-backed transport. No retries and no timeout beyond reqwest's defaults.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(CloudinaryError::Network)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build(&self, request: EncodedRequest) -> reqwest::RequestBuilder {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        if let Some((user, password)) = request.basic_auth {
            builder = builder.basic_auth(user, Some(password));
        }

        match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { fields, file } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                if let Some(file) = file {
                    form = form.part("file", Part::bytes(file.data).file_name(file.file_name));
                }
                // reqwest writes the closing boundary and sets a Content-Type
                // carrying the same boundary it generated.
                builder.multipart(form)
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: EncodedRequest) -> Result<Value> {
        let url = request.url.clone();
        tracing::debug!(url = %url, method = ?request.method, "Sending request");

        let response = self.build(request).send().await?;

        let status = response.status();
        let cld_error = response
            .headers()
            .get(CLD_ERROR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response.bytes().await?;

        if !status.is_success() {
            // The error envelope is optional on failures; a body we cannot read
            // still leaves the status and header.
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| ApiResult::<Value>::from_value(v).ok())
                .and_then(|r| match r {
                    ApiResult::Failure(e) => Some(e.message),
                    ApiResult::Success(_) => None,
                });
            tracing::debug!(url = %url, status = status.as_u16(), "Request rejected");
            return Err(CloudinaryError::Remote {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                cld_error,
                message,
            });
        }

        let value: Value = serde_json::from_slice(&body)?;
        match ApiResult::<Value>::from_value(value)? {
            ApiResult::Success(value) => Ok(value),
            ApiResult::Failure(error) => Err(CloudinaryError::Remote {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                cld_error,
                message: Some(error.message),
            }),
        }
    }
}
