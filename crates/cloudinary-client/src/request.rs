//! Request construction.
//!
//! Every signed request carries `api_key` and a `timestamp` computed once and
//! reused for both the field value and the signature input. The body is either
//! multipart (uploads) or form-encoded (destroy, rename).

use std::collections::BTreeMap;

use cloudinary_core::{sign, ServiceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// File content attached as the `file` part of a multipart body.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("len", &self.data.len())
            .finish()
    }
}

/// What an upload sends. Exactly one source per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Local bytes, read fully into memory.
    Bytes(FilePart),
    /// A URL the remote service fetches itself; sent as a plain `file` field.
    RemoteUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Multipart {
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    },
    Form(Vec<(String, String)>),
}

/// A fully built request, ready for a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
    /// `(username, password)` for basic auth (admin API only).
    pub basic_auth: Option<(String, String)>,
}

impl EncodedRequest {
    /// Unsigned GET with basic auth, as used by the admin API.
    pub fn admin_get(config: &ServiceConfig, url: String) -> Self {
        Self {
            method: Method::Get,
            url,
            body: RequestBody::Empty,
            basic_auth: Some((
                config.api_key().to_string(),
                config.api_secret().to_string(),
            )),
        }
    }

    /// Value of a text field in the body, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        let fields = match &self.body {
            RequestBody::Multipart { fields, .. } => fields,
            RequestBody::Form(fields) => fields,
            RequestBody::Empty => return None,
        };
        fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for signed POST requests.
pub struct RequestBuilder<'a> {
    config: &'a ServiceConfig,
    url: String,
    params: BTreeMap<String, String>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ServiceConfig, url: impl Into<String>) -> Self {
        Self {
            config,
            url: url.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter. It takes part in the signature unless it is one of
    /// [`cloudinary_core::signature::UNSIGNED_PARAMS`].
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Multipart upload body stamped with the current time.
    pub fn multipart(self, payload: Payload) -> EncodedRequest {
        let timestamp = now();
        self.multipart_at(payload, timestamp)
    }

    pub fn multipart_at(self, payload: Payload, timestamp: i64) -> EncodedRequest {
        let url = self.url.clone();
        let mut fields = self.signed_fields(timestamp);
        let file = match payload {
            Payload::Bytes(part) => Some(part),
            Payload::RemoteUrl(remote) => {
                fields.push(("file".to_string(), remote));
                None
            }
        };
        EncodedRequest {
            method: Method::Post,
            url,
            body: RequestBody::Multipart { fields, file },
            basic_auth: None,
        }
    }

    /// Form-encoded body stamped with the current time.
    pub fn form(self) -> EncodedRequest {
        let timestamp = now();
        self.form_at(timestamp)
    }

    pub fn form_at(self, timestamp: i64) -> EncodedRequest {
        let url = self.url.clone();
        EncodedRequest {
            method: Method::Post,
            url,
            body: RequestBody::Form(self.signed_fields(timestamp)),
            basic_auth: None,
        }
    }

    fn signed_fields(mut self, timestamp: i64) -> Vec<(String, String)> {
        self.params
            .insert("api_key".to_string(), self.config.api_key().to_string());
        self.params
            .insert("timestamp".to_string(), timestamp.to_string());

        let signature = sign(&self.params, self.config.api_secret());

        let mut fields: Vec<(String, String)> = self.params.into_iter().collect();
        fields.push(("signature".to_string(), signature));
        fields
    }
}

/// Seconds since the Unix epoch.
fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
