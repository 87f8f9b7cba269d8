//! Error types module
//!
//! All failures surfaced by the client are unified under [`CloudinaryError`].
//! Connection-string problems have their own [`ParseError`] so callers can match
//! on the exact reason a URI was rejected.
//!
//! Nothing here is retried. A bad signature cannot be detected locally; the
//! remote API rejects it and that rejection arrives as [`CloudinaryError::Remote`].

use std::io;
use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for caller mistakes like a malformed URI
    Debug,
    /// Warning level - for remote rejections the caller may act on
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be reported.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "REMOTE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same call could succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Reasons a connection string is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid connection URI: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Missing cloudinary:// scheme in URI (got {0:?})")]
    InvalidScheme(String),

    #[error("No API secret provided in URI")]
    MissingSecret,

    #[error("No cloud name provided in URI")]
    MissingCloudName,
}

#[derive(Debug, thiserror::Error)]
pub enum CloudinaryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Path error on {}: {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Request encoding error: {0}")]
    Encoding(String),

    #[error("Request error: {status} {status_text}{}", format_remote_detail(.message, .cld_error))]
    Remote {
        status: u16,
        status_text: String,
        /// Value of the `X-Cld-Error` response header, when present.
        cld_error: Option<String>,
        /// `error.message` from the JSON error envelope, when present.
        message: Option<String>,
    },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Invalid keep-files pattern: {0}")]
    InvalidKeepPattern(#[source] regex::Error),
}

fn format_remote_detail(message: &Option<String>, cld_error: &Option<String>) -> String {
    match (message, cld_error) {
        (Some(msg), _) => format!(": {}", msg),
        (None, Some(header)) => format!(": {}", header),
        (None, None) => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, CloudinaryError>;

impl CloudinaryError {
    /// Wrap an I/O failure on a local path.
    pub fn path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CloudinaryError::Path {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CloudinaryError {
    fn from(err: serde_json::Error) -> Self {
        CloudinaryError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for CloudinaryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CloudinaryError::Decode(err.to_string())
        } else {
            CloudinaryError::Network(err)
        }
    }
}

impl ErrorMetadata for CloudinaryError {
    fn error_code(&self) -> &'static str {
        match self {
            CloudinaryError::Parse(ParseError::InvalidUrl(_)) => "INVALID_URL",
            CloudinaryError::Parse(ParseError::InvalidScheme(_)) => "INVALID_SCHEME",
            CloudinaryError::Parse(ParseError::MissingSecret) => "MISSING_SECRET",
            CloudinaryError::Parse(ParseError::MissingCloudName) => "MISSING_CLOUD_NAME",
            CloudinaryError::Path { .. } => "PATH_ERROR",
            CloudinaryError::Encoding(_) => "ENCODING_ERROR",
            CloudinaryError::Remote { .. } => "REMOTE_ERROR",
            CloudinaryError::Decode(_) => "DECODE_ERROR",
            CloudinaryError::Network(_) => "NETWORK_ERROR",
            CloudinaryError::InvalidKeepPattern(_) => "INVALID_KEEP_PATTERN",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            CloudinaryError::Network(_) => true,
            CloudinaryError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            CloudinaryError::Parse(_) | CloudinaryError::InvalidKeepPattern(_) => LogLevel::Debug,
            CloudinaryError::Path { .. } | CloudinaryError::Remote { .. } => LogLevel::Warn,
            CloudinaryError::Encoding(_)
            | CloudinaryError::Decode(_)
            | CloudinaryError::Network(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_parse() {
        let err = CloudinaryError::from(ParseError::MissingSecret);
        assert_eq!(err.error_code(), "MISSING_SECRET");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert_eq!(err.to_string(), "No API secret provided in URI");
    }

    #[test]
    fn test_error_metadata_remote() {
        let err = CloudinaryError::Remote {
            status: 401,
            status_text: "Unauthorized".to_string(),
            cld_error: Some("Invalid Signature".to_string()),
            message: None,
        };
        assert_eq!(err.error_code(), "REMOTE_ERROR");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert_eq!(
            err.to_string(),
            "Request error: 401 Unauthorized: Invalid Signature"
        );
    }

    #[test]
    fn test_remote_message_preferred_over_header() {
        let err = CloudinaryError::Remote {
            status: 400,
            status_text: "Bad Request".to_string(),
            cld_error: Some("header text".to_string()),
            message: Some("Missing required parameter - public_id".to_string()),
        };
        assert!(err
            .to_string()
            .ends_with("Missing required parameter - public_id"));
    }

    #[test]
    fn test_server_errors_are_recoverable() {
        let err = CloudinaryError::Remote {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            cld_error: None,
            message: None,
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Request error: 503 Service Unavailable");
    }

    #[test]
    fn test_path_error_display() {
        let err = CloudinaryError::path(
            "/missing/file.png",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.error_code(), "PATH_ERROR");
        assert!(err.to_string().contains("/missing/file.png"));
    }
}
