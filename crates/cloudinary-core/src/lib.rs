//! Cloudinary Core Library
//!
//! Pure building blocks shared by the client and the CLI: connection-string
//! resolution, endpoint construction, request signing, public identifier
//! derivation and the response models. Nothing in this crate performs I/O
//! beyond reading the working directory and the environment.

pub mod asset_name;
pub mod config;
pub mod error;
pub mod models;
pub mod resource_type;
pub mod signature;

// Re-export commonly used types
pub use asset_name::{clean_asset_name, ensure_trailing_slash, public_id_for};
pub use config::ServiceConfig;
pub use error::{CloudinaryError, ErrorMetadata, LogLevel, ParseError, Result};
pub use models::{
    ApiErrorBody, ApiResult, Derived, DestroyResponse, Resource, ResourceDetails, ResourceList,
    UploadResponse,
};
pub use resource_type::{Action, ResourceType};
pub use signature::sign;
