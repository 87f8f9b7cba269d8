use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Default base of the upload and admin APIs.
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Default base of public delivery URLs.
pub const DEFAULT_RESOURCE_BASE_URL: &str = "https://res.cloudinary.com";

/// Resource types
///
/// `Pdf` travels as `image` on the wire but stays distinct locally so callers
/// can tell what they uploaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Image,
    Pdf,
    Video,
    Raw,
}

impl ResourceType {
    /// Path segment used by the remote API for this type.
    pub fn wire_segment(&self) -> &'static str {
        match self {
            ResourceType::Image | ResourceType::Pdf => "image",
            ResourceType::Video => "video",
            ResourceType::Raw => "raw",
        }
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(ResourceType::Image),
            "pdf" => Ok(ResourceType::Pdf),
            "video" => Ok(ResourceType::Video),
            "raw" => Ok(ResourceType::Raw),
            _ => Err(format!(
                "Invalid resource type: {}. Must be: image, pdf, video, or raw",
                s
            )),
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ResourceType::Image => write!(f, "image"),
            ResourceType::Pdf => write!(f, "pdf"),
            ResourceType::Video => write!(f, "video"),
            ResourceType::Raw => write!(f, "raw"),
        }
    }
}

/// Remote action addressed by an API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upload,
    Destroy,
    Rename,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Upload => "upload",
            Action::Destroy => "destroy",
            Action::Rename => "rename",
        }
    }
}

/// `{base}/{cloud}/{segment}/{action}`, selected directly by resource type.
pub fn api_endpoint(
    base_url: &str,
    cloud_name: &str,
    resource_type: ResourceType,
    action: Action,
) -> String {
    format!(
        "{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        cloud_name,
        resource_type.wire_segment(),
        action.as_str()
    )
}

/// `{base}/{cloud}`, root of the admin API.
pub fn admin_endpoint(base_url: &str, cloud_name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), cloud_name)
}

/// Public delivery URL of an uploaded asset. No network call is made.
pub fn resource_url(
    resource_base_url: &str,
    cloud_name: &str,
    resource_type: ResourceType,
    public_id: &str,
) -> String {
    format!(
        "{}/{}/{}/upload/{}",
        resource_base_url.trim_end_matches('/'),
        cloud_name,
        resource_type.wire_segment(),
        public_id
    )
}
