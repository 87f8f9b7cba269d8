//! Upload orchestration.
//!
//! `upload` decides between a single file, a caller-supplied stream and a
//! recursive directory walk, derives each public identifier from the path and
//! sends one signed multipart request per file.

use std::io;
use std::path::{Path, PathBuf};

use cloudinary_core::asset_name::public_id_for;
use cloudinary_core::{
    clean_asset_name, Action, CloudinaryError, ResourceType, Result, UploadResponse,
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

use crate::request::{FilePart, Payload, RequestBuilder};
use crate::walk::FileWalk;
use crate::Service;

/// Caller-supplied upload content. Read fully into memory before sending.
pub type DataReader = Box<dyn AsyncRead + Send + Unpin>;

/// Settings for one upload call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Remote folder prefixed to every derived public id.
    pub prepend_path: String,
    /// Let the service pick the public id instead of deriving it from the path.
    pub random_public_id: bool,
    pub resource_type: ResourceType,
}

impl UploadOptions {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            ..Default::default()
        }
    }

    pub fn with_prepend(mut self, prepend: impl Into<String>) -> Self {
        self.prepend_path = prepend.into();
        self
    }

    pub fn with_random_public_id(mut self, random: bool) -> Self {
        self.random_public_id = random;
        self
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Uploaded {
        path: PathBuf,
        response: UploadResponse,
    },
    /// Zero-byte file, nothing sent.
    Skipped { path: PathBuf },
    /// Simulate mode: the request was built but not sent.
    Simulated {
        path: PathBuf,
        public_id: Option<String>,
    },
}

impl UploadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            UploadOutcome::Uploaded { path, .. }
            | UploadOutcome::Skipped { path }
            | UploadOutcome::Simulated { path, .. } => path,
        }
    }

    /// Remote public id when known, otherwise the would-be id, otherwise the local path.
    pub fn public_id(&self) -> String {
        let known = match self {
            UploadOutcome::Uploaded { response, .. } => response.public_id.clone(),
            UploadOutcome::Simulated { public_id, .. } => public_id.clone(),
            UploadOutcome::Skipped { .. } => None,
        };
        known.unwrap_or_else(|| self.path().to_string_lossy().into_owned())
    }

    pub fn response(&self) -> Option<&UploadResponse> {
        match self {
            UploadOutcome::Uploaded { response, .. } => Some(response),
            _ => None,
        }
    }
}

impl Service {
    /// Upload a file or a set of files.
    ///
    /// `path` is always required: it names the asset even when `data` is given.
    /// With `data`, the content is read from it and `path` is never opened or
    /// inspected. Without `data`, a regular file path uploads that file and a
    /// directory path uploads every regular file below it, with public ids
    /// relative to the directory. Any other kind of path is a `Path` error.
    ///
    /// Returns one outcome per file, in walk order.
    pub async fn upload(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        options: &UploadOptions,
    ) -> Result<Vec<UploadOutcome>> {
        let path = path.as_ref();

        if let Some(reader) = data {
            let outcome = self.upload_file(path, None, Some(reader), options).await?;
            return Ok(vec![outcome]);
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| CloudinaryError::path(path, e))?;

        if !metadata.is_dir() {
            let outcome = self.upload_file(path, None, None, options).await?;
            return Ok(vec![outcome]);
        }

        let mut outcomes = Vec::new();
        for file in FileWalk::new(path) {
            let file = file?;
            outcomes.push(self.upload_file(&file, Some(path), None, options).await?);
        }
        debug!(path = %path.display(), files = outcomes.len(), "Directory upload finished");
        Ok(outcomes)
    }

    pub async fn upload_image(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        prepend: &str,
    ) -> Result<Vec<UploadOutcome>> {
        self.upload_as(path, data, prepend, ResourceType::Image).await
    }

    pub async fn upload_video(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        prepend: &str,
    ) -> Result<Vec<UploadOutcome>> {
        self.upload_as(path, data, prepend, ResourceType::Video).await
    }

    pub async fn upload_raw(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        prepend: &str,
    ) -> Result<Vec<UploadOutcome>> {
        self.upload_as(path, data, prepend, ResourceType::Raw).await
    }

    pub async fn upload_pdf(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        prepend: &str,
    ) -> Result<Vec<UploadOutcome>> {
        self.upload_as(path, data, prepend, ResourceType::Pdf).await
    }

    pub async fn upload_static_image(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        prepend: &str,
    ) -> Result<Vec<UploadOutcome>> {
        self.upload_image(path, data, prepend).await
    }

    pub async fn upload_static_raw(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        prepend: &str,
    ) -> Result<Vec<UploadOutcome>> {
        self.upload_raw(path, data, prepend).await
    }

    async fn upload_as(
        &self,
        path: impl AsRef<Path>,
        data: Option<DataReader>,
        prepend: &str,
        resource_type: ResourceType,
    ) -> Result<Vec<UploadOutcome>> {
        let options = UploadOptions::new(resource_type).with_prepend(prepend);
        self.upload(path, data, &options).await
    }

    /// Upload one local file with a public id derived from its path.
    pub async fn upload_by_file(
        &self,
        path: impl AsRef<Path>,
        resource_type: ResourceType,
    ) -> Result<UploadOutcome> {
        let options = UploadOptions::new(resource_type);
        self.upload_file(path.as_ref(), None, None, &options).await
    }

    /// Ask the service to fetch `remote_url` itself. No local bytes are sent.
    ///
    /// Unless a random id is requested, the public id comes from the last two
    /// segments of the URL path.
    pub async fn upload_by_url(
        &self,
        remote_url: &str,
        options: &UploadOptions,
    ) -> Result<UploadOutcome> {
        let parsed = url::Url::parse(remote_url).map_err(|e| {
            CloudinaryError::Encoding(format!("Invalid remote URL {}: {}", remote_url, e))
        })?;
        let public_id = (!options.random_public_id)
            .then(|| public_id_for(Path::new(parsed.path()), None, &options.prepend_path));

        self.send_upload(
            PathBuf::from(remote_url),
            public_id,
            Payload::RemoteUrl(remote_url.to_string()),
            options.resource_type,
        )
        .await
    }

    async fn upload_file(
        &self,
        path: &Path,
        base_dir: Option<&Path>,
        data: Option<DataReader>,
        options: &UploadOptions,
    ) -> Result<UploadOutcome> {
        if data.is_none() {
            let metadata = tokio::fs::metadata(path)
                .await
                .map_err(|e| CloudinaryError::path(path, e))?;
            if !metadata.is_file() {
                return Err(CloudinaryError::path(
                    path,
                    io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
                ));
            }
            if metadata.len() == 0 {
                debug!(path = %path.display(), "Not uploading empty file");
                return Ok(UploadOutcome::Skipped {
                    path: path.to_path_buf(),
                });
            }
        }

        let public_id = (!options.random_public_id).then(|| {
            clean_asset_name(
                &path.to_string_lossy(),
                &base_dir
                    .map(|b| b.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                &options.prepend_path,
            )
        });

        let bytes = match data {
            Some(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await.map_err(|e| {
                    CloudinaryError::Encoding(format!(
                        "Failed to read upload data for {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                buf
            }
            None => tokio::fs::read(path)
                .await
                .map_err(|e| CloudinaryError::path(path, e))?,
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        self.send_upload(
            path.to_path_buf(),
            public_id,
            Payload::Bytes(FilePart {
                file_name,
                data: bytes,
            }),
            options.resource_type,
        )
        .await
    }

    async fn send_upload(
        &self,
        path: PathBuf,
        public_id: Option<String>,
        payload: Payload,
        resource_type: ResourceType,
    ) -> Result<UploadOutcome> {
        let endpoint = self.config.endpoint(resource_type, Action::Upload);
        let mut builder = RequestBuilder::new(&self.config, endpoint);
        if let Some(id) = &public_id {
            builder = builder.param("public_id", id.as_str());
        }
        let request = builder.multipart(payload);

        if self.config.simulate() {
            debug!(path = %path.display(), public_id = ?public_id, "Simulated upload");
            return Ok(UploadOutcome::Simulated { path, public_id });
        }

        info!(path = %path.display(), resource_type = %resource_type, "Uploading");
        let response: UploadResponse = self.call(request).await?;
        Ok(UploadOutcome::Uploaded { path, response })
    }
}
