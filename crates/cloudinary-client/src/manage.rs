//! Destroy, rename and admin lookups.

use cloudinary_core::{
    Action, CloudinaryError, DestroyResponse, ResourceDetails, ResourceList, ResourceType, Result,
    UploadResponse,
};
use tracing::{debug, info, warn};

use crate::request::{EncodedRequest, RequestBuilder};
use crate::Service;

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The id matched the keep pattern; nothing was signed or sent.
    Kept { public_id: String },
    Simulated { public_id: String },
    Destroyed {
        public_id: String,
        response: DestroyResponse,
    },
}

impl DeleteOutcome {
    pub fn public_id(&self) -> &str {
        match self {
            DeleteOutcome::Kept { public_id }
            | DeleteOutcome::Simulated { public_id }
            | DeleteOutcome::Destroyed { public_id, .. } => public_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenameOutcome {
    Simulated { from: String, to: String },
    Renamed(UploadResponse),
}

impl Service {
    /// Delete `prepend + public_id`.
    ///
    /// Ids matching the keep pattern are left alone and reported as
    /// [`DeleteOutcome::Kept`]. A `result` other than `"ok"` is returned as-is.
    pub async fn delete(
        &self,
        public_id: &str,
        prepend: &str,
        resource_type: ResourceType,
    ) -> Result<DeleteOutcome> {
        let public_id = format!("{}{}", prepend, public_id);

        if self.config.is_kept(&public_id) {
            info!(public_id = %public_id, "Keeping protected asset");
            return Ok(DeleteOutcome::Kept { public_id });
        }
        if self.config.simulate() {
            debug!(public_id = %public_id, "Simulated delete");
            return Ok(DeleteOutcome::Simulated { public_id });
        }

        let request = RequestBuilder::new(
            &self.config,
            self.config.endpoint(resource_type, Action::Destroy),
        )
        .param("public_id", public_id.as_str())
        .form();

        let response: DestroyResponse = self.call(request).await?;
        if !response.is_ok() {
            warn!(
                public_id = %public_id,
                result = ?response.result,
                "Destroy did not report ok"
            );
        }
        Ok(DeleteOutcome::Destroyed {
            public_id,
            response,
        })
    }

    /// Delete an asset uploaded without a prefix.
    pub async fn upload_destroy(
        &self,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<DeleteOutcome> {
        self.delete(public_id, "", resource_type).await
    }

    /// Rename `prepend + from` to `prepend + to`. Leading slashes are ignored.
    pub async fn rename(
        &self,
        from: &str,
        to: &str,
        prepend: &str,
        resource_type: ResourceType,
    ) -> Result<RenameOutcome> {
        let from = format!("{}{}", prepend, from.trim_start_matches('/'));
        let to = format!("{}{}", prepend, to.trim_start_matches('/'));

        if self.config.simulate() {
            debug!(from = %from, to = %to, "Simulated rename");
            return Ok(RenameOutcome::Simulated { from, to });
        }

        let request = RequestBuilder::new(
            &self.config,
            self.config.endpoint(resource_type, Action::Rename),
        )
        .param("from_public_id", from.as_str())
        .param("to_public_id", to.as_str())
        .form();

        info!(from = %from, to = %to, "Renaming");
        Ok(RenameOutcome::Renamed(self.call(request).await?))
    }

    /// One page of uploaded resources of `resource_type`.
    pub async fn list_resources(
        &self,
        resource_type: ResourceType,
        next_cursor: Option<&str>,
    ) -> Result<ResourceList> {
        let mut url = url::Url::parse(&format!(
            "{}/resources/{}",
            self.config.admin_base(),
            resource_type.wire_segment()
        ))
        .map_err(|e| CloudinaryError::Encoding(e.to_string()))?;
        if let Some(cursor) = next_cursor {
            url.query_pairs_mut().append_pair("next_cursor", cursor);
        }

        self.call(EncodedRequest::admin_get(&self.config, url.to_string()))
            .await
    }

    /// Full details of one resource, including derived assets.
    pub async fn resource_details(
        &self,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<ResourceDetails> {
        let url = format!(
            "{}/resources/{}/upload/{}",
            self.config.admin_base(),
            resource_type.wire_segment(),
            public_id.trim_start_matches('/')
        );
        self.call(EncodedRequest::admin_get(&self.config, url))
            .await
    }
}
