//! Domain methods for the VideosPlus service API.
//!
//! List endpoints are returned as raw JSON so callers can report what the service
//! actually sent when it is not the expected shape.

use crate::{ServiceClient, ServiceError, ServiceResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use videosplus_core::constants::METADATA_FILE_NAME;
use videosplus_core::MetadataDocument;

/// The only status value a healthy service reports.
pub const HEALTHY_STATUS: &str = "OK";

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == HEALTHY_STATUS
    }
}

/// Body of `GET /api/backup/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatus {
    pub has_backup: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceClient {
    pub async fn health(&self) -> ServiceResult<HealthResponse> {
        self.get_json("/api/health").await
    }

    pub async fn backup_status(&self) -> ServiceResult<BackupStatus> {
        self.get_json("/api/backup/status").await
    }

    pub async fn videos(&self) -> ServiceResult<Value> {
        self.get_json("/api/videos").await
    }

    pub async fn users(&self) -> ServiceResult<Value> {
        self.get_json("/api/users").await
    }

    /// Look a user up by email. A 404 is `Ok(None)`.
    pub async fn user_by_email(&self, email: &str) -> ServiceResult<Option<Value>> {
        let path = format!("/api/users/email/{}", urlencoding::encode(email));
        match self.get_json(&path).await {
            Ok(user) => Ok(Some(user)),
            Err(ServiceError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn site_config(&self) -> ServiceResult<Value> {
        self.get_json("/api/site-config").await
    }

    /// Status of the static entry page.
    pub async fn index_status(&self) -> ServiceResult<StatusCode> {
        self.get_status("/").await
    }

    /// Status returned when asking for a signed URL for `key`.
    pub async fn signed_url_status(&self, key: &str) -> ServiceResult<StatusCode> {
        let path = format!("/api/signed-url/{}", urlencoding::encode(key));
        self.get_status(&path).await
    }

    /// Status of a video upload that carries no file.
    pub async fn upload_videos_status(&self) -> ServiceResult<StatusCode> {
        self.post_json_status("/api/upload/videos", &serde_json::json!({}))
            .await
    }

    /// Upload a metadata document as the `file` field of a multipart form.
    /// Returns the success status; the response body is not interpreted.
    pub async fn upload_metadata(&self, document: &MetadataDocument) -> ServiceResult<StatusCode> {
        let body = document.to_json_bytes()?;
        let part = reqwest::multipart::Part::bytes(body)
            .file_name(METADATA_FILE_NAME.to_string())
            .mime_str("application/json")
            .map_err(ServiceError::Build)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        self.post_multipart("/api/upload/metadata", form).await
    }
}
