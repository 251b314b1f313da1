//! The individual checks. Each one asks the service one or more questions and
//! either returns an optional detail message or a [`CheckError`].

use serde_json::Value;
use videosplus_api_client::ServiceClient;
use videosplus_core::{StorageField, StorageSettings};

use crate::check::{CheckError, CheckId};

/// Key asked for when checking signed URL generation. It is not expected to exist.
pub const SIGNED_URL_PROBE_KEY: &str = "test-file";

type CheckOutput = Result<Option<String>, CheckError>;

/// Everything the checks need, passed in explicitly.
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub service: ServiceClient,
    pub storage: StorageSettings,
    pub admin_email: String,
}

impl CheckContext {
    pub fn new(service: ServiceClient, storage: StorageSettings, admin_email: impl Into<String>) -> Self {
        Self {
            service,
            storage,
            admin_email: admin_email.into(),
        }
    }

    pub async fn run(&self, id: CheckId) -> CheckOutput {
        match id {
            CheckId::Environment => self.environment(),
            CheckId::ServerConnection => self.server_connection().await,
            CheckId::StorageBackup => self.storage_backup().await,
            CheckId::VideosApi => self.videos_api().await,
            CheckId::UsersApi => self.users_api().await,
            CheckId::SiteConfig => self.site_config().await,
            CheckId::StaticFiles => self.static_files().await,
            CheckId::SignedUrls => self.signed_urls().await,
            CheckId::Upload => self.upload().await,
            CheckId::OverallStatus => self.overall_status().await,
        }
    }

    fn environment(&self) -> CheckOutput {
        let missing = self.storage.missing(&StorageField::ALL);
        if !missing.is_empty() {
            return Err(CheckError::assertion(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let suspicious: Vec<&str> = self
            .storage
            .lint()
            .into_iter()
            .filter(|v| !v.valid)
            .map(|v| v.field.env_name())
            .collect();
        if suspicious.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!("check the format of: {}", suspicious.join(", "))))
        }
    }

    pub(crate) async fn server_connection(&self) -> CheckOutput {
        let health = self.service.health().await?;
        if !health.is_ok() {
            return Err(CheckError::assertion(format!(
                "service is not healthy (status '{}')",
                health.status
            )));
        }
        Ok(None)
    }

    async fn storage_backup(&self) -> CheckOutput {
        let status = self.service.backup_status().await?;
        if !status.has_backup {
            return Err(CheckError::assertion(
                "metadata document not found in storage; run `videosplus init`",
            ));
        }
        Ok(None)
    }

    async fn videos_api(&self) -> CheckOutput {
        let videos = self.service.videos().await?;
        match videos.as_array() {
            Some(list) => Ok(Some(format!("{} videos", list.len()))),
            None => Err(CheckError::assertion(format!(
                "expected an array of videos, got {}",
                json_kind(&videos)
            ))),
        }
    }

    async fn users_api(&self) -> CheckOutput {
        let users = self.service.users().await?;
        let list = users.as_array().ok_or_else(|| {
            CheckError::assertion(format!("expected an array of users, got {}", json_kind(&users)))
        })?;
        if list.is_empty() {
            return Err(CheckError::assertion(
                "administrator record is missing: no users returned",
            ));
        }

        let admins = list
            .iter()
            .filter(|u| u.get("email").and_then(Value::as_str) == Some(self.admin_email.as_str()))
            .count();
        match admins {
            1 => Ok(Some(format!("{} users", list.len()))),
            0 => Err(CheckError::assertion(format!(
                "administrator record is missing: no user with email {}",
                self.admin_email
            ))),
            n => Err(CheckError::assertion(format!(
                "{} users share the administrator email {}",
                n, self.admin_email
            ))),
        }
    }

    async fn site_config(&self) -> CheckOutput {
        let config = self.service.site_config().await?;
        match config.get("siteName").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => Ok(Some(format!("site name '{}'", name))),
            _ => Err(CheckError::assertion("site configuration has no siteName")),
        }
    }

    async fn static_files(&self) -> CheckOutput {
        let status = self.service.index_status().await?;
        if !status.is_success() {
            return Err(CheckError::assertion(format!(
                "entry page responded with status {}",
                status
            )));
        }
        Ok(None)
    }

    async fn signed_urls(&self) -> CheckOutput {
        let status = self.service.signed_url_status(SIGNED_URL_PROBE_KEY).await?;
        if status.is_server_error() {
            return Err(CheckError::assertion(format!(
                "signed URL generation failed with {}",
                status
            )));
        }
        Ok(Some(format!("status {}", status.as_u16())))
    }

    async fn upload(&self) -> CheckOutput {
        let status = self.service.upload_videos_status().await?;
        if status.is_server_error() {
            return Err(CheckError::assertion(format!(
                "upload endpoint failed with {}; storage may be unreachable from the service",
                status
            )));
        }
        Ok(Some(format!("status {}", status.as_u16())))
    }

    async fn overall_status(&self) -> CheckOutput {
        self.service
            .health()
            .await
            .map_err(|e| CheckError::assertion(format!("service has problems: {}", e)))?;
        self.service
            .site_config()
            .await
            .map_err(|e| CheckError::assertion(format!("configuration has problems: {}", e)))?;
        Ok(None)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn context(storage: StorageSettings) -> CheckContext {
        let service = ServiceClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        CheckContext::new(service, storage, "admin@gmail.com")
    }

    #[test]
    fn environment_lists_missing_variables() {
        let ctx = context(StorageSettings {
            bucket: Some("videos".into()),
            ..StorageSettings::default()
        });
        let err = ctx.environment().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("WASABI_ACCESS_KEY"));
        assert!(message.contains("WASABI_ENDPOINT"));
        assert!(!message.contains("WASABI_BUCKET"));
    }

    #[test]
    fn environment_passes_with_format_warning() {
        let ctx = context(StorageSettings {
            access_key: Some("AKIAEXAMPLEKEY1234".into()),
            secret_key: Some("secretsecretsecret".into()),
            region: Some("us-central-1".into()),
            bucket: Some("videos".into()),
            endpoint: Some("http://s3.local".into()),
        });
        let detail = ctx.environment().unwrap();
        assert_eq!(detail.as_deref(), Some("check the format of: WASABI_ENDPOINT"));
    }

    #[test]
    fn json_kinds_read_naturally() {
        assert_eq!(json_kind(&serde_json::json!({})), "an object");
        assert_eq!(json_kind(&Value::Null), "null");
    }
}
