use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{
    ADMIN_EMAIL, ADMIN_NAME, ADMIN_PASSWORD_SHA256, ADMIN_USER_ID, DEFAULT_EMAIL_HOST,
    DEFAULT_EMAIL_PORT, DEFAULT_SITE_NAME, DEFAULT_VIDEO_LIST_TITLE,
};
use crate::models::{SiteConfig, StorageConfigRecord};

/// Video entry. Only the id is interpreted here; the rest belongs to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Session entry, opaque to the tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Hex SHA-256 digest, never the clear-text password.
    pub password: String,
    pub created_at: String,
}

/// The single document holding all application data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub videos: Vec<Video>,
    pub users: Vec<User>,
    pub sessions: Vec<Session>,
    pub site_config: SiteConfig,
}

/// Inputs for the default document written on first bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapDefaults {
    pub admin_email: String,
    pub telegram_username: String,
    pub storage: StorageConfigRecord,
    pub created_at: DateTime<Utc>,
}

impl Default for BootstrapDefaults {
    fn default() -> Self {
        Self {
            admin_email: ADMIN_EMAIL.to_string(),
            telegram_username: String::new(),
            storage: StorageConfigRecord::default(),
            created_at: Utc::now(),
        }
    }
}

impl MetadataDocument {
    /// Build the bootstrap document: no videos or sessions, one administrator.
    pub fn bootstrap(defaults: BootstrapDefaults) -> Self {
        let admin = User {
            id: ADMIN_USER_ID.to_string(),
            email: defaults.admin_email,
            name: ADMIN_NAME.to_string(),
            password: ADMIN_PASSWORD_SHA256.to_string(),
            created_at: defaults
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let site_config = SiteConfig {
            site_name: DEFAULT_SITE_NAME.to_string(),
            telegram_username: defaults.telegram_username,
            video_list_title: DEFAULT_VIDEO_LIST_TITLE.to_string(),
            email_host: DEFAULT_EMAIL_HOST.to_string(),
            email_port: DEFAULT_EMAIL_PORT.to_string(),
            wasabi_config: defaults.storage,
            ..SiteConfig::default()
        };

        MetadataDocument {
            videos: Vec::new(),
            users: vec![admin],
            sessions: Vec::new(),
            site_config,
        }
    }

    /// Serialize with a fixed field order and two-space indentation.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Number of users whose email is exactly `email`.
    pub fn count_users_with_email(&self, email: &str) -> usize {
        self.users.iter().filter(|u| u.email == email).count()
    }
}
