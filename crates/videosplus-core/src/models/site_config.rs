use serde::{Deserialize, Serialize};

use crate::config::StorageSettings;

/// Storage settings embedded in the site configuration so the service can reach
/// the same bucket the document was bootstrapped into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfigRecord {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub bucket: String,
    pub endpoint: String,
}

/// Partial settings are copied as far as they go; absent values stay empty.
impl From<&StorageSettings> for StorageConfigRecord {
    fn from(settings: &StorageSettings) -> Self {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            access_key: value(&settings.access_key),
            secret_key: value(&settings.secret_key),
            region: value(&settings.region),
            bucket: value(&settings.bucket),
            endpoint: value(&settings.endpoint),
        }
    }
}

/// Site-wide settings record. Every field is always serialized; unset fields
/// carry an empty string, `false` or an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub site_name: String,
    pub paypal_client_id: String,
    pub paypal_me_username: String,
    pub stripe_publishable_key: String,
    pub stripe_secret_key: String,
    pub telegram_username: String,
    pub video_list_title: String,
    pub crypto: Vec<serde_json::Value>,
    pub email_host: String,
    pub email_port: String,
    pub email_secure: bool,
    pub email_user: String,
    pub email_pass: String,
    pub email_from: String,
    pub wasabi_config: StorageConfigRecord,
}

impl SiteConfig {
    /// Names of every field as they appear in the serialized document.
    pub const FIELD_NAMES: [&'static str; 15] = [
        "siteName",
        "paypalClientId",
        "paypalMeUsername",
        "stripePublishableKey",
        "stripeSecretKey",
        "telegramUsername",
        "videoListTitle",
        "crypto",
        "emailHost",
        "emailPort",
        "emailSecure",
        "emailUser",
        "emailPass",
        "emailFrom",
        "wasabiConfig",
    ];
}
