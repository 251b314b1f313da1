//! Configuration module
//!
//! Settings are resolved once, from the environment (optionally seeded by a `.env`
//! file), and then passed explicitly into every component constructor. Storage
//! credentials stay optional here so that the verification harness can report which
//! ones are missing instead of refusing to start.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::constants::{ADMIN_EMAIL, DEFAULT_BASE_URL, DEFAULT_METADATA_KEY};
use crate::error::ConfigError;
use crate::models::{BootstrapDefaults, StorageConfigRecord};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const RUN_TIMEOUT_SECS: u64 = 300;
const STORAGE_MAX_RETRIES: u32 = 3;
const RETRY_INITIAL_DELAY_MS: u64 = 200;

/// One of the five storage settings required for full operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageField {
    AccessKey,
    SecretKey,
    Region,
    Bucket,
    Endpoint,
}

impl StorageField {
    pub const ALL: [StorageField; 5] = [
        StorageField::AccessKey,
        StorageField::SecretKey,
        StorageField::Region,
        StorageField::Bucket,
        StorageField::Endpoint,
    ];

    /// Primary environment variable for this field.
    pub fn env_name(self) -> &'static str {
        match self {
            StorageField::AccessKey => "WASABI_ACCESS_KEY",
            StorageField::SecretKey => "WASABI_SECRET_KEY",
            StorageField::Region => "WASABI_REGION",
            StorageField::Bucket => "WASABI_BUCKET",
            StorageField::Endpoint => "WASABI_ENDPOINT",
        }
    }

    /// Legacy variable name read when the primary one is unset.
    pub fn legacy_env_name(self) -> &'static str {
        match self {
            StorageField::AccessKey => "VITE_WASABI_ACCESS_KEY",
            StorageField::SecretKey => "VITE_WASABI_SECRET_KEY",
            StorageField::Region => "VITE_WASABI_REGION",
            StorageField::Bucket => "VITE_WASABI_BUCKET",
            StorageField::Endpoint => "VITE_WASABI_ENDPOINT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StorageField::AccessKey => "Access Key",
            StorageField::SecretKey => "Secret Key",
            StorageField::Region => "Region",
            StorageField::Bucket => "Bucket",
            StorageField::Endpoint => "Endpoint",
        }
    }
}

/// Raw storage settings as found in the environment. Empty values count as absent.
#[derive(Clone, Default)]
pub struct StorageSettings {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
}

/// Access key pair. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKeys {
    pub access_key: String,
    pub secret_key: String,
}

/// Fully resolved storage settings for one endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageCredentials {
    pub keys: AccessKeys,
    pub region: String,
    pub bucket: String,
    pub endpoint: String,
}

/// Result of a format check on one storage setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub field: StorageField,
    pub valid: bool,
}

impl fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeys")
            .field("access_key", &self.masked_access_key())
            .field("secret_key", &"***")
            .finish()
    }
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("access_key", &self.access_key.as_deref().map(mask_secret))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AccessKeys {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn masked_access_key(&self) -> String {
        mask_secret(&self.access_key)
    }

    /// Combine these keys with a target location.
    pub fn bind(&self, region: &str, bucket: &str, endpoint: &str) -> StorageCredentials {
        StorageCredentials {
            keys: self.clone(),
            region: region.to_string(),
            bucket: bucket.to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

/// Mask a credential for display: `***` followed by its last four characters.
pub fn mask_secret(value: &str) -> String {
    let tail: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", tail)
}

impl StorageSettings {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |field: StorageField| {
            lookup(field.env_name())
                .or_else(|| lookup(field.legacy_env_name()))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        StorageSettings {
            access_key: read(StorageField::AccessKey),
            secret_key: read(StorageField::SecretKey),
            region: read(StorageField::Region),
            bucket: read(StorageField::Bucket),
            endpoint: read(StorageField::Endpoint),
        }
    }

    pub fn value(&self, field: StorageField) -> Option<&str> {
        match field {
            StorageField::AccessKey => self.access_key.as_deref(),
            StorageField::SecretKey => self.secret_key.as_deref(),
            StorageField::Region => self.region.as_deref(),
            StorageField::Bucket => self.bucket.as_deref(),
            StorageField::Endpoint => self.endpoint.as_deref(),
        }
    }

    /// Environment names of the given fields that have no value.
    pub fn missing(&self, fields: &[StorageField]) -> Vec<&'static str> {
        fields
            .iter()
            .filter(|f| self.value(**f).is_none())
            .map(|f| f.env_name())
            .collect()
    }

    /// Resolve all five settings, or list every missing one.
    pub fn require(&self) -> Result<StorageCredentials, ConfigError> {
        let missing = self.missing(&StorageField::ALL);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(StorageCredentials {
            keys: AccessKeys::new(
                self.access_key.clone().unwrap_or_default(),
                self.secret_key.clone().unwrap_or_default(),
            ),
            region: self.region.clone().unwrap_or_default(),
            bucket: self.bucket.clone().unwrap_or_default(),
            endpoint: self.endpoint.clone().unwrap_or_default(),
        })
    }

    /// Resolve what endpoint probing needs: the key pair and the bucket name.
    /// Region and endpoint come from the candidates instead.
    pub fn require_probe_inputs(&self) -> Result<(AccessKeys, String), ConfigError> {
        let missing = self.missing(&[
            StorageField::AccessKey,
            StorageField::SecretKey,
            StorageField::Bucket,
        ]);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok((
            AccessKeys::new(
                self.access_key.clone().unwrap_or_default(),
                self.secret_key.clone().unwrap_or_default(),
            ),
            self.bucket.clone().unwrap_or_default(),
        ))
    }

    /// Format checks that flag likely mistakes without rejecting the settings.
    pub fn lint(&self) -> Vec<FieldValidation> {
        StorageField::ALL
            .iter()
            .map(|&field| {
                let value = self.value(field);
                let valid = match field {
                    StorageField::AccessKey | StorageField::SecretKey => {
                        value.is_some_and(|v| v.len() > 10)
                    }
                    StorageField::Region => value.is_some_and(|v| v.contains('-')),
                    StorageField::Bucket => value.is_some_and(|v| !v.is_empty()),
                    StorageField::Endpoint => value.is_some_and(|v| v.starts_with("https://")),
                };
                FieldValidation { field, valid }
            })
            .collect()
    }
}

/// Tooling configuration.
#[derive(Clone, Debug)]
pub struct Settings {
    pub storage: StorageSettings,
    /// Base URL of the deployed service checked by the harness.
    pub base_url: String,
    pub metadata_key: String,
    pub admin_email: String,
    pub telegram_username: String,
    pub request_timeout_secs: u64,
    pub run_timeout_secs: u64,
    pub storage_max_retries: u32,
    pub retry_initial_delay_ms: u64,
    pub folder_markers: bool,
}

impl Settings {
    /// Load settings from the process environment after reading `.env`, if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded environment file");
        }
        let settings = Self::from_lookup(|name| env::var(name).ok())?;
        tracing::debug!(
            base_url = %settings.base_url,
            metadata_key = %settings.metadata_key,
            storage = ?settings.storage,
            "Configuration loaded"
        );
        Ok(settings)
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("VIDEOSPLUS_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "VIDEOSPLUS_BASE_URL",
                reason: format!("'{}' is not an http(s) URL", base_url),
            });
        }

        let metadata_key = lookup("VIDEOSPLUS_METADATA_KEY")
            .map(|s| s.trim().trim_start_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_METADATA_KEY.to_string());
        if metadata_key.split('/').any(|part| part == "..") {
            return Err(ConfigError::Invalid {
                name: "VIDEOSPLUS_METADATA_KEY",
                reason: "key must not contain '..' segments".to_string(),
            });
        }

        let settings = Settings {
            storage: StorageSettings::from_lookup(&lookup),
            base_url: base_url.trim_end_matches('/').to_string(),
            metadata_key,
            admin_email: lookup("VIDEOSPLUS_ADMIN_EMAIL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| ADMIN_EMAIL.to_string()),
            telegram_username: lookup("VIDEOSPLUS_TELEGRAM_USERNAME").unwrap_or_default(),
            request_timeout_secs: parse_or(
                &lookup,
                "VIDEOSPLUS_REQUEST_TIMEOUT_SECS",
                REQUEST_TIMEOUT_SECS,
            )?,
            run_timeout_secs: parse_or(&lookup, "VIDEOSPLUS_RUN_TIMEOUT_SECS", RUN_TIMEOUT_SECS)?,
            storage_max_retries: parse_or(
                &lookup,
                "VIDEOSPLUS_STORAGE_MAX_RETRIES",
                STORAGE_MAX_RETRIES,
            )?,
            retry_initial_delay_ms: parse_or(
                &lookup,
                "VIDEOSPLUS_RETRY_INITIAL_DELAY_MS",
                RETRY_INITIAL_DELAY_MS,
            )?,
            folder_markers: parse_or(&lookup, "VIDEOSPLUS_FOLDER_MARKERS", true)?,
        };

        if settings.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "VIDEOSPLUS_REQUEST_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    pub fn retry_initial_delay(&self) -> Duration {
        Duration::from_millis(self.retry_initial_delay_ms)
    }

    /// Inputs for a freshly bootstrapped document, stamped with the current time.
    pub fn bootstrap_defaults(&self) -> BootstrapDefaults {
        BootstrapDefaults {
            admin_email: self.admin_email.clone(),
            telegram_username: self.telegram_username.clone(),
            storage: StorageConfigRecord::from(&self.storage),
            ..BootstrapDefaults::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(name).map(|s| s.trim().to_lowercase()) {
        None => Ok(default),
        Some(raw) if raw.is_empty() => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: format!("'{}': {}", raw, e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn full_storage() -> Vec<(&'static str, &'static str)> {
        vec![
            ("WASABI_ACCESS_KEY", "AKIAEXAMPLEKEY1234"),
            ("WASABI_SECRET_KEY", "secretsecretsecret"),
            ("WASABI_REGION", "us-central-1"),
            ("WASABI_BUCKET", "videosplus-2024"),
            ("WASABI_ENDPOINT", "https://s3.us-central-1.wasabisys.com"),
        ]
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.metadata_key, DEFAULT_METADATA_KEY);
        assert_eq!(settings.admin_email, ADMIN_EMAIL);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.storage_max_retries, 3);
        assert!(settings.folder_markers);
    }

    #[test]
    fn require_lists_every_missing_field() {
        let settings =
            Settings::from_lookup(lookup_from(&[("WASABI_BUCKET", "b"), ("WASABI_REGION", "")]))
                .unwrap();
        let err = settings.storage.require().unwrap_err();
        assert_eq!(
            err.setting_names(),
            vec![
                "WASABI_ACCESS_KEY",
                "WASABI_SECRET_KEY",
                "WASABI_REGION",
                "WASABI_ENDPOINT"
            ]
        );
    }

    #[test]
    fn legacy_names_are_read_as_fallback() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("VITE_WASABI_BUCKET", "legacy-bucket"),
            ("WASABI_REGION", "eu-central-1"),
            ("VITE_WASABI_REGION", "ignored"),
        ]))
        .unwrap();
        assert_eq!(settings.storage.bucket.as_deref(), Some("legacy-bucket"));
        assert_eq!(settings.storage.region.as_deref(), Some("eu-central-1"));
    }

    #[test]
    fn require_resolves_complete_settings() {
        let settings = Settings::from_lookup(lookup_from(&full_storage())).unwrap();
        let creds = settings.storage.require().unwrap();
        assert_eq!(creds.bucket, "videosplus-2024");
        assert_eq!(creds.keys.masked_access_key(), "***1234");
        assert!(!format!("{:?}", creds).contains("secretsecretsecret"));
    }

    #[test]
    fn probe_inputs_do_not_need_region_or_endpoint() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("WASABI_ACCESS_KEY", "ak"),
            ("WASABI_SECRET_KEY", "sk"),
            ("WASABI_BUCKET", "bucket"),
        ]))
        .unwrap();
        let (keys, bucket) = settings.storage.require_probe_inputs().unwrap();
        assert_eq!(keys.access_key, "ak");
        assert_eq!(bucket, "bucket");
    }

    #[test]
    fn lint_flags_suspicious_values() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("WASABI_ACCESS_KEY", "short"),
            ("WASABI_SECRET_KEY", "secretsecretsecret"),
            ("WASABI_REGION", "uscentral"),
            ("WASABI_BUCKET", "bucket"),
            ("WASABI_ENDPOINT", "http://localhost:9000"),
        ]))
        .unwrap();
        let invalid: Vec<StorageField> = settings
            .storage
            .lint()
            .into_iter()
            .filter(|v| !v.valid)
            .map(|v| v.field)
            .collect();
        assert_eq!(
            invalid,
            vec![
                StorageField::AccessKey,
                StorageField::Region,
                StorageField::Endpoint
            ]
        );
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Settings::from_lookup(lookup_from(&[(
            "VIDEOSPLUS_REQUEST_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();
        assert_eq!(err.setting_names(), vec!["VIDEOSPLUS_REQUEST_TIMEOUT_SECS"]);
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(Settings::from_lookup(lookup_from(&[("VIDEOSPLUS_BASE_URL", "ftp://x")])).is_err());
        let settings =
            Settings::from_lookup(lookup_from(&[("VIDEOSPLUS_BASE_URL", "http://svc:3000/")]))
                .unwrap();
        assert_eq!(settings.base_url, "http://svc:3000");
    }

    #[test]
    fn mask_keeps_last_four_characters() {
        assert_eq!(mask_secret("MG6BCFEBPI30TV9J5QJB"), "***5QJB");
        assert_eq!(mask_secret("ab"), "***ab");
    }

    #[test]
    fn bootstrap_defaults_carry_partial_storage_settings() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("WASABI_BUCKET", "videosplus"),
            ("VIDEOSPLUS_ADMIN_EMAIL", "ops@example.com"),
            ("VIDEOSPLUS_TELEGRAM_USERNAME", "@videosplus"),
        ]))
        .unwrap();

        let defaults = settings.bootstrap_defaults();
        assert_eq!(defaults.admin_email, "ops@example.com");
        assert_eq!(defaults.telegram_username, "@videosplus");
        assert_eq!(defaults.storage.bucket, "videosplus");
        assert_eq!(defaults.storage.access_key, "");
    }
}
