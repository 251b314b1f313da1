//! HTTP client for the VideosPlus service.
//!
//! Provides generic GET/POST helpers that keep the response status visible to the
//! caller, and domain methods for the endpoints the verification harness and the
//! seeding command rely on.

pub mod api;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

pub use api::{BackupStatus, HealthResponse};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to build HTTP client or request: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Failed to serialize request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse response from {url} as JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ServiceError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service could not be reached at all, as opposed to answering badly.
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport { .. })
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error bodies are truncated to this many characters in messages.
const MAX_ERROR_BODY: usize = 200;

/// HTTP client bound to one deployed service.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ServiceError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> ServiceResult<reqwest::Response> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::debug!(url = %url, error = %e, "Service request failed");
            ServiceError::Transport {
                url: url.to_string(),
                source: e,
            }
        })?;

        tracing::debug!(
            url = %url,
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Service responded"
        );
        Ok(response)
    }

    /// Turn a non-success status into [`ServiceError::Status`] carrying the body.
    async fn ensure_success(url: &str, response: reqwest::Response) -> ServiceResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ServiceError::Status {
            url: url.to_string(),
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        })
    }

    async fn into_json<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> ServiceResult<T> {
        let response = Self::ensure_success(url, response).await?;
        response.json().await.map_err(|e| ServiceError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    /// GET and deserialize a JSON body. Any non-success status is an error.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ServiceResult<T> {
        let url = self.build_url(path);
        let response = self.send(&url, self.client.get(&url)).await?;
        Self::into_json(&url, response).await
    }

    /// GET and return only the status, whatever it is.
    pub async fn get_status(&self, path: &str) -> ServiceResult<StatusCode> {
        let url = self.build_url(path);
        let response = self.send(&url, self.client.get(&url)).await?;
        Ok(response.status())
    }

    /// POST a JSON body and return only the status, whatever it is.
    pub async fn post_json_status<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ServiceResult<StatusCode> {
        let url = self.build_url(path);
        let response = self.send(&url, self.client.post(&url).json(body)).await?;
        Ok(response.status())
    }

    /// POST a multipart form. Any success status is accepted whatever the body;
    /// anything else is an error.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ServiceResult<StatusCode> {
        let url = self.build_url(path);
        let response = self.send(&url, self.client.post(&url).multipart(form)).await?;
        let response = Self::ensure_success(&url, response).await?;
        Ok(response.status())
    }
}
