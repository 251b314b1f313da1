//! Discover which storage endpoints accept a credential set.

use std::fmt;
use std::str::FromStr;
use videosplus_core::AccessKeys;
use videosplus_storage::{StorageConnector, StorageErrorKind};

use crate::error::BootstrapError;

/// Wasabi regions tried when no candidates are given.
pub const WASABI_REGIONS: [&str; 6] = [
    "us-central-1",
    "us-east-1",
    "us-west-1",
    "eu-central-1",
    "eu-central-2",
    "ap-northeast-1",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCandidate {
    pub region: String,
    pub endpoint: String,
}

impl EndpointCandidate {
    pub fn new(region: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Candidate for a Wasabi region at its public S3 endpoint.
    pub fn wasabi(region: &str) -> Self {
        Self::new(region, format!("https://s3.{}.wasabisys.com", region))
    }
}

impl fmt::Display for EndpointCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.region, self.endpoint)
    }
}

/// Parses `region=https://endpoint`.
impl FromStr for EndpointCandidate {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (region, endpoint) = s
            .split_once('=')
            .map(|(r, e)| (r.trim(), e.trim()))
            .filter(|(r, e)| !r.is_empty() && !e.is_empty())
            .ok_or_else(|| BootstrapError::InvalidCandidate(s.to_string()))?;
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err(BootstrapError::InvalidCandidate(s.to_string()));
        }
        Ok(Self::new(region, endpoint))
    }
}

pub fn default_candidates() -> Vec<EndpointCandidate> {
    WASABI_REGIONS.iter().map(|r| EndpointCandidate::wasabi(r)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub candidate: EndpointCandidate,
    pub reachable: bool,
    /// Classified failure. `None` on success, and also when no client could be built.
    pub error: Option<StorageErrorKind>,
    pub message: Option<String>,
}

/// Outcome of one probe run, in the order candidates were supplied.
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    pub fn reachable(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| r.reachable)
    }

    /// First reachable candidate in supply order.
    pub fn recommended(&self) -> Option<&EndpointCandidate> {
        self.reachable().next().map(|r| &r.candidate)
    }

    pub fn into_recommendation(self) -> Result<EndpointCandidate, BootstrapError> {
        let attempted = self.results.len();
        self.results
            .into_iter()
            .find(|r| r.reachable)
            .map(|r| r.candidate)
            .ok_or(BootstrapError::NoReachableEndpoint { attempted })
    }
}

/// Probes candidates with one credential set against one bucket.
pub struct Prober<'a> {
    connector: &'a dyn StorageConnector,
    keys: AccessKeys,
    bucket: String,
}

impl<'a> Prober<'a> {
    pub fn new(connector: &'a dyn StorageConnector, keys: AccessKeys, bucket: impl Into<String>) -> Self {
        Self {
            connector,
            keys,
            bucket: bucket.into(),
        }
    }

    /// Try every candidate in order with a one-key listing. A failing candidate never
    /// stops the others from being tried.
    pub async fn probe(&self, candidates: &[EndpointCandidate]) -> ProbeReport {
        self.probe_with(candidates, |_| {}).await
    }

    /// Like [`Prober::probe`], handing each result to `on_result` as soon as its
    /// candidate finishes.
    pub async fn probe_with<F>(&self, candidates: &[EndpointCandidate], mut on_result: F) -> ProbeReport
    where
        F: FnMut(&ProbeResult),
    {
        let mut report = ProbeReport {
            results: Vec::with_capacity(candidates.len()),
        };

        for candidate in candidates {
            let result = self.probe_one(candidate).await;
            if result.reachable {
                tracing::info!(region = %candidate.region, endpoint = %candidate.endpoint, "Endpoint reachable");
            } else {
                tracing::warn!(
                    region = %candidate.region,
                    endpoint = %candidate.endpoint,
                    error = ?result.error,
                    message = result.message.as_deref().unwrap_or(""),
                    "Endpoint unreachable"
                );
            }
            on_result(&result);
            report.results.push(result);
        }

        report
    }

    async fn probe_one(&self, candidate: &EndpointCandidate) -> ProbeResult {
        let creds = self.keys.bind(&candidate.region, &self.bucket, &candidate.endpoint);

        let outcome = match self.connector.connect(&creds) {
            Ok(client) => client.list(None, 1).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => ProbeResult {
                candidate: candidate.clone(),
                reachable: true,
                error: None,
                message: None,
            },
            Err(e) => ProbeResult {
                candidate: candidate.clone(),
                reachable: false,
                error: e.kind(),
                message: Some(e.to_string()),
            },
        }
    }
}
