//! Subcommand implementations. Each returns the process exit code, or an error
//! for fatal preconditions.

use anyhow::{bail, Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use videosplus_api_client::ServiceClient;
use videosplus_bootstrap::{
    default_candidates, BootstrapError, EndpointCandidate, Initializer, MarkerStatus, Prober,
};
use videosplus_core::{MetadataDocument, Settings};
use videosplus_storage::{connect, S3Connector, StorageClient, TransportOptions};
use videosplus_verify::{CheckContext, Harness, RunMode};

use crate::{dotenv_lines, format_object_line, storage_failure};

/// Objects shown in the post-bootstrap listing.
const LISTING_LIMIT: usize = 100;

pub async fn probe(
    settings: &Settings,
    bucket: Option<String>,
    candidates: Vec<EndpointCandidate>,
) -> Result<ExitCode> {
    let mut storage = settings.storage.clone();
    if bucket.is_some() {
        storage.bucket = bucket;
    }
    let (keys, bucket) = storage
        .require_probe_inputs()
        .context("Cannot probe endpoints")?;

    let candidates = if candidates.is_empty() {
        default_candidates()
    } else {
        candidates
    };

    println!(
        "Probing {} endpoints for bucket '{}' with access key {}",
        candidates.len(),
        bucket,
        keys.masked_access_key()
    );

    let connector = S3Connector::new(TransportOptions::from_settings(settings));
    let report = Prober::new(&connector, keys, bucket.as_str())
        .probe_with(&candidates, |result| {
            if result.reachable {
                println!("  OK    {}", result.candidate);
            } else {
                let kind = result
                    .error
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| "ClientError".to_string());
                println!("  FAIL  {} [{}]", result.candidate, kind);
            }
        })
        .await;

    let recommended = report
        .into_recommendation()
        .context("No endpoint accepted these credentials; check the keys and the bucket name")?;

    println!();
    println!("Recommended endpoint: {}", recommended);
    println!("Add to your .env:");
    println!("{}", dotenv_lines(&recommended, &bucket));
    Ok(ExitCode::SUCCESS)
}

pub async fn init(settings: &Settings, no_markers: bool, skip_listing: bool) -> Result<ExitCode> {
    let creds = settings
        .storage
        .require()
        .context("Storage settings are incomplete")?;

    for check in settings.storage.lint().iter().filter(|c| !c.valid) {
        println!(
            "warning: {} looks wrong ({})",
            check.field.label(),
            check.field.env_name()
        );
    }

    let client: Arc<dyn StorageClient> = connect(&creds, &TransportOptions::from_settings(settings))
        .map_err(|e| storage_failure("Failed to create storage client", e))?;

    println!(
        "Testing connection to {} (bucket '{}', key {})",
        creds.endpoint,
        creds.bucket,
        creds.keys.masked_access_key()
    );
    client
        .list(None, 1)
        .await
        .map_err(|e| storage_failure("Connection test failed", e))?;
    println!("Connection established");

    let defaults = settings.bootstrap_defaults();
    let outcome = Initializer::new(client.clone(), settings.metadata_key.as_str())
        .with_folder_markers(settings.folder_markers && !no_markers)
        .run(move || MetadataDocument::bootstrap(defaults))
        .await
        .map_err(|e| match e {
            BootstrapError::Storage(err) => storage_failure("Bootstrap failed", err),
            other => anyhow::Error::new(other).context("Bootstrap failed"),
        })?;

    if outcome.created {
        println!("Created {} (administrator: {})", settings.metadata_key, settings.admin_email);
    } else {
        println!("{} already exists, left untouched", settings.metadata_key);
    }

    for marker in &outcome.markers {
        match &marker.status {
            MarkerStatus::Created => println!("  created {}", marker.key),
            MarkerStatus::AlreadyPresent => println!("  kept    {}", marker.key),
            MarkerStatus::Failed(kind) => println!(
                "  skipped {} ({})",
                marker.key,
                kind.map(|k| k.to_string()).unwrap_or_else(|| "error".to_string())
            ),
        }
    }

    if !skip_listing {
        list_bucket(client.as_ref()).await;
    }

    Ok(ExitCode::SUCCESS)
}

async fn list_bucket(client: &dyn StorageClient) {
    match client.list(None, LISTING_LIMIT).await {
        Ok(objects) if objects.is_empty() => println!("Bucket '{}' is empty", client.bucket()),
        Ok(objects) => {
            println!("Contents of bucket '{}':", client.bucket());
            for object in &objects {
                println!("  {}", format_object_line(object));
            }
        }
        Err(e) => tracing::warn!(error = %e, "Could not list bucket contents"),
    }
}

pub async fn verify(settings: &Settings, quick: bool, base_url: Option<String>) -> Result<ExitCode> {
    let base_url = base_url.unwrap_or_else(|| settings.base_url.clone());
    let service = ServiceClient::new(&base_url, settings.request_timeout())?;
    let mode = if quick { RunMode::Quick } else { RunMode::Full };

    println!("Verifying {} ({} checks)", base_url, mode.checks().len());
    let context = CheckContext::new(service, settings.storage.clone(), settings.admin_email.as_str());
    let report = Harness::new(context, mode).run().await;

    println!("{}", report);
    Ok(if report.is_ready() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub async fn seed(settings: &Settings, base_url: Option<String>, force: bool) -> Result<ExitCode> {
    let base_url = base_url.unwrap_or_else(|| settings.base_url.clone());
    let service = ServiceClient::new(&base_url, settings.request_timeout())?;

    let health = service
        .health()
        .await
        .with_context(|| format!("Service at {} is not reachable", base_url))?;
    if !health.is_ok() {
        bail!("Service at {} is not healthy (status '{}')", base_url, health.status);
    }
    println!("Service is up ({})", health.status);

    let backup = service
        .backup_status()
        .await
        .context("Could not read backup status")?;
    if backup.has_backup && !force {
        println!("The service already has a metadata document; nothing uploaded (use --force to replace it)");
        return Ok(ExitCode::SUCCESS);
    }

    let document = MetadataDocument::bootstrap(settings.bootstrap_defaults());
    service
        .upload_metadata(&document)
        .await
        .context("Failed to upload the metadata document")?;
    println!("Metadata document uploaded");

    match service
        .user_by_email(&settings.admin_email)
        .await
        .context("Failed to look up the administrator")?
    {
        Some(_) => println!("Administrator {} is available", settings.admin_email),
        None => bail!(
            "Upload was accepted but administrator {} was not found",
            settings.admin_email
        ),
    }

    Ok(ExitCode::SUCCESS)
}
