//! VideosPlus CLI: probe storage endpoints, bootstrap the metadata document and
//! verify a running deployment.
//!
//! Storage settings come from WASABI_* (or VITE_WASABI_*) variables, optionally
//! loaded from a `.env` file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use videosplus_bootstrap::EndpointCandidate;
use videosplus_cli::{commands, init_tracing};
use videosplus_core::Settings;

#[derive(Parser)]
#[command(name = "videosplus", about = "Bootstrap and verify a VideosPlus deployment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find which storage endpoints accept the configured keys
    Probe {
        /// Bucket to probe instead of WASABI_BUCKET
        #[arg(long)]
        bucket: Option<String>,
        /// Candidate endpoint as region=https://endpoint (repeatable). Defaults to the Wasabi regions.
        #[arg(long = "candidate", value_name = "REGION=URL")]
        candidates: Vec<EndpointCandidate>,
    },
    /// Create the metadata document in the bucket if it does not exist
    Init {
        /// Do not create .keep folder markers
        #[arg(long)]
        no_markers: bool,
        /// Do not list the bucket contents afterwards
        #[arg(long)]
        skip_listing: bool,
    },
    /// Run the readiness checks against a running service
    Verify {
        /// Run only the environment, health and overall status checks
        #[arg(long, visible_alias = "fast")]
        quick: bool,
        /// Service URL instead of VIDEOSPLUS_BASE_URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Upload the default metadata document through the service API
    Seed {
        /// Service URL instead of VIDEOSPLUS_BASE_URL
        #[arg(long)]
        base_url: Option<String>,
        /// Upload even if the service already reports a document
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("Failed to load configuration")?;
    let budget = settings.run_timeout();

    let run = async {
        match cli.command {
            Commands::Probe { bucket, candidates } => {
                commands::probe(&settings, bucket, candidates).await
            }
            Commands::Init {
                no_markers,
                skip_listing,
            } => commands::init(&settings, no_markers, skip_listing).await,
            Commands::Verify { quick, base_url } => {
                commands::verify(&settings, quick, base_url).await
            }
            Commands::Seed { base_url, force } => commands::seed(&settings, base_url, force).await,
        }
    };

    match tokio::time::timeout(budget, run).await {
        Ok(result) => result,
        Err(_) => anyhow::bail!("Run did not finish within {}s", budget.as_secs()),
    }
}
