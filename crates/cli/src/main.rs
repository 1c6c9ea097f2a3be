//! Location intake CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: read flags and the GitHub Actions environment
//!    once into an immutable [`config::Config`].
//! 2. **Wire observability**: install the `tracing` subscriber (stderr fmt
//!    layer plus optional OpenTelemetry OTLP export).
//! 3. **Construct infrastructure**: create the `GithubClient` and
//!    `NominatimGeocoder` and inject them into a `LocationIntake`.
//! 4. **Load the trigger**: read the issue event from `GITHUB_EVENT_PATH`.
//! 5. **Run once**: process the issue, then exit zero on success and
//!    non-zero on any failure (after the failure has been reported on the
//!    issue where possible).

mod config;
mod telemetry;

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, info_span, Instrument};

use geocoder::NominatimGeocoder;
use github::GithubClient;
use pipeline::{EventSource, RunId, UnknownPopulation};
use trigger::EventFileSource;
use workflow::LocationIntake;

use crate::config::{Cli, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match telemetry::init(&cli.telemetry()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("location-intake: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = match Config::try_from(cli) {
        Ok(config) => run(config).await,
        Err(err) => Err(err.context("Invalid configuration")),
    };

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Location intake run failed: {err:#}");
            ExitCode::FAILURE
        }
    };
    telemetry.shutdown();
    code
}

async fn run(config: Config) -> anyhow::Result<()> {
    let run_id = RunId::new_random();
    let span = info_span!(
        "location_intake",
        run_id = %run_id,
        repository = %config.github.repository,
        data_file = %config.target.data_file,
    );

    async move {
        // Clients come first: once the issue is known, every failure must be
        // reportable on it.
        let (intake, trigger) = connect(config)?;
        let event = trigger
            .issue_event()
            .await
            .context("Failed to load the triggering issue")?;

        let outcome = intake.run(&event).await?;
        info!(
            issue = %outcome.issue,
            pull_request = %outcome.pull_request.url,
            "Location intake run complete"
        );
        Ok(())
    }
    .instrument(span)
    .await
}

/// Builds the adapters and the orchestrator without touching the network.
fn connect(config: Config) -> anyhow::Result<(LocationIntake, EventFileSource)> {
    let github = Arc::new(GithubClient::new(config.github)?);
    let geocoder = Arc::new(NominatimGeocoder::new(config.geocoder)?);
    let intake = LocationIntake::new(
        config.target,
        geocoder,
        Arc::new(UnknownPopulation),
        github.clone(),
        github.clone(),
        github,
    );
    Ok((intake, EventFileSource::new(config.event_path)))
}
