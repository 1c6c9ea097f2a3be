//! Command line and environment configuration.
//!
//! Every setting can be given as a flag or through the environment. The
//! environment names for the token, repository, event path, and API URL are
//! the ones GitHub Actions provides, so inside a workflow run no flags are
//! needed. Settings are read once at start-up into an immutable [`Config`].

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};

use geocoder::NominatimConfig;
use github::{AccessToken, GithubConfig};
use pipeline::{BranchName, RepoPath, RepositoryId};
use workflow::IntakeTarget;

/// Identifies this tool to GitHub and to the geocoding service.
const USER_AGENT: &str = concat!("uk-postcode-tool location-intake/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Parser)]
#[command(
    name = "location-intake",
    author,
    version,
    about = "Turns a location request issue into a pull request against the locations data file."
)]
pub struct Cli {
    /// GitHub API token with contents, pull request, and issue write access.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Target repository as `owner/repo`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Path of the JSON webhook payload that triggered the run.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    /// Branch pull requests are opened against.
    #[arg(long, env = "INTAKE_BASE_BRANCH", default_value = "main")]
    pub base_branch: String,

    /// Data file new records are appended to.
    #[arg(long, env = "INTAKE_DATA_FILE", default_value = "uk_cities_data.js")]
    pub data_file: String,

    #[arg(
        long,
        env = "INTAKE_GEOCODER_URL",
        default_value = "https://nominatim.openstreetmap.org"
    )]
    pub geocoder_url: String,

    /// Seconds before a geocoding request is abandoned and treated as no match.
    #[arg(long, env = "INTAKE_GEOCODER_TIMEOUT_SECS", default_value_t = 10)]
    pub geocoder_timeout_secs: u64,

    #[arg(long, env = "INTAKE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint. Spans are exported only when this is set.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

/// Output format of the stderr log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub event_path: PathBuf,
    pub github: GithubConfig,
    pub geocoder: NominatimConfig,
    pub target: IntakeTarget,
}

impl Cli {
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_format: self.log_format,
            otlp_endpoint: self
                .otlp_endpoint
                .clone()
                .filter(|endpoint| !endpoint.trim().is_empty()),
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> anyhow::Result<Self> {
        let token = AccessToken::new(cli.token).context("GitHub token is empty")?;
        let repository = RepositoryId::new(cli.repository.trim()).with_context(|| {
            format!("Repository '{}' is not in owner/repo form", cli.repository)
        })?;
        let base_branch =
            BranchName::new(cli.base_branch.trim()).context("Base branch name is empty")?;
        let data_file = RepoPath::new(cli.data_file.trim().trim_start_matches('/'))
            .context("Data file path is empty")?;
        if cli.geocoder_timeout_secs == 0 {
            bail!("Geocoder timeout must be at least one second");
        }

        Ok(Self {
            event_path: cli.event_path,
            github: GithubConfig {
                api_url: cli.api_url,
                repository,
                token,
                user_agent: USER_AGENT.to_string(),
            },
            geocoder: NominatimConfig {
                base_url: cli.geocoder_url,
                timeout: Duration::from_secs(cli.geocoder_timeout_secs),
                user_agent: USER_AGENT.to_string(),
            },
            target: IntakeTarget {
                data_file,
                base_branch,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(repository: &str, extra: &[&str]) -> Cli {
        let mut args = vec![
            "location-intake",
            "--token",
            "ghs_t0ken",
            "--repository",
            repository,
            "--event-path",
            "/github/workflow/event.json",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    fn cli(extra: &[&str]) -> Cli {
        cli_for("octo/cities", extra)
    }

    #[test]
    fn builds_config_from_flags() {
        let config = Config::try_from(cli(&[
            "--base-branch",
            "trunk",
            "--data-file",
            "data/uk_cities_data.js",
            "--geocoder-timeout-secs",
            "3",
        ]))
        .unwrap();

        assert_eq!(config.github.repository.as_str(), "octo/cities");
        assert_eq!(config.target.base_branch.as_str(), "trunk");
        assert_eq!(config.target.data_file.as_str(), "data/uk_cities_data.js");
        assert_eq!(config.geocoder.timeout, Duration::from_secs(3));
        assert_eq!(
            config.event_path,
            PathBuf::from("/github/workflow/event.json")
        );
    }

    #[test]
    fn token_is_not_printed() {
        let config = Config::try_from(cli(&[])).unwrap();
        assert!(!format!("{config:?}").contains("ghs_t0ken"));
    }

    #[test]
    fn rejects_malformed_repository() {
        let err = Config::try_from(cli_for("cities", &[])).unwrap_err();
        assert!(err.to_string().contains("owner/repo"));
    }

    #[test]
    fn rejects_empty_token() {
        let cli = Cli::try_parse_from([
            "location-intake",
            "--token",
            "  ",
            "--repository",
            "octo/cities",
            "--event-path",
            "/github/workflow/event.json",
        ])
        .unwrap();

        let err = Config::try_from(cli).unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn rejects_empty_branch_and_data_file() {
        assert!(Config::try_from(cli(&["--base-branch", " "])).is_err());
        assert!(Config::try_from(cli(&["--data-file", "/"])).is_err());
    }

    #[test]
    fn rejects_zero_geocoder_timeout() {
        assert!(Config::try_from(cli(&["--geocoder-timeout-secs", "0"])).is_err());
    }

    #[test]
    fn log_format_accepts_json() {
        let cli = cli(&["--log-format", "json", "--otlp-endpoint", "http://collector:4317"]);
        let telemetry = cli.telemetry();
        assert_eq!(telemetry.log_format, LogFormat::Json);
        assert_eq!(telemetry.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }
}
