//! Location intake trigger event source.
//!
//! Implements the [`pipeline::EventSource`] trait for the GitHub Actions
//! runtime: the workflow run that handles an `issues` event finds the webhook
//! payload in a JSON file whose path is given by `GITHUB_EVENT_PATH`.
//! [`EventFileSource`] reads that file and extracts the issue number and body.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** File access and payload deserialization live here. The
//! [`pipeline`] crate sees only [`pipeline::EventSource`] and
//! [`pipeline::IssueEvent`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use pipeline::{EventSource, IssueEvent, IssueNumber};

/// The triggering event could not be loaded.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Failed to read event payload '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Event payload '{path}' is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The payload parsed but has no `issue` object (e.g. a `push` event).
    #[error("Event payload '{path}' does not describe an issue")]
    NotAnIssueEvent { path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    issue: Option<IssuePayload>,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: u64,
    body: Option<String>,
}

/// Reads the triggering issue from a webhook payload file.
#[derive(Debug, Clone)]
pub struct EventFileSource {
    path: PathBuf,
}

impl EventFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EventSource for EventFileSource {
    type Error = TriggerError;

    #[tracing::instrument(skip(self), err)]
    async fn issue_event(&self) -> Result<IssueEvent, TriggerError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| TriggerError::Read {
                path: self.path.clone(),
                source,
            })?;
        parse_payload(&self.path, &raw)
    }
}

fn parse_payload(path: &Path, raw: &[u8]) -> Result<IssueEvent, TriggerError> {
    let payload: EventPayload =
        serde_json::from_slice(raw).map_err(|source| TriggerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let issue = payload.issue.ok_or_else(|| TriggerError::NotAnIssueEvent {
        path: path.to_path_buf(),
    })?;

    tracing::debug!(issue = issue.number, "Loaded issue event");
    Ok(IssueEvent {
        number: IssueNumber::new(issue.number),
        body: issue.body,
    })
}
