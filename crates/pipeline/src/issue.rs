//! Issue parser: pulls a [`LocationRequest`] out of an issue body.
//!
//! The body is free-form Markdown. The request lives in the first fenced block
//! tagged `json`:
//!
//! ````text
//! ```json
//! { "data": { "name": "Bristol" } }
//! ```
//! ````
//!
//! Anything else in the body is ignored.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::{FormatError, IssueEvent, IssueNumber, LocationName, LocationRequest};

static JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json\r?\n(.*?)\r?\n```").expect("fenced block pattern is valid")
});

/// A location request together with the issue it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIssue {
    pub issue: IssueNumber,
    pub request: LocationRequest,
}

/// Extracts the location request from the triggering issue.
///
/// # Errors
///
/// Returns [`FormatError`] if the body has no fenced JSON block, the block is
/// not valid JSON, or `data.name` is missing, not a string, or blank.
pub fn parse_issue(event: &IssueEvent) -> Result<ParsedIssue, FormatError> {
    let body = event.body.as_deref().unwrap_or_default();
    let block = JSON_BLOCK
        .captures(body)
        .and_then(|captures| captures.get(1))
        .ok_or(FormatError::MissingJsonBlock)?;

    let payload: Value = serde_json::from_str(block.as_str())
        .map_err(|err| FormatError::InvalidJson(err.to_string()))?;

    let raw_name = payload
        .get("data")
        .and_then(|data| data.get("name"))
        .and_then(Value::as_str)
        .ok_or(FormatError::MissingName)?;
    let name = LocationName::new(raw_name).ok_or(FormatError::EmptyName)?;

    tracing::debug!(issue = %event.number, name = %name, "Parsed location request");

    Ok(ParsedIssue {
        issue: event.number,
        request: LocationRequest { name },
    })
}
