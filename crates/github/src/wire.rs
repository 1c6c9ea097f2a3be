//! Request and response bodies for the REST endpoints this crate calls.
//!
//! Only the fields that are read or written are modelled; GitHub sends many
//! more and they are ignored on deserialisation.

use serde::{Deserialize, Serialize};

/// Body of any non-2xx response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// `GET /repos/{repo}/git/ref/{ref}`
#[derive(Debug, Deserialize)]
pub(crate) struct GitRef {
    pub object: GitObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitObject {
    pub sha: String,
}

/// `POST /repos/{repo}/git/refs`
#[derive(Debug, Serialize)]
pub(crate) struct CreateRef<'a> {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: &'a str,
}

/// `GET /repos/{repo}/contents/{path}` for a single file.
#[derive(Debug, Deserialize)]
pub(crate) struct FileContent {
    pub sha: String,
    pub encoding: Option<String>,
    /// Base64, wrapped with newlines. Empty for files over 1 MB.
    #[serde(default)]
    pub content: String,
}

/// `PUT /repos/{repo}/contents/{path}`
#[derive(Debug, Serialize)]
pub(crate) struct UpdateContent<'a> {
    pub message: &'a str,
    pub content: String,
    pub branch: &'a str,
    pub sha: &'a str,
}

/// `POST /repos/{repo}/pulls`
#[derive(Debug, Serialize)]
pub(crate) struct CreatePull<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// `POST /repos/{repo}/issues/{number}/comments`
#[derive(Debug, Serialize)]
pub(crate) struct CreateComment<'a> {
    pub body: &'a str,
}
