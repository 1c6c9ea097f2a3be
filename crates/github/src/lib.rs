//! Location intake GitHub infrastructure adapter.
//!
//! Implements the GitHub-facing traits defined in the [`pipeline`] crate
//! (`CodeRepository`, `PullRequestManager`, `IssueTracker`) on a single
//! [`GithubClient`] that talks to the REST API with `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! All GitHub API details (authentication, media types, base64 content
//! transport, error bodies) are handled here; the [`pipeline`] crate never
//! sees them.
//!
//! ## Endpoints
//!
//! | Port method | Request |
//! |-------------|---------|
//! | `branch_head` | `GET /repos/{repo}/git/ref/heads/{branch}` |
//! | `create_branch` | `POST /repos/{repo}/git/refs` |
//! | `fetch_file` | `GET /repos/{repo}/contents/{path}?ref={branch}` |
//! | `update_file` | `PUT /repos/{repo}/contents/{path}` |
//! | `open_pull_request` | `POST /repos/{repo}/pulls` |
//! | `post_comment` | `POST /repos/{repo}/issues/{number}/comments` |
//!
//! No call is retried. A non-2xx status becomes
//! [`pipeline::RepositoryError::Rejected`] carrying GitHub's `message`.

mod client;
mod pulls;
mod repository;
mod wire;

pub use client::{AccessToken, GithubClient, GithubClientError, GithubConfig};
