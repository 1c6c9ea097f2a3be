//! Port traits implemented by infrastructure crates.
//!
//! The orchestrator in the `workflow` crate depends only on these traits; the
//! `github`, `geocoder`, and `trigger` crates supply the implementations, and
//! tests supply in-memory fakes.
//!
//! All traits use [`async_trait`] so they can be held as `Box<dyn Trait>`.

use async_trait::async_trait;

use crate::{
    BranchName, CommitSha, Coordinates, FileSnapshot, FileUpdate, GeocodeError, IssueEvent,
    IssueNumber, LocationName, NewPullRequest, Population, PullRequestLink, RepoPath,
    RepositoryError,
};

/// Supplies the issue event that triggered the run.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Error produced when the event cannot be obtained.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the triggering issue.
    async fn issue_event(&self) -> Result<IssueEvent, Self::Error>;
}

/// Resolves place names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns the best UK match for `name`.
    ///
    /// `Ok(None)` means there was no match or the provider timed out; the
    /// caller decides whether that is fatal.
    async fn locate(&self, name: &LocationName) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Looks up population figures. Lookups never fail; a missing figure is
/// [`Population::Unknown`].
#[async_trait]
pub trait PopulationSource: Send + Sync {
    async fn population(&self, name: &LocationName) -> Population;
}

/// A [`PopulationSource`] with no data behind it. Every lookup is unknown and
/// the figure is left for the pull request reviewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownPopulation;

#[async_trait]
impl PopulationSource for UnknownPopulation {
    async fn population(&self, _name: &LocationName) -> Population {
        Population::Unknown
    }
}

/// Branch and file operations on the target repository.
#[async_trait]
pub trait CodeRepository: Send + Sync {
    /// Returns the commit at the tip of `branch`.
    async fn branch_head(&self, branch: &BranchName) -> Result<CommitSha, RepositoryError>;

    /// Creates `branch` pointing at `at`. Fails if the branch already exists.
    async fn create_branch(&self, branch: &BranchName, at: &CommitSha)
        -> Result<(), RepositoryError>;

    /// Reads `path` as it exists on `branch`.
    async fn fetch_file(
        &self,
        path: &RepoPath,
        branch: &BranchName,
    ) -> Result<FileSnapshot, RepositoryError>;

    /// Replaces a file's content. Fails if the file no longer matches
    /// [`FileUpdate::expected_revision`].
    async fn update_file(&self, update: &FileUpdate) -> Result<(), RepositoryError>;
}

/// Pull request operations on the target repository.
#[async_trait]
pub trait PullRequestManager: Send + Sync {
    async fn open_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<PullRequestLink, RepositoryError>;
}

/// Issue operations on the target repository.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Posts `body` as a new comment on `issue`.
    async fn post_comment(&self, issue: IssueNumber, body: &str) -> Result<(), RepositoryError>;
}
