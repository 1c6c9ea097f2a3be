//! Error taxonomy for the location intake domain.
//!
//! Each stage of the workflow has its own error type so stage boundaries stay
//! explicit. [`IntakeError`] is the umbrella the orchestrator returns; every
//! stage error converts into it with `?`.
//!
//! None of these errors are retried. The orchestrator reports whichever one
//! halted the run on the originating issue and then returns it.

use thiserror::Error;

use crate::{LocationName, RepoPath};

// ---------------------------------------------------------------------------
// Issue parsing
// ---------------------------------------------------------------------------

/// The issue body does not carry a well-formed location request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No ```` ```json ```` fenced block was found in the body.
    #[error("No JSON data found in issue")]
    MissingJsonBlock,

    /// The fenced block is not valid JSON.
    #[error("Invalid issue format: {0}")]
    InvalidJson(String),

    /// The JSON has no string at `data.name`.
    #[error("Invalid issue format: missing string field 'data.name'")]
    MissingName,

    /// `data.name` is empty or whitespace only.
    #[error("Invalid issue format: 'data.name' is empty")]
    EmptyName,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A required derived value could not be established.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The geocoder returned no match (or timed out) for the name.
    #[error("Could not find coordinates for {name}")]
    CoordinatesNotFound { name: LocationName },
}

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

/// The geocoding provider failed in a way other than "no match" or a timeout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The request could not be sent or the response could not be read.
    #[error("Geocoding request failed: {message}")]
    Transport { message: String },

    /// The provider answered with a non-success status.
    #[error("Geocoding provider returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The provider answered with a body that could not be interpreted.
    #[error("Geocoding provider returned an invalid response: {message}")]
    InvalidResponse { message: String },
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// The remote repository call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    ResolveBaseRevision,
    CreateBranch,
    FetchFile,
    UpdateFile,
    OpenPullRequest,
    PostComment,
}

impl std::fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RepositoryOperation::ResolveBaseRevision => "resolving the base revision",
            RepositoryOperation::CreateBranch => "creating the branch",
            RepositoryOperation::FetchFile => "fetching the data file",
            RepositoryOperation::UpdateFile => "updating the data file",
            RepositoryOperation::OpenPullRequest => "opening the pull request",
            RepositoryOperation::PostComment => "posting the issue comment",
        };
        f.write_str(text)
    }
}

/// A remote repository call did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The API answered with a non-success status (including a stale-revision
    /// conflict on update).
    #[error("GitHub rejected {operation} (HTTP {status}): {message}")]
    Rejected {
        operation: RepositoryOperation,
        status: u16,
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("Request failed while {operation}: {message}")]
    Transport {
        operation: RepositoryOperation,
        message: String,
    },

    /// The API answered successfully but the body was not what was expected.
    #[error("Unexpected response while {operation}: {message}")]
    InvalidResponse {
        operation: RepositoryOperation,
        message: String,
    },
}

impl RepositoryError {
    /// Returns the operation that failed.
    pub fn operation(&self) -> RepositoryOperation {
        match self {
            RepositoryError::Rejected { operation, .. }
            | RepositoryError::Transport { operation, .. }
            | RepositoryError::InvalidResponse { operation, .. } => *operation,
        }
    }
}

// ---------------------------------------------------------------------------
// Target data file
// ---------------------------------------------------------------------------

/// The target data file does not have the structure records are spliced into.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetFileError {
    /// The file has no closing `];` after which the record list ends.
    #[error("Data file '{path}' has no closing '];' to insert the record before")]
    MissingSentinel { path: RepoPath },

    /// The file content is not valid UTF-8 and cannot be edited as text.
    #[error("Data file '{path}' is not valid UTF-8")]
    NotUtf8 { path: RepoPath },
}

// ---------------------------------------------------------------------------
// Umbrella
// ---------------------------------------------------------------------------

/// Any error that halts an intake run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    TargetFile(#[from] TargetFileError),
}
