//! Shared value types for the location intake domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (names are non-empty, coordinates are
//! finite and in range) and participate in domain computations.

use serde::{Deserialize, Serialize};

use crate::{BlobSha, BranchName, IssueNumber, PullRequestNumber, RepoPath};

// ---------------------------------------------------------------------------
// Location request
// ---------------------------------------------------------------------------

/// The name of a UK place as requested in an issue.
///
/// Always non-empty and free of leading/trailing whitespace. Deserialization
/// goes through [`LocationName::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationName(String);

impl LocationName {
    /// Creates a [`LocationName`], trimming surrounding whitespace.
    ///
    /// Returns `None` if nothing remains after trimming.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocationName {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("location name is empty")
    }
}

impl From<LocationName> for String {
    fn from(name: LocationName) -> Self {
        name.0
    }
}

impl std::fmt::Display for LocationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request to add a location, as submitted through an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRequest {
    /// The place to add.
    pub name: LocationName,
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates [`Coordinates`], returning `None` if either value is not finite
    /// or lies outside `[-90, 90]` / `[-180, 180]`.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(self) -> f64 {
        self.latitude
    }

    pub fn longitude(self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}, {:?}", self.latitude, self.longitude)
    }
}

/// Best-effort population figure for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    /// A known head count.
    Known(u64),
    /// No figure is available; a reviewer fills it in on the pull request.
    Unknown,
}

impl Population {
    /// Returns the figure written into the data file (`0` when unknown).
    pub fn as_record_value(self) -> u64 {
        match self {
            Population::Known(count) => count,
            Population::Unknown => 0,
        }
    }

    /// Returns the known figure, if any.
    pub fn known(self) -> Option<u64> {
        match self {
            Population::Known(count) => Some(count),
            Population::Unknown => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Repository contents
// ---------------------------------------------------------------------------

/// The content and revision of a repository file, read just before mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    /// Raw decoded file bytes.
    pub content: Vec<u8>,
    /// Blob SHA of the content; the optimistic-concurrency token for the update.
    pub revision: BlobSha,
}

/// A request to replace a file's content on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: RepoPath,
    pub branch: BranchName,
    /// Commit message for the change.
    pub message: String,
    /// New raw file bytes.
    pub content: Vec<u8>,
    /// Revision the new content was derived from. The write is rejected if the
    /// file has changed since.
    pub expected_revision: BlobSha,
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

/// A pull request to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    /// Branch carrying the change.
    pub head: BranchName,
    /// Branch the change is proposed against.
    pub base: BranchName,
}

/// A pull request that has been opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLink {
    pub number: PullRequestNumber,
    /// User-facing URL of the pull request.
    pub url: String,
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// The issue that triggered a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEvent {
    pub number: IssueNumber,
    /// Markdown body. GitHub reports an empty issue body as `null`.
    pub body: Option<String>,
}
