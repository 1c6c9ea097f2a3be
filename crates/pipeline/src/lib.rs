//! Core domain for location intake.
//!
//! A location request arrives as a GitHub issue. This crate contains every
//! domain concept involved in turning it into a pull request: newtype
//! identifiers, value types, the error taxonomy, the issue parser, the record
//! line and its splice into the data file, and the port traits infrastructure
//! crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`IssueNumber`, `BranchName`, etc.) |
//! | [`types`] | Value types (`LocationName`, `Coordinates`, `FileSnapshot`, etc.) |
//! | [`errors`] | Per-stage error types and the `IntakeError` umbrella |
//! | [`issue`] | Fenced-JSON issue body parser |
//! | [`record`] | Record line formatting, branch naming, and sentinel splice |
//! | [`ports`] | Traits implemented by infrastructure crates |

pub mod errors;
pub mod identifiers;
pub mod issue;
pub mod ports;
pub mod record;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{
    FormatError, GeocodeError, IntakeError, RepositoryError, RepositoryOperation,
    TargetFileError, ValidationError,
};
pub use identifiers::{
    BlobSha, BranchName, CommitSha, IssueNumber, PullRequestNumber, RepoPath, RepositoryId, RunId,
};
pub use issue::{parse_issue, ParsedIssue};
pub use ports::{
    CodeRepository, EventSource, Geocoder, IssueTracker, PopulationSource, PullRequestManager,
    UnknownPopulation,
};
pub use record::{branch_name_for, splice_record, LocationRecord, SENTINEL};
pub use types::{
    Coordinates, FileSnapshot, FileUpdate, IssueEvent, LocationName, LocationRequest,
    NewPullRequest, Population, PullRequestLink,
};
