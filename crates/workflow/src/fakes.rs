//! In-memory port implementations that record every call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pipeline::{
    BlobSha, BranchName, CodeRepository, CommitSha, Coordinates, FileSnapshot, FileUpdate,
    GeocodeError, Geocoder, IssueNumber, IssueTracker, LocationName, NewPullRequest,
    PullRequestLink, PullRequestManager, PullRequestNumber, RepoPath, RepositoryError,
    RepositoryOperation,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Locate(String),
    BranchHead(String),
    CreateBranch { branch: String, at: String },
    FetchFile { path: String, branch: String },
    UpdateFile(FileUpdate),
    OpenPullRequest(NewPullRequest),
    PostComment { issue: u64, body: String },
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

fn record(log: &CallLog, call: Call) {
    log.lock().unwrap().push(call);
}

pub struct FakeGeocoder {
    pub log: CallLog,
    pub answer: Result<Option<Coordinates>, GeocodeError>,
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn locate(&self, name: &LocationName) -> Result<Option<Coordinates>, GeocodeError> {
        record(&self.log, Call::Locate(name.to_string()));
        self.answer.clone()
    }
}

/// Stands in for the GitHub adapter across all three repository-facing ports.
pub struct FakeGitHub {
    pub log: CallLog,
    pub file: Vec<u8>,
    pub fail_at: Option<RepositoryOperation>,
}

impl FakeGitHub {
    pub const HEAD: &'static str = "c0ffee";
    pub const BLOB: &'static str = "b10b";
    pub const PR_URL: &'static str = "https://github.com/octo/cities/pull/7";

    fn check(&self, operation: RepositoryOperation) -> Result<(), RepositoryError> {
        if self.fail_at == Some(operation) {
            return Err(RepositoryError::Rejected {
                operation,
                status: 422,
                message: "Validation Failed".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CodeRepository for FakeGitHub {
    async fn branch_head(&self, branch: &BranchName) -> Result<CommitSha, RepositoryError> {
        record(&self.log, Call::BranchHead(branch.to_string()));
        self.check(RepositoryOperation::ResolveBaseRevision)?;
        Ok(CommitSha::new(Self::HEAD).unwrap())
    }

    async fn create_branch(
        &self,
        branch: &BranchName,
        at: &CommitSha,
    ) -> Result<(), RepositoryError> {
        record(
            &self.log,
            Call::CreateBranch {
                branch: branch.to_string(),
                at: at.to_string(),
            },
        );
        self.check(RepositoryOperation::CreateBranch)
    }

    async fn fetch_file(
        &self,
        path: &RepoPath,
        branch: &BranchName,
    ) -> Result<FileSnapshot, RepositoryError> {
        record(
            &self.log,
            Call::FetchFile {
                path: path.to_string(),
                branch: branch.to_string(),
            },
        );
        self.check(RepositoryOperation::FetchFile)?;
        Ok(FileSnapshot {
            content: self.file.clone(),
            revision: BlobSha::new(Self::BLOB).unwrap(),
        })
    }

    async fn update_file(&self, update: &FileUpdate) -> Result<(), RepositoryError> {
        record(&self.log, Call::UpdateFile(update.clone()));
        self.check(RepositoryOperation::UpdateFile)
    }
}

#[async_trait]
impl PullRequestManager for FakeGitHub {
    async fn open_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<PullRequestLink, RepositoryError> {
        record(&self.log, Call::OpenPullRequest(request.clone()));
        self.check(RepositoryOperation::OpenPullRequest)?;
        Ok(PullRequestLink {
            number: PullRequestNumber::new(7),
            url: Self::PR_URL.to_string(),
        })
    }
}

#[async_trait]
impl IssueTracker for FakeGitHub {
    async fn post_comment(&self, issue: IssueNumber, body: &str) -> Result<(), RepositoryError> {
        record(
            &self.log,
            Call::PostComment {
                issue: issue.as_u64(),
                body: body.to_string(),
            },
        );
        self.check(RepositoryOperation::PostComment)
    }
}
