//! Location intake orchestration.
//!
//! [`LocationIntake`] turns one triggering issue into a pull request:
//!
//! 1. parse the fenced JSON request out of the issue body,
//! 2. geocode the place name (no match is fatal),
//! 3. look up the population (never fatal),
//! 4. branch, splice the record into the data file, and commit,
//! 5. open the pull request,
//! 6. comment on the issue with the result, success or failure.
//!
//! Every step runs once, in order. The first error stops the run; nothing is
//! retried and a branch created before the failure is left in place.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** This crate sequences calls between business logic
//! in the [`pipeline`] crate and the port traits (repository, geocoder,
//! population). It contains no domain rules of its own.

pub mod messages;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use pipeline::{
    branch_name_for, parse_issue, splice_record, BranchName, CodeRepository, FileUpdate,
    Geocoder, IntakeError, IssueEvent, IssueNumber, IssueTracker, LocationRecord,
    NewPullRequest, PopulationSource, PullRequestLink, PullRequestManager, RepoPath,
    ValidationError,
};
use tracing::{error, info, warn};

/// Where new records are proposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeTarget {
    /// The data file records are spliced into.
    pub data_file: RepoPath,
    /// The branch pull requests are opened against.
    pub base_branch: BranchName,
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeOutcome {
    pub issue: IssueNumber,
    pub record: LocationRecord,
    pub branch: BranchName,
    pub pull_request: PullRequestLink,
}

/// Drives a single intake run against injected ports.
pub struct LocationIntake {
    target: IntakeTarget,
    geocoder: Arc<dyn Geocoder>,
    population: Arc<dyn PopulationSource>,
    repository: Arc<dyn CodeRepository>,
    pull_requests: Arc<dyn PullRequestManager>,
    issues: Arc<dyn IssueTracker>,
}

impl LocationIntake {
    pub fn new(
        target: IntakeTarget,
        geocoder: Arc<dyn Geocoder>,
        population: Arc<dyn PopulationSource>,
        repository: Arc<dyn CodeRepository>,
        pull_requests: Arc<dyn PullRequestManager>,
        issues: Arc<dyn IssueTracker>,
    ) -> Self {
        Self {
            target,
            geocoder,
            population,
            repository,
            pull_requests,
            issues,
        }
    }

    /// Processes `event` and reports the outcome on the issue.
    ///
    /// A comment is always attempted. If the run succeeded but the success
    /// comment cannot be posted, that failure is returned. If the run failed,
    /// the original error is returned whether or not the failure comment was
    /// posted.
    #[tracing::instrument(skip_all, fields(issue = %event.number))]
    pub async fn run(&self, event: &IssueEvent) -> Result<IntakeOutcome, IntakeError> {
        match self.process(event).await {
            Ok(outcome) => {
                let comment = messages::success_comment(&outcome.record, &outcome.pull_request);
                self.issues.post_comment(event.number, &comment).await?;
                info!(
                    pull_request = %outcome.pull_request.url,
                    branch = %outcome.branch,
                    "Location proposed"
                );
                Ok(outcome)
            }
            Err(err) => {
                error!(error = %err, "Location intake failed");
                let comment = messages::failure_comment(&err);
                if let Err(notify_err) = self.issues.post_comment(event.number, &comment).await {
                    error!(error = %notify_err, "Could not report the failure on the issue");
                }
                Err(err)
            }
        }
    }

    async fn process(&self, event: &IssueEvent) -> Result<IntakeOutcome, IntakeError> {
        let parsed = parse_issue(event)?;
        let name = parsed.request.name;

        let coordinates = self
            .geocoder
            .locate(&name)
            .await?
            .ok_or_else(|| ValidationError::CoordinatesNotFound { name: name.clone() })?;
        info!(name = %name, %coordinates, "Geocoded location");

        let population = self.population.population(&name).await;
        if population.known().is_none() {
            warn!(name = %name, "Population unknown; left for review");
        }

        let record = LocationRecord {
            name,
            population,
            coordinates,
        };
        let (branch, pull_request) = self.propose(parsed.issue, &record).await?;

        Ok(IntakeOutcome {
            issue: parsed.issue,
            record,
            branch,
            pull_request,
        })
    }

    /// Branches from the base, commits the spliced data file, and opens the
    /// pull request.
    async fn propose(
        &self,
        issue: IssueNumber,
        record: &LocationRecord,
    ) -> Result<(BranchName, PullRequestLink), IntakeError> {
        let base = self.repository.branch_head(&self.target.base_branch).await?;

        let branch = branch_name_for(&record.name);
        self.repository.create_branch(&branch, &base).await?;
        info!(branch = %branch, base = %base, "Created branch");

        let snapshot = self
            .repository
            .fetch_file(&self.target.data_file, &branch)
            .await?;
        let content = splice_record(&self.target.data_file, &snapshot.content, record)?;

        let title = messages::change_title(&record.name);
        self.repository
            .update_file(&FileUpdate {
                path: self.target.data_file.clone(),
                branch: branch.clone(),
                message: title.clone(),
                content,
                expected_revision: snapshot.revision,
            })
            .await?;

        let pull_request = self
            .pull_requests
            .open_pull_request(&NewPullRequest {
                title,
                body: messages::pull_request_body(issue, record),
                head: branch.clone(),
                base: self.target.base_branch.clone(),
            })
            .await?;

        Ok((branch, pull_request))
    }
}
