//! [`PullRequestManager`] and [`IssueTracker`] over the pulls and issue
//! comments endpoints.

use async_trait::async_trait;
use reqwest::Method;

use pipeline::{
    IssueNumber, IssueTracker, NewPullRequest, PullRequestLink, PullRequestManager,
    PullRequestNumber, RepositoryError, RepositoryOperation,
};

use crate::{
    wire::{CreateComment, CreatePull, PullRequest},
    GithubClient,
};

#[async_trait]
impl PullRequestManager for GithubClient {
    #[tracing::instrument(
        skip(self, request),
        fields(head = %request.head, base = %request.base),
        err
    )]
    async fn open_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<PullRequestLink, RepositoryError> {
        let body = CreatePull {
            title: &request.title,
            body: &request.body,
            head: request.head.as_str(),
            base: request.base.as_str(),
        };
        let created: PullRequest = self
            .send_json(
                RepositoryOperation::OpenPullRequest,
                self.request(Method::POST, self.repo_url("pulls")).json(&body),
            )
            .await?;

        tracing::info!(number = created.number, url = %created.html_url, "Opened pull request");
        Ok(PullRequestLink {
            number: PullRequestNumber::new(created.number),
            url: created.html_url,
        })
    }
}

#[async_trait]
impl IssueTracker for GithubClient {
    #[tracing::instrument(skip(self, body), err)]
    async fn post_comment(&self, issue: IssueNumber, body: &str) -> Result<(), RepositoryError> {
        let request = self
            .request(
                Method::POST,
                self.repo_url(&format!("issues/{issue}/comments")),
            )
            .json(&CreateComment { body });
        self.send(RepositoryOperation::PostComment, request).await?;
        Ok(())
    }
}
