//! HTTP plumbing shared by every GitHub operation: authentication headers,
//! status checking, and mapping transport failures into [`RepositoryError`].

use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use pipeline::{RepositoryError, RepositoryId, RepositoryOperation};

use crate::wire::ErrorBody;

/// REST API media type.
const MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version the request and response shapes were written against.
const API_VERSION: &str = "2022-11-28";

/// A GitHub API token. `Debug` output never reveals the value.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token, returning `None` if it is empty or whitespace.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.trim().is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// REST API base, e.g. `https://api.github.com`.
    pub api_url: String,
    /// Repository every call targets.
    pub repository: RepositoryId,
    pub token: AccessToken,
    /// Sent as `User-Agent`; GitHub rejects requests without one.
    pub user_agent: String,
}

/// Errors raised while constructing a [`GithubClient`].
#[derive(Debug, thiserror::Error)]
pub enum GithubClientError {
    #[error("Failed to build GitHub HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// GitHub REST client scoped to one repository.
///
/// Implements [`pipeline::CodeRepository`], [`pipeline::PullRequestManager`],
/// and [`pipeline::IssueTracker`]. Cloning is cheap; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    repository: RepositoryId,
    token: AccessToken,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, GithubClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repository: config.repository,
            token: config.token,
        })
    }

    /// Builds `{api}/repos/{owner}/{repo}/{tail}`.
    pub(crate) fn repo_url(&self, tail: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.repository, tail)
    }

    pub(crate) fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(self.token.expose())
            .header(header::ACCEPT, MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Sends `request` and fails with [`RepositoryError`] unless the status is
    /// 2xx.
    pub(crate) async fn send(
        &self,
        operation: RepositoryOperation,
        request: RequestBuilder,
    ) -> Result<Response, RepositoryError> {
        let response = request
            .send()
            .await
            .map_err(|err| RepositoryError::Transport {
                operation,
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => error.message,
            Err(_) if body.trim().is_empty() => {
                status.canonical_reason().unwrap_or("no response body").to_string()
            }
            Err(_) => body,
        };
        tracing::warn!(%operation, status = status.as_u16(), %message, "GitHub request rejected");
        Err(RepositoryError::Rejected {
            operation,
            status: status.as_u16(),
            message,
        })
    }

    /// Sends `request` and decodes a successful JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: RepositoryOperation,
        request: RequestBuilder,
    ) -> Result<T, RepositoryError> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| RepositoryError::InvalidResponse {
                operation,
                message: err.to_string(),
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TOKEN: &str = "ghs_t0ken";

    pub(crate) fn client_for(server: &mockito::ServerGuard) -> GithubClient {
        GithubClient::new(GithubConfig {
            api_url: format!("{}/", server.url()),
            repository: RepositoryId::new("octo/cities").unwrap(),
            token: AccessToken::new(TOKEN).unwrap(),
            user_agent: "location-intake-tests".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let token = AccessToken::new("ghs_secret").unwrap();
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert!(AccessToken::new("  ").is_none());
    }

    #[tokio::test]
    async fn sends_auth_and_api_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/cities/probe")
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .match_header("accept", MEDIA_TYPE)
            .match_header("x-github-api-version", API_VERSION)
            .match_header("user-agent", "location-intake-tests")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        let request = client.request(Method::GET, client.repo_url("probe"));
        client
            .send(RepositoryOperation::FetchFile, request)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_carries_github_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/cities/probe")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let request = client.request(Method::GET, client.repo_url("probe"));
        let err = client
            .send(RepositoryOperation::FetchFile, request)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RepositoryError::Rejected {
                operation: RepositoryOperation::FetchFile,
                status: 404,
                message: "Not Found".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn error_status_without_json_falls_back_to_body_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/cities/probe")
            .with_status(502)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = client_for(&server);
        let request = client.request(Method::GET, client.repo_url("probe"));
        let err = client
            .send(RepositoryOperation::FetchFile, request)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Rejected { status: 502, ref message, .. } if message == "upstream unavailable"
        ));
    }
}
