//! [`CodeRepository`] over the Git refs and repository contents endpoints.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Method;

use pipeline::{
    BlobSha, BranchName, CodeRepository, CommitSha, FileSnapshot, FileUpdate, RepoPath,
    RepositoryError, RepositoryOperation,
};

use crate::{
    wire::{CreateRef, FileContent, GitRef, UpdateContent},
    GithubClient,
};

#[async_trait]
impl CodeRepository for GithubClient {
    #[tracing::instrument(skip(self), err)]
    async fn branch_head(&self, branch: &BranchName) -> Result<CommitSha, RepositoryError> {
        let operation = RepositoryOperation::ResolveBaseRevision;
        let url = self.repo_url(&format!("git/ref/heads/{branch}"));
        let reference: GitRef = self
            .send_json(operation, self.request(Method::GET, url))
            .await?;

        CommitSha::new(reference.object.sha).ok_or_else(|| RepositoryError::InvalidResponse {
            operation,
            message: "reference has an empty commit SHA".to_string(),
        })
    }

    #[tracing::instrument(skip(self), err)]
    async fn create_branch(
        &self,
        branch: &BranchName,
        at: &CommitSha,
    ) -> Result<(), RepositoryError> {
        let body = CreateRef {
            reference: format!("refs/heads/{branch}"),
            sha: at.as_str(),
        };
        let request = self
            .request(Method::POST, self.repo_url("git/refs"))
            .json(&body);
        self.send(RepositoryOperation::CreateBranch, request).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), err)]
    async fn fetch_file(
        &self,
        path: &RepoPath,
        branch: &BranchName,
    ) -> Result<FileSnapshot, RepositoryError> {
        let operation = RepositoryOperation::FetchFile;
        let request = self
            .request(Method::GET, self.repo_url(&format!("contents/{path}")))
            .query(&[("ref", branch.as_str())]);
        let file: FileContent = self.send_json(operation, request).await?;

        let invalid = |message: String| RepositoryError::InvalidResponse { operation, message };
        if file.encoding.as_deref() != Some("base64") {
            return Err(invalid(format!(
                "'{path}' is not served as base64 (encoding: {})",
                file.encoding.as_deref().unwrap_or("none")
            )));
        }
        let content = decode_content(&file.content)
            .map_err(|err| invalid(format!("'{path}' content is not valid base64: {err}")))?;
        let revision = BlobSha::new(file.sha)
            .ok_or_else(|| invalid(format!("'{path}' has an empty blob SHA")))?;

        tracing::debug!(bytes = content.len(), %revision, "Fetched file");
        Ok(FileSnapshot { content, revision })
    }

    #[tracing::instrument(
        skip(self, update),
        fields(
            path = %update.path,
            branch = %update.branch,
            expected_revision = %update.expected_revision,
        ),
        err
    )]
    async fn update_file(&self, update: &FileUpdate) -> Result<(), RepositoryError> {
        let body = UpdateContent {
            message: &update.message,
            content: STANDARD.encode(&update.content),
            branch: update.branch.as_str(),
            sha: update.expected_revision.as_str(),
        };
        let request = self
            .request(Method::PUT, self.repo_url(&format!("contents/{}", update.path)))
            .json(&body);
        self.send(RepositoryOperation::UpdateFile, request).await?;
        Ok(())
    }
}

/// Decodes contents API base64, which GitHub wraps at 60 columns.
fn decode_content(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact)
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;
    use crate::client::tests::client_for;

    const DATA: &str = "const ukCities = [\n    { name: \"Bath\" },\n];\n";

    fn branch() -> BranchName {
        BranchName::new("add-location-bristol").unwrap()
    }

    fn data_file() -> RepoPath {
        RepoPath::new("uk_cities_data.js").unwrap()
    }

    /// Encodes like the contents API does: base64 wrapped at 60 columns.
    fn wrapped_base64(bytes: &[u8]) -> String {
        let encoded = STANDARD.encode(bytes);
        encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n")
            + "\n"
    }

    #[tokio::test]
    async fn resolves_branch_head() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/cities/git/ref/heads/main")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "ref": "refs/heads/main",
                    "object": { "sha": "aa218f56b14c9653891f9e74264a383fa43fefbd", "type": "commit" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let head = client_for(&server)
            .branch_head(&BranchName::new("main").unwrap())
            .await
            .unwrap();

        assert_eq!(head.as_str(), "aa218f56b14c9653891f9e74264a383fa43fefbd");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreadable_base_reference_is_a_repository_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/cities/git/ref/heads/main")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .branch_head(&BranchName::new("main").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.operation(), RepositoryOperation::ResolveBaseRevision);
    }

    #[tokio::test]
    async fn creates_branch_at_commit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repos/octo/cities/git/refs")
            .match_body(Matcher::Json(json!({
                "ref": "refs/heads/add-location-bristol",
                "sha": "c0ffee"
            })))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        client_for(&server)
            .create_branch(&branch(), &CommitSha::new("c0ffee").unwrap())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn existing_branch_is_a_repository_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/repos/octo/cities/git/refs")
            .with_status(422)
            .with_body(r#"{"message":"Reference already exists"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .create_branch(&branch(), &CommitSha::new("c0ffee").unwrap())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RepositoryError::Rejected {
                operation: RepositoryOperation::CreateBranch,
                status: 422,
                message: "Reference already exists".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn fetches_and_decodes_file_on_branch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/cities/contents/uk_cities_data.js")
            .match_query(Matcher::UrlEncoded(
                "ref".to_string(),
                "add-location-bristol".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "type": "file",
                    "encoding": "base64",
                    "sha": "3d21ec53a331a6f037a91c368710b99387d012c1",
                    "content": wrapped_base64(DATA.repeat(4).as_bytes()),
                })
                .to_string(),
            )
            .create_async()
            .await;

        let snapshot = client_for(&server)
            .fetch_file(&data_file(), &branch())
            .await
            .unwrap();

        assert_eq!(snapshot.content, DATA.repeat(4).into_bytes());
        assert_eq!(
            snapshot.revision.as_str(),
            "3d21ec53a331a6f037a91c368710b99387d012c1"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn oversized_file_without_inline_content_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/cities/contents/uk_cities_data.js")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "encoding": "none", "sha": "abc", "content": "" }).to_string())
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch_file(&data_file(), &branch())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::InvalidResponse {
                operation: RepositoryOperation::FetchFile,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn updates_file_with_revision_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/repos/octo/cities/contents/uk_cities_data.js")
            .match_body(Matcher::Json(json!({
                "message": "Add Bristol to locations",
                "content": STANDARD.encode(DATA),
                "branch": "add-location-bristol",
                "sha": "3d21ec53"
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client_for(&server)
            .update_file(&FileUpdate {
                path: data_file(),
                branch: branch(),
                message: "Add Bristol to locations".to_string(),
                content: DATA.as_bytes().to_vec(),
                expected_revision: BlobSha::new("3d21ec53").unwrap(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn stale_revision_conflict_is_a_repository_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/repos/octo/cities/contents/uk_cities_data.js")
            .with_status(409)
            .with_body(r#"{"message":"uk_cities_data.js does not match 3d21ec53"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .update_file(&FileUpdate {
                path: data_file(),
                branch: branch(),
                message: "Add Bristol to locations".to_string(),
                content: DATA.as_bytes().to_vec(),
                expected_revision: BlobSha::new("3d21ec53").unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Rejected {
                operation: RepositoryOperation::UpdateFile,
                status: 409,
                ..
            }
        ));
    }

    #[test]
    fn decoding_round_trips_bytes_exactly() {
        let original = "line one\r\nline two\n\u{feff}ünïcödé ];\n".as_bytes();
        let decoded = decode_content(&wrapped_base64(original)).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(STANDARD.encode(&decoded), STANDARD.encode(original));
    }
}
