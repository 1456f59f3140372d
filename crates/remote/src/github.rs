//! Repository-hosting client for the GitHub REST API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use cadenza_core::{RepositoryHandle, RepositoryPublisher, UploadReport};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, warn};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "cadenza-assistant";
const BRANCH: &str = "main";

#[derive(Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

#[derive(Deserialize)]
struct RepoResponse {
    full_name: String,
    html_url: String,
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
}

/// `RepositoryPublisher` backed by the GitHub REST API.
///
/// Failures never escape: every call is logged and converted to the sentinel
/// the session loop expects.
pub struct GithubPublisher {
    http: reqwest::Client,
    token: String,
}

impl GithubPublisher {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
    }

    async fn try_create(&self, name: &str, description: &str) -> Result<RepositoryHandle> {
        let response: RepoResponse = self
            .request(reqwest::Method::POST, format!("{API_BASE}/user/repos"))
            .json(&CreateRepoRequest {
                name,
                description,
                private: false,
                auto_init: true,
            })
            .send()
            .await
            .context("Repository creation request failed")?
            .error_for_status()
            .context("Repository creation was rejected")?
            .json()
            .await
            .context("Malformed repository creation response")?;

        Ok(RepositoryHandle {
            full_name: response.full_name,
            html_url: response.html_url,
        })
    }

    async fn try_put(&self, repository: &RepositoryHandle, path: &str, content: &str) -> Result<()> {
        self.request(
            reqwest::Method::PUT,
            format!(
                "{API_BASE}/repos/{}/contents/{path}",
                repository.full_name
            ),
        )
        .json(&PutContentsRequest {
            message: format!("Add {path}"),
            content: BASE64.encode(content),
            branch: BRANCH,
        })
        .send()
        .await
        .with_context(|| format!("Upload request for {path} failed"))?
        .error_for_status()
        .with_context(|| format!("Upload of {path} was rejected"))?;
        Ok(())
    }
}

/// Uploads `(path, content)` pairs one by one through `put`, collecting the
/// per-path outcomes. A failed path is logged and skipped; the rest of the
/// batch still runs.
async fn upload_batch<F, Fut>(files: &[(String, String)], mut put: F) -> UploadReport
where
    F: FnMut(String, String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut report = UploadReport::default();
    for (path, content) in files {
        match put(path.clone(), content.clone()).await {
            Ok(()) => {
                info!(%path, "Uploaded file");
                report.uploaded.push(path.clone());
            }
            Err(e) => {
                warn!(%path, error = ?e, "File upload failed");
                report.failed.push(path.clone());
            }
        }
    }
    report
}

#[async_trait]
impl RepositoryPublisher for GithubPublisher {
    async fn create_repository(&self, name: &str, description: &str) -> Option<RepositoryHandle> {
        match self.try_create(name, description).await {
            Ok(handle) => {
                info!(repo = %handle.full_name, "Created repository");
                Some(handle)
            }
            Err(e) => {
                warn!(error = ?e, "Repository creation failed");
                None
            }
        }
    }

    async fn upload_files(
        &self,
        repository: &RepositoryHandle,
        files: &[(String, String)],
    ) -> UploadReport {
        upload_batch(files, |path, content| async move {
            self.try_put(repository, &path, &content).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_repo_request_shape() {
        let body = serde_json::to_value(CreateRepoRequest {
            name: "cadenza-generated-ui",
            description: "generated",
            private: false,
            auto_init: true,
        })
        .unwrap();
        assert_eq!(body["name"], "cadenza-generated-ui");
        assert_eq!(body["auto_init"], true);
        assert_eq!(body["private"], false);
    }

    #[test]
    fn put_contents_encodes_file_as_base64() {
        let body = serde_json::to_value(PutContentsRequest {
            message: "Add src/App.js".to_string(),
            content: BASE64.encode("function App() {}"),
            branch: BRANCH,
        })
        .unwrap();
        assert_eq!(body["branch"], "main");
        let decoded = BASE64
            .decode(body["content"].as_str().unwrap())
            .unwrap();
        assert_eq!(decoded, b"function App() {}");
    }

    #[tokio::test]
    async fn upload_batch_continues_past_a_failed_path() {
        let files = vec![
            ("src/App.js".to_string(), "source".to_string()),
            ("src/App.css".to_string(), "styles".to_string()),
            ("package.json".to_string(), "manifest".to_string()),
        ];

        let report = upload_batch(&files, |path, _| async move {
            if path == "src/App.css" {
                anyhow::bail!("upload rejected");
            }
            Ok(())
        })
        .await;

        assert_eq!(report.uploaded, ["src/App.js", "package.json"]);
        assert_eq!(report.failed, ["src/App.css"]);
        assert!(!report.is_complete());
    }
}
