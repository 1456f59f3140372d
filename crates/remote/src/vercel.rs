//! Deployment-platform client for the Vercel API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use cadenza_core::{DeploymentPublisher, DeploymentRecord, RepositoryHandle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const API_BASE: &str = "https://api.vercel.com";
const FRAMEWORK: &str = "create-react-app";
const TARGET: &str = "production";

#[derive(Serialize)]
struct CreateProjectRequest<'a> {
    name: &'a str,
    framework: &'a str,
    #[serde(rename = "gitRepository")]
    git_repository: GitRepository<'a>,
}

#[derive(Serialize)]
struct GitRepository<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    repo: &'a str,
}

#[derive(Deserialize)]
struct ProjectResponse {
    id: String,
}

#[derive(Serialize)]
struct CreateDeploymentRequest<'a> {
    name: &'a str,
    project: &'a str,
    target: &'a str,
    #[serde(rename = "gitSource")]
    git_source: GitSource<'a>,
}

#[derive(Serialize)]
struct GitSource<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    repo: &'a str,
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

#[derive(Deserialize)]
struct DeploymentResponse {
    url: String,
}

/// Deployment URLs come back without a scheme.
fn live_url(raw: &str) -> String {
    if raw.starts_with("https://") || raw.starts_with("http://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// `DeploymentPublisher` backed by the Vercel API: creates a project linked
/// to the repository, then creates a production deployment for it.
pub struct VercelPublisher {
    http: reqwest::Client,
    token: String,
}

impl VercelPublisher {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    async fn try_deploy(&self, repository: &RepositoryHandle) -> Result<DeploymentRecord> {
        let project_name = repository
            .full_name
            .rsplit('/')
            .next()
            .unwrap_or(&repository.full_name);

        let project: ProjectResponse = self
            .http
            .post(format!("{API_BASE}/v11/projects"))
            .bearer_auth(&self.token)
            .json(&CreateProjectRequest {
                name: project_name,
                framework: FRAMEWORK,
                git_repository: GitRepository {
                    kind: "github",
                    repo: &repository.full_name,
                },
            })
            .send()
            .await
            .context("Project creation request failed")?
            .error_for_status()
            .context("Project creation was rejected")?
            .json()
            .await
            .context("Malformed project creation response")?;

        let deployment: DeploymentResponse = self
            .http
            .post(format!("{API_BASE}/v13/deployments"))
            .bearer_auth(&self.token)
            .json(&CreateDeploymentRequest {
                name: project_name,
                project: &project.id,
                target: TARGET,
                git_source: GitSource {
                    kind: "github",
                    repo: &repository.full_name,
                    git_ref: "main",
                },
            })
            .send()
            .await
            .context("Deployment request failed")?
            .error_for_status()
            .context("Deployment was rejected")?
            .json()
            .await
            .context("Malformed deployment response")?;

        Ok(DeploymentRecord {
            repository: repository.clone(),
            url: live_url(&deployment.url),
        })
    }
}

#[async_trait]
impl DeploymentPublisher for VercelPublisher {
    async fn trigger_deployment(&self, repository: &RepositoryHandle) -> Option<DeploymentRecord> {
        match self.try_deploy(repository).await {
            Ok(record) => {
                info!(url = %record.url, "Deployment triggered");
                Some(record)
            }
            Err(e) => {
                warn!(error = ?e, "Deployment failed");
                None
            }
        }
    }
}
