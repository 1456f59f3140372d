//! Capability seams for repository hosting and deployment platforms.
//!
//! Both traits follow the sentinel convention: wrappers around remote calls
//! log their own failures and surface `None` or a report struct, so the
//! session loop decides state transitions purely on sentinel values.

use crate::artifact::{DeploymentRecord, RepositoryHandle, UploadReport};
use async_trait::async_trait;

/// Creates remote source repositories and uploads file contents to them.
#[async_trait]
pub trait RepositoryPublisher: Send + Sync {
    /// Creates a new remote repository. Returns `None` if creation failed.
    async fn create_repository(&self, name: &str, description: &str) -> Option<RepositoryHandle>;

    /// Uploads `(path, content)` pairs as one batch. Paths are uploaded
    /// independently; a failure on one path does not block the rest.
    async fn upload_files(
        &self,
        repository: &RepositoryHandle,
        files: &[(String, String)],
    ) -> UploadReport;
}

/// Triggers a hosting/build pipeline for a published repository.
#[async_trait]
pub trait DeploymentPublisher: Send + Sync {
    /// Starts a deployment for `repository` and reports the live URL.
    /// Returns `None` if any step of the trigger failed.
    async fn trigger_deployment(&self, repository: &RepositoryHandle) -> Option<DeploymentRecord>;
}
