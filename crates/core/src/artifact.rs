//! Shared data types exchanged between the session loop and its collaborators.

use serde::{Deserialize, Serialize};

/// One round of generated application code.
///
/// Both fields are raw file contents, trusted verbatim after trimming; the
/// generation service is instructed to emit no surrounding commentary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// Contents of the application source file (`src/App.js`).
    pub source: String,
    /// Contents of the stylesheet (`src/App.css`).
    pub stylesheet: String,
}

impl GeneratedArtifact {
    pub fn new(source: impl Into<String>, stylesheet: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            stylesheet: stylesheet.into(),
        }
    }
}

/// Identity of a remote source repository created during deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryHandle {
    /// Owner-qualified name, e.g. `alice/cadenza-generated-ui`.
    pub full_name: String,
    /// Browsable URL of the repository.
    pub html_url: String,
}

/// Per-path outcome of a batch file upload.
///
/// A failed path is logged by the publisher and does not block the remaining
/// paths, so partial uploads are possible and accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Record of a successful deployment. Created once, immutable thereafter;
/// the session ends after producing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub repository: RepositoryHandle,
    /// Live URL of the deployed application.
    pub url: String,
}
