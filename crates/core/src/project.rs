//! On-disk project workspace for the generated application.

use crate::artifact::GeneratedArtifact;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Relative path of the application source file.
pub const SOURCE_FILE: &str = "src/App.js";
/// Relative path of the stylesheet.
pub const STYLESHEET_FILE: &str = "src/App.css";
/// Relative path of the project manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Address the local preview server listens on once started.
pub const PREVIEW_URL: &str = "http://localhost:3000";

const MANIFEST_TEMPLATE: &str = r#"{
  "name": "cadenza-generated-ui",
  "version": "0.1.0",
  "private": true,
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0",
    "react-scripts": "5.0.1"
  },
  "scripts": {
    "start": "react-scripts start",
    "build": "react-scripts build"
  },
  "browserslist": [">0.2%", "not dead", "not op_mini all"]
}
"#;

const INDEX_TEMPLATE: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';
import './App.css';

const root = ReactDOM.createRoot(document.getElementById('root'));
root.render(<App />);
"#;

const APP_TEMPLATE: &str = r#"import React from 'react';

function App() {
  return <div className="App">Waiting for your first request...</div>;
}

export default App;
"#;

/// Owns the project directory and the most recently applied artifact.
///
/// The stored artifact always reflects the last successfully applied
/// generation. Callers invoke [`ProjectWorkspace::apply`] only after a
/// generation call succeeded, so a failed generation never disturbs it.
pub struct ProjectWorkspace {
    dir: PathBuf,
    current: Option<GeneratedArtifact>,
}

impl ProjectWorkspace {
    /// Opens (and if necessary scaffolds) the project directory.
    ///
    /// Scaffolding writes a minimal create-react-app layout: manifest, entry
    /// point, application source, and stylesheet. Existing files are left
    /// alone so a previous session's output survives. Any failure here is
    /// fatal for the session.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(dir.join("src"))
            .with_context(|| format!("Failed to create project directory {}", dir.display()))?;

        let scaffold: [(&str, &str); 4] = [
            (MANIFEST_FILE, MANIFEST_TEMPLATE),
            ("src/index.js", INDEX_TEMPLATE),
            (SOURCE_FILE, APP_TEMPLATE),
            (STYLESHEET_FILE, "/* generated styles land here */\n"),
        ];
        for (rel, contents) in scaffold {
            let path = dir.join(rel);
            if !path.exists() {
                std::fs::write(&path, contents)
                    .with_context(|| format!("Failed to scaffold {}", path.display()))?;
            }
        }

        info!(dir = %dir.display(), "Project workspace ready");
        Ok(Self { dir, current: None })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The last successfully applied artifact, if any.
    pub fn current(&self) -> Option<&GeneratedArtifact> {
        self.current.as_ref()
    }

    /// Writes `artifact` to the source and stylesheet files and records it
    /// as the current state.
    pub fn apply(&mut self, artifact: &GeneratedArtifact) -> Result<()> {
        std::fs::write(self.dir.join(SOURCE_FILE), &artifact.source)
            .context("Failed to write application source")?;
        std::fs::write(self.dir.join(STYLESHEET_FILE), &artifact.stylesheet)
            .context("Failed to write stylesheet")?;
        self.current = Some(artifact.clone());
        info!("Applied generated code to workspace");
        Ok(())
    }

    /// Reads the files that make up a deployment batch from disk.
    pub fn deployment_files(&self) -> Result<Vec<(String, String)>> {
        [SOURCE_FILE, STYLESHEET_FILE, MANIFEST_FILE]
            .into_iter()
            .map(|rel| {
                let contents = std::fs::read_to_string(self.dir.join(rel))
                    .with_context(|| format!("Failed to read {rel} for deployment"))?;
                Ok((rel.to_string(), contents))
            })
            .collect()
    }

    /// Starts the local preview server (`npm start`) as a detached child
    /// process and opens a browser tab pointing at it.
    ///
    /// Fire and forget: the session never waits on or synchronizes with the
    /// spawned process beyond issuing the start command.
    pub fn start_preview_server(&self) -> Result<()> {
        tokio::process::Command::new("npm")
            .arg("start")
            .current_dir(&self.dir)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .context("Failed to start preview server")?;
        info!(url = PREVIEW_URL, "Preview server starting");

        if let Err(e) = webbrowser::open(PREVIEW_URL) {
            warn!(error = %e, "Could not open browser for preview");
        }
        Ok(())
    }
}
