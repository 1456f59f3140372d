//! The voice-driven command loop: a turn-taking state machine that prompts
//! the user, classifies each utterance, and dispatches to the code-generation
//! and deployment collaborators.
//!
//! The loop is the only component with cross-cutting state (current phase,
//! project workspace, pending confirmation). Turns run strictly sequentially;
//! every suspension point is one of the blocking collaborator calls. All
//! collaborators report failure through sentinel values, so transitions here
//! are decided purely on `Option`s and report structs, never on caught
//! low-level errors.

use crate::{
    artifact::DeploymentRecord,
    codegen::CodeGenerator,
    intent::{self, Intent},
    project::ProjectWorkspace,
    publish::{DeploymentPublisher, RepositoryPublisher},
    voice::VoiceIo,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The loop's own position in its turn-taking state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Setup,
    AwaitingRequirements,
    Developing,
    AwaitingDeployConfirmation,
    Deploying,
    Terminated,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user asked to exit.
    UserExit,
    /// No utterance could be obtained (capture or transcription failed).
    NoInput,
    /// The application was deployed; the record is immutable from here on.
    Deployed(DeploymentRecord),
    /// A deployment step failed and the remaining steps were aborted.
    DeploymentFailed,
}

/// Session-level knobs supplied by the caller.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Name for the remote repository created at deployment time.
    pub repo_name: String,
    /// Description attached to the created repository.
    pub repo_description: String,
    /// Whether to start the local preview server after the baseline is
    /// generated. Disabled in tests.
    pub start_preview: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            repo_name: "cadenza-generated-ui".to_string(),
            repo_description: "Web application generated by the Cadenza voice assistant"
                .to_string(),
            start_preview: true,
        }
    }
}

const REQUIREMENTS_PROMPT: &str = "What kind of web app would you like to create?";
const CHANGES_PROMPT: &str = "What changes would you like to make?";
const DEPLOY_CONFIRM_PROMPT: &str = "Say 'yes' to deploy or 'no' to continue development.";

/// The explicitly constructed session context: every collaborator the loop
/// touches is injected here, so the state machine can be driven with scripted
/// fakes in tests.
pub struct CommandLoop {
    voice: Arc<dyn VoiceIo>,
    generator: Arc<dyn CodeGenerator>,
    repositories: Arc<dyn RepositoryPublisher>,
    deployer: Arc<dyn DeploymentPublisher>,
    workspace: ProjectWorkspace,
    settings: SessionSettings,
    phase: SessionPhase,
}

impl CommandLoop {
    pub fn new(
        voice: Arc<dyn VoiceIo>,
        generator: Arc<dyn CodeGenerator>,
        repositories: Arc<dyn RepositoryPublisher>,
        deployer: Arc<dyn DeploymentPublisher>,
        workspace: ProjectWorkspace,
        settings: SessionSettings,
    ) -> Self {
        Self {
            voice,
            generator,
            repositories,
            deployer,
            workspace,
            settings,
            phase: SessionPhase::Setup,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn workspace(&self) -> &ProjectWorkspace {
        &self.workspace
    }

    /// Drives the session from the initial requirements prompt to a terminal
    /// outcome.
    pub async fn run(&mut self) -> SessionOutcome {
        self.voice
            .speak(
                "Welcome! I'll help you build and deploy a web application \
                 through voice commands.",
            )
            .await;

        self.phase = SessionPhase::AwaitingRequirements;
        let Some(requirements) = self.voice.listen(REQUIREMENTS_PROMPT).await else {
            info!("No requirements heard; ending session");
            self.phase = SessionPhase::Terminated;
            return SessionOutcome::NoInput;
        };

        self.voice
            .speak("Great! I'll create a baseline app based on your requirements.")
            .await;
        self.generate_and_apply(&requirements).await;

        if self.settings.start_preview {
            match self.workspace.start_preview_server() {
                Ok(()) => {
                    self.voice
                        .speak(
                            "Development server is running. You can see your app \
                             in the browser.",
                        )
                        .await;
                }
                Err(e) => warn!(error = ?e, "Preview server failed to start"),
            }
        }

        self.phase = SessionPhase::Developing;
        loop {
            let Some(command) = self.voice.listen(CHANGES_PROMPT).await else {
                info!("No utterance obtained; ending session");
                self.phase = SessionPhase::Terminated;
                return SessionOutcome::NoInput;
            };

            match intent::classify(&command) {
                Intent::ConfirmSatisfied => {
                    if let Some(outcome) = self.confirm_and_deploy().await {
                        return outcome;
                    }
                }
                Intent::ModifyRequest(request) => {
                    self.voice.speak("Processing your request...").await;
                    self.generate_and_apply(&request).await;
                }
                Intent::Exit => {
                    self.voice.speak("Thank you! Goodbye.").await;
                    self.phase = SessionPhase::Terminated;
                    return SessionOutcome::UserExit;
                }
                Intent::Unrecognized | Intent::DeployYes | Intent::DeployNo => {
                    self.voice
                        .speak("I didn't catch a request in that. You can describe a change, say 'looks good', or say 'exit'.")
                        .await;
                }
            }
        }
    }

    /// Invokes the generator and applies the result to the workspace.
    ///
    /// Apply happens only on a successful generation, so the stored project
    /// state is never disturbed by a failed call.
    async fn generate_and_apply(&mut self, requirement: &str) {
        let existing = self.workspace.current().cloned();
        match self.generator.generate(requirement, existing.as_ref()).await {
            Ok(artifact) => match self.workspace.apply(&artifact) {
                Ok(()) => {
                    self.voice
                        .speak("Code updated! Check the browser to see your changes.")
                        .await;
                }
                Err(e) => {
                    error!(error = ?e, "Failed to write generated code to workspace");
                    self.voice
                        .speak("I generated the code but could not save it. Please try again.")
                        .await;
                }
            },
            Err(e) => {
                warn!(error = ?e, "Code generation failed");
                self.voice
                    .speak("I couldn't generate code for that request. Let's try something else.")
                    .await;
            }
        }
    }

    /// Asks for deployment confirmation. Returns `Some(outcome)` when the
    /// session ends here, or `None` to resume development.
    async fn confirm_and_deploy(&mut self) -> Option<SessionOutcome> {
        self.phase = SessionPhase::AwaitingDeployConfirmation;
        self.voice
            .speak("Great! Would you like to deploy your application now?")
            .await;

        let answer = self.voice.listen(DEPLOY_CONFIRM_PROMPT).await;
        match answer {
            Some(text) if intent::classify_confirmation(&text) == Intent::DeployYes => {
                self.phase = SessionPhase::Deploying;
                Some(self.deploy().await)
            }
            _ => {
                self.voice
                    .speak("Okay, let's continue development.")
                    .await;
                self.phase = SessionPhase::Developing;
                None
            }
        }
    }

    /// Runs the strictly ordered deployment sequence: create repository,
    /// read project files, upload them as one batch, trigger the deployment.
    ///
    /// Each step's failure short-circuits the rest. Partial artifacts (such
    /// as a created but empty repository) are left as-is; there is no
    /// compensating transaction.
    async fn deploy(&mut self) -> SessionOutcome {
        self.voice.speak("Starting the deployment process...").await;

        self.voice.speak("Creating the remote repository...").await;
        let Some(repository) = self
            .repositories
            .create_repository(&self.settings.repo_name, &self.settings.repo_description)
            .await
        else {
            error!("Repository creation failed; aborting deployment");
            self.voice
                .speak("I couldn't create the repository, so deployment was aborted.")
                .await;
            self.phase = SessionPhase::Terminated;
            return SessionOutcome::DeploymentFailed;
        };
        self.voice
            .speak(&format!("Created repository: {}", repository.html_url))
            .await;

        let files = match self.workspace.deployment_files() {
            Ok(files) => files,
            Err(e) => {
                error!(error = ?e, "Could not read project files; aborting deployment");
                self.voice
                    .speak("I couldn't read the project files, so deployment was aborted.")
                    .await;
                self.phase = SessionPhase::Terminated;
                return SessionOutcome::DeploymentFailed;
            }
        };

        self.voice.speak("Pushing your code...").await;
        let report = self.repositories.upload_files(&repository, &files).await;
        if !report.is_complete() {
            warn!(failed = ?report.failed, "Some files failed to upload");
        }

        self.voice.speak("Deploying your application...").await;
        let Some(record) = self.deployer.trigger_deployment(&repository).await else {
            error!("Deployment trigger failed");
            self.voice.speak("The deployment failed.").await;
            self.phase = SessionPhase::Terminated;
            return SessionOutcome::DeploymentFailed;
        };

        self.voice
            .speak(&format!("Your web app is now live at: {}", record.url))
            .await;
        self.phase = SessionPhase::Terminated;
        SessionOutcome::Deployed(record)
    }
}
