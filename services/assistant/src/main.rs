//! Main entrypoint for the Cadenza voice assistant.
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Constructing the speech, generation, and deployment collaborators.
//! 4. Running the voice command loop until a terminal outcome or interrupt.
//! 5. Tearing down on every exit path.

mod config;

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use cadenza_core::{
    CommandLoop, SessionOutcome, SessionSettings, VoiceIo, codegen::OpenAICodeGenerator,
    project::ProjectWorkspace,
};
use cadenza_remote::{GithubPublisher, ScreenshotAnalyst, SnapshotClient, VercelPublisher};
use cadenza_speech::{CpalAudioDevice, ElevenLabsSynthesizer, VoiceAgent, WhisperTranscriber};
use config::Config;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing collaborators...");

    let openai_config = OpenAIConfig::new().with_api_key(&config.openai_api_key);

    let voice: Arc<dyn VoiceIo> = Arc::new(VoiceAgent::new(
        Arc::new(ElevenLabsSynthesizer::new(
            config.elevenlabs_api_key.clone(),
            config.voice_id.clone(),
        )),
        Arc::new(WhisperTranscriber::new(openai_config.clone())),
        Arc::new(CpalAudioDevice),
    ));
    let generator = Arc::new(OpenAICodeGenerator::new(
        openai_config.clone(),
        config.chat_model.clone(),
    ));
    let repositories = Arc::new(GithubPublisher::new(config.github_token.clone()));
    let deployer = Arc::new(VercelPublisher::new(config.vercel_token.clone()));

    let workspace = ProjectWorkspace::open(&config.project_dir)
        .context("Failed to set up the project workspace")?;
    let settings = SessionSettings {
        repo_name: config.repo_name.clone(),
        ..SessionSettings::default()
    };

    let mut session = CommandLoop::new(
        voice.clone(),
        generator,
        repositories,
        deployer,
        workspace,
        settings,
    );

    info!(project_dir = %config.project_dir.display(), "Starting voice session");
    let outcome = tokio::select! {
        outcome = session.run() => Some(outcome),
        _ = tokio::signal::ctrl_c() => {
            info!("Received interrupt. Shutting down gracefully...");
            None
        }
    };

    match &outcome {
        Some(SessionOutcome::Deployed(record)) => {
            info!(url = %record.url, repo = %record.repository.full_name, "Session finished with a live deployment");
            snapshot_live_site(&config, &record.url).await;
        }
        Some(other) => info!(outcome = ?other, "Session finished"),
        None => {}
    }

    // Teardown runs on every exit path, interrupt included.
    voice.speak("Thank you for using Cadenza! Goodbye.").await;
    info!("Session closed.");
    Ok(())
}

/// Captures and describes a screenshot of the freshly deployed site.
/// Best-effort: failures are logged and never affect the session outcome.
async fn snapshot_live_site(config: &Config, url: &str) {
    let Some(api_key) = &config.browser_api_key else {
        return;
    };
    if let Err(e) = try_snapshot(config, api_key, url).await {
        warn!(error = ?e, "Could not capture a snapshot of the live site");
    }
}

async fn try_snapshot(config: &Config, api_key: &str, url: &str) -> anyhow::Result<()> {
    let client = SnapshotClient::new(api_key.to_string());
    let instance = client.start_instance().await?;

    let output = config.project_dir.join("deployment.png");
    let captured = client.capture(&instance, url, &output).await;
    // The instance is released before the capture result is inspected, so a
    // capture failure cannot leak the running instance.
    instance.release().await?;
    let screenshot = captured?;

    let analyst = ScreenshotAnalyst::new(
        OpenAIConfig::new().with_api_key(&config.openai_api_key),
        config.chat_model.clone(),
    );
    match analyst.describe(&screenshot).await {
        Ok(description) => info!(%description, "Live site snapshot analyzed"),
        Err(e) => warn!(error = ?e, "Snapshot analysis failed"),
    }
    Ok(())
}
