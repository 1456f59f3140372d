//! The local audio hardware seam.

use crate::{capture, playback};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Records from and plays to the local audio hardware.
///
/// Abstracted so the voice agent can be tested without a sound card.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioDevice: Send + Sync {
    /// Records one fixed window of audio and returns the path of a temporary
    /// WAV file owned by the caller.
    async fn record(&self, window: Duration) -> Result<PathBuf>;

    /// Plays encoded audio, returning once playback has finished.
    async fn play(&self, audio: Vec<u8>) -> Result<()>;
}

/// The real device, backed by cpal capture and rodio playback. Both are
/// blocking APIs, so calls are moved onto the blocking thread pool.
pub struct CpalAudioDevice;

#[async_trait]
impl AudioDevice for CpalAudioDevice {
    async fn record(&self, window: Duration) -> Result<PathBuf> {
        tokio::task::spawn_blocking(move || capture::record_to_wav(window))
            .await
            .context("Recording task panicked")?
    }

    async fn play(&self, audio: Vec<u8>) -> Result<()> {
        tokio::task::spawn_blocking(move || playback::play_bytes(audio))
            .await
            .context("Playback task panicked")?
    }
}
