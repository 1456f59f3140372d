//! The voice I/O seam between the session loop and the speech stack.

use async_trait::async_trait;

/// Spoken conversation surface for the session loop.
///
/// Implementations wrap text-to-speech and speech-to-text services. Both
/// operations convert their own failures into degraded behavior at this
/// boundary: the loop only ever sees finished speech and optional
/// transcripts, never raw transport errors.
#[async_trait]
pub trait VoiceIo: Send + Sync {
    /// Synthesizes and plays `text`, blocking until the audio can reasonably
    /// be assumed finished. Must not fail; on synthesis trouble the
    /// implementation logs and falls back to a visible text notification so
    /// a transient API failure never aborts the session.
    async fn speak(&self, text: &str);

    /// Speaks `prompt`, records one fixed-duration window of audio, and
    /// returns the transcript. `None` means no input was obtained (capture
    /// or transcription failed) and is distinct from an empty transcript.
    async fn listen(&self, prompt: &str) -> Option<String>;
}
