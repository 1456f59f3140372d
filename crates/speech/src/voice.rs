//! The spoken conversation façade used by the session loop.

use crate::{device::AudioDevice, synthesis::SpeechSynthesizer, transcription::Transcriber};
use async_trait::async_trait;
use cadenza_core::VoiceIo;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Delay between speaking a prompt and starting to record, so the user has a
/// moment to think.
const SETTLE_DELAY: Duration = Duration::from_secs(3);
/// Length of one recording window.
const RECORD_WINDOW: Duration = Duration::from_secs(5);
/// Pause per spoken word after playback, so a message is heard in full
/// before the next prompt is issued.
const WORD_PAUSE: Duration = Duration::from_millis(300);

/// Pause applied after playback, proportional to the number of spoken words.
fn pacing_pause(text: &str, word_pause: Duration) -> Duration {
    word_pause * text.split_whitespace().count() as u32
}

/// Implements `VoiceIo` on top of a synthesizer, a transcriber, and the
/// local audio hardware.
///
/// Every external failure is absorbed here: `speak` falls back to a printed
/// text notification, `listen` converts capture and transcription failures
/// into `None`. The session loop never sees a raw error from this type.
pub struct VoiceAgent {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    transcriber: Arc<dyn Transcriber>,
    device: Arc<dyn AudioDevice>,
    settle_delay: Duration,
    record_window: Duration,
    word_pause: Duration,
}

impl VoiceAgent {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        transcriber: Arc<dyn Transcriber>,
        device: Arc<dyn AudioDevice>,
    ) -> Self {
        Self {
            synthesizer,
            transcriber,
            device,
            settle_delay: SETTLE_DELAY,
            record_window: RECORD_WINDOW,
            word_pause: WORD_PAUSE,
        }
    }

    /// Overrides the fixed delays. Tests pass zeros.
    pub fn with_timing(
        mut self,
        settle_delay: Duration,
        record_window: Duration,
        word_pause: Duration,
    ) -> Self {
        self.settle_delay = settle_delay;
        self.record_window = record_window;
        self.word_pause = word_pause;
        self
    }
}

#[async_trait]
impl VoiceIo for VoiceAgent {
    async fn speak(&self, text: &str) {
        match self.synthesizer.synthesize(text).await {
            Ok(audio) => {
                if let Err(e) = self.device.play(audio).await {
                    warn!(error = ?e, "Audio playback failed");
                    println!("{text}");
                }
            }
            Err(e) => {
                warn!(error = ?e, "Speech synthesis failed");
                println!("{text}");
            }
        }

        tokio::time::sleep(pacing_pause(text, self.word_pause)).await;
    }

    async fn listen(&self, prompt: &str) -> Option<String> {
        self.speak(prompt).await;
        tokio::time::sleep(self.settle_delay).await;
        self.speak("Recording...").await;

        let recording = match self.device.record(self.record_window).await {
            Ok(path) => path,
            Err(e) => {
                warn!(error = ?e, "Audio capture failed");
                self.speak("I had trouble with the microphone.").await;
                return None;
            }
        };

        let transcript = self.transcriber.transcribe(&recording).await;
        if let Err(e) = tokio::fs::remove_file(&recording).await {
            warn!(path = %recording.display(), error = ?e, "Could not remove recording");
        }

        match transcript {
            Ok(text) => {
                self.speak(&format!("I heard: {text}")).await;
                Some(text)
            }
            Err(e) => {
                warn!(error = ?e, "Transcription failed");
                self.speak("I could not understand what you said. Please try again.")
                    .await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MockAudioDevice;
    use crate::synthesis::MockSpeechSynthesizer;
    use crate::transcription::MockTranscriber;
    use anyhow::anyhow;

    fn quiet_agent(
        synthesizer: MockSpeechSynthesizer,
        transcriber: MockTranscriber,
        device: MockAudioDevice,
    ) -> VoiceAgent {
        VoiceAgent::new(
            Arc::new(synthesizer),
            Arc::new(transcriber),
            Arc::new(device),
        )
        .with_timing(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    fn temp_recording() -> std::path::PathBuf {
        tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .unwrap()
            .into_temp_path()
            .keep()
            .unwrap()
    }

    #[test]
    fn pacing_pause_scales_with_word_count() {
        assert_eq!(
            pacing_pause("five words take longer here", Duration::from_millis(300)),
            Duration::from_millis(1500)
        );
        assert_eq!(
            pacing_pause("hello", Duration::from_millis(300)),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn pacing_pause_is_zero_for_empty_text() {
        assert_eq!(pacing_pause("", Duration::from_millis(300)), Duration::ZERO);
        assert_eq!(pacing_pause("   ", Duration::from_millis(300)), Duration::ZERO);
    }

    #[tokio::test]
    async fn speak_plays_synthesized_audio() {
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .times(1)
            .returning(|_| Ok(vec![1, 2, 3]));
        let mut device = MockAudioDevice::new();
        device
            .expect_play()
            .times(1)
            .returning(|audio| {
                assert_eq!(audio, vec![1, 2, 3]);
                Ok(())
            });

        let agent = quiet_agent(synthesizer, MockTranscriber::new(), device);
        agent.speak("hello").await;
    }

    #[tokio::test]
    async fn speak_falls_back_to_text_on_synthesis_failure() {
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .times(1)
            .returning(|_| Err(anyhow!("service unavailable")));
        // Playback must never be attempted; speak must still return normally.
        let device = MockAudioDevice::new();

        let agent = quiet_agent(synthesizer, MockTranscriber::new(), device);
        agent.speak("hello").await;
    }

    #[tokio::test]
    async fn listen_returns_transcript_and_removes_recording() {
        let recording = temp_recording();
        let recording_for_mock = recording.clone();

        let mut synthesizer = MockSpeechSynthesizer::new();
        // Prompt, "Recording...", and the confirmation echo.
        synthesizer
            .expect_synthesize()
            .times(3)
            .returning(|_| Ok(Vec::new()));
        let mut device = MockAudioDevice::new();
        device
            .expect_play()
            .times(3)
            .returning(|_| Ok(()));
        device
            .expect_record()
            .times(1)
            .returning(move |_| Ok(recording_for_mock.clone()));
        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .times(1)
            .returning(|_| Ok("build a todo app".to_string()));

        let agent = quiet_agent(synthesizer, transcriber, device);
        let heard = agent.listen("What would you like?").await;

        assert_eq!(heard.as_deref(), Some("build a todo app"));
        assert!(!recording.exists(), "recording should be deleted");
    }

    #[tokio::test]
    async fn listen_returns_none_when_transcription_fails() {
        let recording = temp_recording();
        let recording_for_mock = recording.clone();

        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer.expect_synthesize().returning(|_| Ok(Vec::new()));
        let mut device = MockAudioDevice::new();
        device.expect_play().returning(|_| Ok(()));
        device
            .expect_record()
            .returning(move |_| Ok(recording_for_mock.clone()));
        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .returning(|_| Err(anyhow!("no speech detected")));

        let agent = quiet_agent(synthesizer, transcriber, device);
        assert_eq!(agent.listen("Anything?").await, None);
        assert!(!recording.exists(), "recording is deleted even on failure");
    }

    #[tokio::test]
    async fn listen_returns_none_when_capture_fails() {
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer.expect_synthesize().returning(|_| Ok(Vec::new()));
        let mut device = MockAudioDevice::new();
        device.expect_play().returning(|_| Ok(()));
        device
            .expect_record()
            .returning(|_| Err(anyhow!("no input device")));
        // Transcription must never be attempted.
        let transcriber = MockTranscriber::new();

        let agent = quiet_agent(synthesizer, transcriber, device);
        assert_eq!(agent.listen("Anything?").await, None);
    }
}
