//! Text-to-speech client for the ElevenLabs API.

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Default voice used for all prompts (Rachel).
pub const DEFAULT_VOICE_ID: &str = "JBFqnCBsd6RMkjVDRZzb";

const API_BASE: &str = "https://api.elevenlabs.io";
const MODEL_ID: &str = "eleven_multilingual_v2";
const OUTPUT_FORMAT: &str = "mp3_44100_128";

/// Converts text into playable audio bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// `SpeechSynthesizer` backed by the ElevenLabs text-to-speech endpoint.
pub struct ElevenLabsSynthesizer {
    http: reqwest::Client,
    api_key: String,
    voice_id: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: String, voice_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            voice_id,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let url = format!("{API_BASE}/v1/text-to-speech/{}", self.voice_id);
        let response = self
            .http
            .post(url)
            .header("xi-api-key", &self.api_key)
            .query(&[("output_format", OUTPUT_FORMAT)])
            .json(&serde_json::json!({
                "text": text,
                "model_id": MODEL_ID,
            }))
            .send()
            .await
            .context("Synthesis request failed")?
            .error_for_status()
            .context("Synthesis service returned an error")?;

        Ok(response.bytes().await?.to_vec())
    }
}
