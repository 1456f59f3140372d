//! Headless-browser snapshot service: captures a screenshot of a URL using a
//! remotely hosted browser instance, and describes the result with the
//! chat-completion service.
//!
//! The remote instance costs money while it runs, so it is held by an
//! [`InstanceGuard`] that is released on every exit path: explicitly through
//! [`InstanceGuard::release`], or as a best-effort stop request when the
//! guard is dropped.

use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs,
        ImageUrlArgs,
    },
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const API_BASE: &str = "https://api.browser-snapshots.dev";

#[derive(Deserialize)]
struct StartInstanceResponse {
    id: String,
}

#[derive(Deserialize)]
struct ScreenshotResponse {
    base_64_image: String,
}

/// Client for the remote browser-instance API.
pub struct SnapshotClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SnapshotClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: API_BASE.to_string(),
        }
    }

    fn post(&self, path: String) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .header("x-api-key", &self.api_key)
    }

    /// Starts a browser instance. The returned guard owns the instance.
    pub async fn start_instance(&self) -> Result<InstanceGuard> {
        let response: StartInstanceResponse = self
            .post("/v1/instances".to_string())
            .json(&serde_json::json!({ "kind": "browser" }))
            .send()
            .await
            .context("Instance start request failed")?
            .error_for_status()
            .context("Instance start was rejected")?
            .json()
            .await
            .context("Malformed instance start response")?;

        info!(instance = %response.id, "Browser instance started");
        Ok(InstanceGuard {
            stop_url: format!("{}/v1/instances/{}/stop", self.base_url, response.id),
            id: response.id,
            http: self.http.clone(),
            api_key: self.api_key.clone(),
            released: false,
        })
    }

    /// Navigates the instance to `url`, captures a screenshot, and writes
    /// the decoded PNG to `output`.
    pub async fn capture(
        &self,
        instance: &InstanceGuard,
        url: &str,
        output: &Path,
    ) -> Result<PathBuf> {
        self.post(format!("/v1/instances/{}/navigate", instance.id))
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .context("Navigation request failed")?
            .error_for_status()
            .context("Navigation was rejected")?;

        let shot: ScreenshotResponse = self
            .post(format!("/v1/instances/{}/screenshot", instance.id))
            .send()
            .await
            .context("Screenshot request failed")?
            .error_for_status()
            .context("Screenshot was rejected")?
            .json()
            .await
            .context("Malformed screenshot response")?;

        let png = BASE64
            .decode(shot.base_64_image)
            .context("Screenshot payload was not valid base64")?;
        tokio::fs::write(output, png)
            .await
            .with_context(|| format!("Failed to write screenshot to {}", output.display()))?;

        info!(path = %output.display(), "Screenshot captured");
        Ok(output.to_path_buf())
    }
}

/// Scoped ownership of a running remote browser instance.
pub struct InstanceGuard {
    id: String,
    stop_url: String,
    http: reqwest::Client,
    api_key: String,
    released: bool,
}

impl InstanceGuard {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stops the remote instance. Preferred over relying on `Drop`.
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        self.http
            .post(&self.stop_url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .context("Instance stop request failed")?
            .error_for_status()
            .context("Instance stop was rejected")?;
        info!(instance = %self.id, "Browser instance stopped");
        Ok(())
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Fallback for panic and interrupt paths. Fire-and-forget; there is
        // no runtime to await on during teardown of the last task.
        let http = self.http.clone();
        let stop_url = self.stop_url.clone();
        let api_key = self.api_key.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let _ = http.post(stop_url).header("x-api-key", api_key).send().await;
                });
            }
            Err(_) => {
                warn!(instance = %self.id, "Guard dropped outside a runtime; instance may leak");
            }
        }
    }
}

const DESCRIBE_PROMPT: &str = "Analyze this UI screenshot and describe the layout, colors, \
components, and design patterns used. Focus on actionable details that could be used to \
recreate a similar design.";

fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Describes a captured screenshot via the chat-completion service.
pub struct ScreenshotAnalyst {
    client: Client<OpenAIConfig>,
    model: String,
}

impl ScreenshotAnalyst {
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    pub async fn describe(&self, screenshot: &Path) -> Result<String> {
        let png = tokio::fs::read(screenshot)
            .await
            .with_context(|| format!("Failed to read screenshot {}", screenshot.display()))?;

        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(DESCRIBE_PROMPT)
                .build()?
                .into(),
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(ImageUrlArgs::default().url(png_data_url(&png)).build()?)
                .build()?
                .into(),
        ];
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(parts)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let description = response
            .choices
            .first()
            .context("No response choice from analysis")?
            .message
            .content
            .as_ref()
            .context("No content in analysis response")?;
        Ok(description.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_embeds_base64_png() {
        let url = png_data_url(&[0x89, 0x50, 0x4e, 0x47]);
        assert!(url.starts_with("data:image/png;base64,"));
        let encoded = url.trim_start_matches("data:image/png;base64,");
        assert_eq!(BASE64.decode(encoded).unwrap(), vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn screenshot_response_uses_service_field_name() {
        let parsed: ScreenshotResponse =
            serde_json::from_str(r#"{"base_64_image": "aGk="}"#).unwrap();
        assert_eq!(parsed.base_64_image, "aGk=");
    }
}
