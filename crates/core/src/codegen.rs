//! Application code generation via an OpenAI-compatible chat-completion API.

use crate::artifact::GeneratedArtifact;
use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;

/// Defines the contract for any service that can turn a natural-language
/// requirement into application code.
///
/// This abstraction keeps the session loop independent of the concrete
/// generation backend, so it can be exercised with scripted fakes in tests.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Produces updated source and stylesheet text for `requirement`.
    ///
    /// `existing` carries the most recently applied artifact so the service
    /// can evolve the current application instead of starting over. Callers
    /// must apply the result only when this returns `Ok`; a failed call
    /// leaves the previously applied artifact untouched.
    async fn generate(
        &self,
        requirement: &str,
        existing: Option<&GeneratedArtifact>,
    ) -> Result<GeneratedArtifact>;
}

/// A `CodeGenerator` backed by an OpenAI-compatible chat-completion service.
///
/// Each generation makes two independent calls, one for the source file and
/// one for the stylesheet, each carrying the other existing artifact as
/// context. Both calls instruct the service to emit raw file contents only;
/// the response is trimmed and otherwise trusted verbatim.
pub struct OpenAICodeGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

const SYSTEM_PROMPT: &str = "You are an expert React developer. You write complete, \
working single-file React applications. Respond with raw file contents only: no \
markdown fences, no commentary, no explanations.";

impl OpenAICodeGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `config` - OpenAI API configuration (API key, base URL, etc.).
    /// * `model` - Model identifier to use for generation (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    async fn complete(&self, user_prompt: String) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .context("No response choice from generation service")?
            .message
            .content
            .as_ref()
            .context("No content in generation response")?;

        Ok(content.trim().to_string())
    }
}

fn source_prompt(requirement: &str, existing: Option<&GeneratedArtifact>) -> String {
    match existing {
        Some(artifact) => format!(
            "Update the application source to satisfy this request: {requirement}\n\n\
             Current src/App.js:\n{}\n\nCurrent src/App.css (for context only):\n{}\n\n\
             Return the complete new contents of src/App.js.",
            artifact.source, artifact.stylesheet
        ),
        None => format!(
            "Create the initial application source for this request: {requirement}\n\n\
             Return the complete contents of src/App.js for a create-react-app project."
        ),
    }
}

fn stylesheet_prompt(requirement: &str, existing: Option<&GeneratedArtifact>) -> String {
    match existing {
        Some(artifact) => format!(
            "Update the stylesheet to satisfy this request: {requirement}\n\n\
             Current src/App.css:\n{}\n\nCurrent src/App.js (for context only):\n{}\n\n\
             Return the complete new contents of src/App.css.",
            artifact.stylesheet, artifact.source
        ),
        None => format!(
            "Create the initial stylesheet for this request: {requirement}\n\n\
             Return the complete contents of src/App.css for a create-react-app project."
        ),
    }
}

#[async_trait]
impl CodeGenerator for OpenAICodeGenerator {
    async fn generate(
        &self,
        requirement: &str,
        existing: Option<&GeneratedArtifact>,
    ) -> Result<GeneratedArtifact> {
        tracing::info!(model = %self.model, "Generating application code");
        let source = self
            .complete(source_prompt(requirement, existing))
            .await
            .context("Source generation failed")?;
        let stylesheet = self
            .complete(stylesheet_prompt(requirement, existing))
            .await
            .context("Stylesheet generation failed")?;

        Ok(GeneratedArtifact { source, stylesheet })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_prompts_omit_existing_code() {
        let prompt = source_prompt("a todo app", None);
        assert!(prompt.contains("a todo app"));
        assert!(prompt.contains("initial application source"));

        let css = stylesheet_prompt("a todo app", None);
        assert!(css.contains("src/App.css"));
    }

    #[test]
    fn update_prompts_carry_both_existing_artifacts() {
        let artifact = GeneratedArtifact::new("function App() {}", ".App { color: red; }");
        let prompt = source_prompt("add a navbar", Some(&artifact));
        assert!(prompt.contains("function App() {}"));
        assert!(prompt.contains(".App { color: red; }"));

        let css = stylesheet_prompt("add a navbar", Some(&artifact));
        assert!(css.contains(".App { color: red; }"));
        assert!(css.contains("function App() {}"));
    }
}
