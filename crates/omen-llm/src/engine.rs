use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use omen_core::AiSettings;

/// Text-completion capability the delegated strategies run against.
///
/// Production code hands in [`LlmCompletion`]; tests substitute canned
/// responses. The capability is constructed explicitly and passed down,
/// never initialized as process-wide state.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, String>;
}

fn map_backend(provider: &str) -> Result<LLMBackend, String> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(format!("unknown provider: {other}")),
    }
}

/// Completion backed by a configured LLM provider.
pub struct LlmCompletion {
    settings: AiSettings,
}

impl LlmCompletion {
    pub fn new(settings: AiSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Completion for LlmCompletion {
    async fn complete(&self, system: &str, user: &str) -> Result<String, String> {
        let backend = map_backend(&self.settings.provider)?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&self.settings.model)
            .system(system);

        if !self.settings.api_key.is_empty() {
            builder = builder.api_key(&self.settings.api_key);
        }

        let llm = builder.build().map_err(|e| format!("build LLM: {e}"))?;

        let messages = vec![ChatMessage::user().content(user).build()];

        tracing::debug!(provider = %self.settings.provider, model = %self.settings.model, "sending completion request");

        let response = llm.chat(&messages).await.map_err(|e| format!("chat: {e}"))?;

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err("LLM returned empty text".to_string()),
            None => Err("LLM returned no text".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(map_backend("not-a-provider").is_err());
        assert!(map_backend("anthropic").is_ok());
    }
}
