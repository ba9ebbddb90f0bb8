//! Adapter for the external text-generation capability.
//!
//! The [`GenerationProvider`] trait is the seam between the scenario
//! service and whatever produces narrative text. The shipped
//! implementation, [`OpenAiProvider`], calls the OpenAI chat completions
//! API over HTTPS. A single failure surfaces immediately as a
//! [`ProviderError`]; the adapter never retries. The caller is solely
//! responsible for any fallback.

use async_trait::async_trait;
use crisis_sim_core::ProviderConfig;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// OpenAI chat completions endpoint.
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Errors from the text-generation provider.
///
/// Auth, quota, timeout, and malformed-response failures all land here;
/// the scenario service treats them uniformly as "fall back to template".
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request could not be completed.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Api {
        /// HTTP status code from the provider
        status: StatusCode,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body could not be interpreted as generated text.
    #[error("malformed provider response: {message}")]
    MalformedResponse {
        /// Description of what was missing or unparseable
        message: String,
    },
}

/// External text-generation capability.
///
/// Implementations suspend the caller while awaiting the remote result
/// and make exactly one attempt per call.
#[async_trait]
pub trait GenerationProvider: Send + Sync + std::fmt::Debug {
    /// Generates text for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on any transport, auth, quota, or
    /// response-format failure.
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, ProviderError>;
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// Model to use (e.g., "gpt-4o-mini")
    model: String,
    /// Maximum tokens in the completion
    max_tokens: u32,
    /// Sampling temperature
    temperature: f32,
    /// System and user messages
    messages: Vec<ChatMessage>,
}

/// Message in chat completion format.
#[derive(Debug, Serialize)]
struct ChatMessage {
    /// Role: "system" or "user"
    role: &'static str,
    /// Message content
    content: String,
}

/// Chat completion response wrapper.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Completion choices; the first one carries the text
    choices: Vec<Choice>,
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
struct Choice {
    /// The generated message
    message: ResponseMessage,
}

/// Message content of a completion choice.
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    /// Generated text; absent for refusals or tool calls
    content: Option<String>,
}

/// Text-generation provider backed by the OpenAI chat completions API.
///
/// # Examples
///
/// ```
/// use crisis_sim_engine::OpenAiProvider;
/// use secrecy::SecretString;
///
/// let provider = OpenAiProvider::new(
///     "gpt-4o-mini".to_string(),
///     SecretString::from("sk-test".to_string()),
///     0.7,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    model: String,
    api_key: SecretString,
    temperature: f32,
    endpoint: String,
}

impl OpenAiProvider {
    /// Creates a new provider.
    #[must_use]
    pub fn new(model: String, api_key: SecretString, temperature: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            model,
            api_key,
            temperature,
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        }
    }

    /// Builds a provider from configuration.
    ///
    /// Returns `None` when no API key is configured, selecting permanent
    /// template-fallback mode.
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Option<Self> {
        config.api_key.as_ref().map(|key| {
            Self::new(config.model.clone(), key.clone(), config.temperature)
        })
    }

    /// Overrides the API endpoint. Used by tests against local fixtures.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: max_output_tokens,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let completion: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    message: format!("failed to decode completion: {e}"),
                })?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::MalformedResponse {
                message: "completion contained no text".to_string(),
            });
        }

        Ok(text.to_string())
    }
}
