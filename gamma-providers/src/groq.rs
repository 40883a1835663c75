//! Groq chat-completions HTTP client

use async_trait::async_trait;
use gamma_core::config::ProviderConfig;
use reqwest::Client;
use tracing::debug;

use crate::base::{ChatTurn, CompletionProvider, ProviderError, ProviderResult};

/// Reply substituted when the upstream returns an empty completion
const EMPTY_COMPLETION_REPLY: &str = "Sorry, I could not generate a response.";

/// Chat-completions API request format
#[derive(Debug, serde::Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

/// Chat-completions API response format
#[derive(Debug, serde::Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, serde::Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, serde::Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: i64,
    #[serde(default)]
    completion_tokens: i64,
}

/// Groq provider client
pub struct GroqClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl GroqClient {
    /// Create a new Groq client from provider configuration
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn parse_response(&self, response: ChatCompletionResponse) -> ProviderResult<String> {
        debug!(
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Completion finished"
        );

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

        Ok(choice
            .message
            .content
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_string()))
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(&self, turns: &[ChatTurn]) -> ProviderResult<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!("Sending chat request to {} with model {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response_data: ChatCompletionResponse = response.json().await?;
        self.parse_response(response_data)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
