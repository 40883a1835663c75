//! HTTP client for the gateway chat endpoint
//!
//! This is the generator the session manager drives: it forwards a single
//! prompt and gets back a single reply, with the gateway maintaining the
//! rolling conversation context server-side.

use async_trait::async_trait;
use gamma_core::session::ResponseGenerator;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::base::SESSION_HEADER;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResetResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Client of the gateway's `/api/chat` endpoint
pub struct RemoteGenerator {
    client: Client,
    endpoint: String,
    session_id: Option<String>,
}

impl RemoteGenerator {
    /// Create a client for the given chat endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            session_id: None,
        }
    }

    /// Tag every request with a session identifier
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    fn apply_session(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_id {
            Some(id) => req.header(SESSION_HEADER, id),
            None => req,
        }
    }

    /// Clear the gateway-side conversation memory
    pub async fn reset(&self) -> gamma_core::Result<String> {
        let response = self
            .apply_session(self.client.delete(&self.endpoint))
            .send()
            .await
            .map_err(|e| gamma_core::Error::Generation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(gamma_core::Error::Generation(format!(
                "HTTP Error: {}",
                response.status()
            )));
        }

        let body: ResetResponse = response
            .json()
            .await
            .map_err(|e| gamma_core::Error::Generation(e.to_string()))?;
        Ok(body
            .message
            .unwrap_or_else(|| "Conversation memory cleared".to_string()))
    }
}

#[async_trait]
impl ResponseGenerator for RemoteGenerator {
    async fn generate(&self, prompt: &str) -> gamma_core::Result<String> {
        let body = json!({
            "messages": [{ "role": "user", "content": prompt }],
        });

        let result = self
            .apply_session(self.client.post(&self.endpoint).json(&body))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Error generating response: {}", e);
                return Err(gamma_core::Error::Generation(
                    "Failed to generate response. Please try again later.".to_string(),
                ));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            warn!("HTTP Error: {}", status);
            return Err(gamma_core::Error::Generation(format!(
                "HTTP Error: {}",
                status
            )));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| gamma_core::Error::Generation(e.to_string()))?;

        data.response
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                gamma_core::Error::Generation("Invalid response structure from API".to_string())
            })
    }
}
