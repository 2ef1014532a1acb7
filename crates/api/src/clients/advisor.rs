//! OpenAI-compatible chat client for the farming advisor.

use agrihub_core::error::CoreError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{AdvisorClient, AdvisorReply};

/// System prompt framing every advisor request.
const SYSTEM_PROMPT: &str =
    "You are an agricultural advisor. Answer questions about crops, livestock, \
     equipment and farm operations concisely and practically.";

/// [`AdvisorClient`] posting to a configurable OpenAI-compatible chat endpoint.
pub struct ChatAdvisorClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatAdvisorClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

/// Relevant subset of the chat-completions response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl AdvisorClient for ChatAdvisorClient {
    async fn advise(&self, prompt: &str) -> Result<AdvisorReply, CoreError> {
        let mut request = self.http.post(&self.base_url).json(&json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
        }));

        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("Advisor request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "Advisor service returned status {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(format!("Invalid advisor response: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CoreError::Upstream("Advisor returned no choices".into()))?;

        Ok(AdvisorReply { content })
    }
}
