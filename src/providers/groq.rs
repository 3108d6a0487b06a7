// Groq chat-completion client — OpenAI-compatible `/chat/completions`.
//
// Groq serves open-weight models behind the OpenAI wire format, so this
// client also works against OpenAI, OpenRouter, or any other compatible
// endpoint by overriding the base URL. Each request sends a single user
// message and reads back the first choice's content.
//
// API docs: https://console.groq.com/docs/api-reference#chat

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::TextGenerator;

/// Default chat-completion endpoint base.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Chat-completion client for OpenAI-compatible endpoints.
pub struct GroqGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqGenerator {
    /// Create a new client pointing at the given base URL.
    ///
    /// Pass [`DEFAULT_API_URL`] for Groq, or a different compatible base
    /// for other providers.
    pub fn new(base_url: &str, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent("linchpin/0.1 (prompt-influence)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for GroqGenerator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call chat-completion API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat-completion API returned {status}: {body}");
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat-completion response")?;

        // A refused or empty completion is an empty string, not an error.
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!(
            model = model,
            response_chars = content.len(),
            prompt_preview = &prompt[..prompt.len().min(50)],
            "Generated response"
        );

        Ok(content)
    }
}

// --- Chat-completion request/response types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
