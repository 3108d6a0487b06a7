// Google Generative Language embedding client — `models/{model}:embedContent`.
//
// Returns a fixed-dimension vector per text (768 dims for text-embedding-004).
// The model id is part of the URL and the payload, so it is fixed at
// construction. One embedder instance means one embedding space, which is
// exactly the consistency the distance scorer needs.
//
// API docs: https://ai.google.dev/api/embeddings#method:-models.embedcontent

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::TextEmbedder;

/// Default Generative Language API base.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-004";

/// Embedding client for the Google Generative Language API.
pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiEmbedder {
    /// Create a new embedder for the given model.
    pub fn new(base_url: &str, api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent("linchpin/0.1 (prompt-influence)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[async_trait]
impl TextEmbedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let url = format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = EmbedRequest {
            model: format!("models/{}", self.model),
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to call embedding API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding API returned {status}: {body}");
        }

        let result: EmbedResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        debug!(
            model = self.model,
            dim = result.embedding.values.len(),
            "Embedded text"
        );

        Ok(result.embedding.values)
    }
}

// --- embedContent request/response types ---

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
}

#[derive(Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Serialize)]
struct EmbedPart {
    text: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbedValues,
}

#[derive(Deserialize)]
struct EmbedValues {
    values: Vec<f64>,
}
