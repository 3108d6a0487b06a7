use std::env;
use std::time::Duration;

use anyhow::Result;

/// Which influence-selection policy to use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyKind {
    /// Top-K adaptive multi-threshold (default) — per-winner local thresholds
    TopK,
    /// Single global threshold derived from the maximum distance
    Global,
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// API key for the chat-completion provider
    pub groq_api_key: String,
    /// Chat-completion endpoint base (defaults to Groq's OpenAI-compatible API).
    /// Any OpenAI-compatible provider works; point this at OpenAI, OpenRouter,
    /// or a local server and keep the same client.
    pub groq_api_url: String,
    /// Model id sent with every chat-completion request
    pub generation_model: String,
    /// API key for the Google Generative Language embedding endpoint
    pub gemini_api_key: String,
    /// Embedding endpoint base (defaults to generativelanguage.googleapis.com)
    pub gemini_api_url: String,
    /// Embedding model id
    pub embedding_model: String,
    /// Which selection policy to use (default: TopK)
    pub policy: PolicyKind,
    /// Pause between successive prompt evaluations in batch/paragraph mode
    pub prompt_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the two API keys; those are only
    /// required once a command actually talks to a provider (`require_*`).
    pub fn load() -> Result<Self> {
        let policy = match env::var("LINCHPIN_POLICY").as_deref() {
            Ok("global") => PolicyKind::Global,
            // "topk" or unset both default to TopK
            _ => PolicyKind::TopK,
        };

        let prompt_interval = env::var("LINCHPIN_PROMPT_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .map(Duration::from_secs_f64)
            .unwrap_or(DEFAULT_PROMPT_INTERVAL);

        Ok(Self {
            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| crate::providers::groq::DEFAULT_API_URL.to_string()),
            generation_model: env::var("LINCHPIN_MODEL")
                .unwrap_or_else(|_| crate::providers::groq::DEFAULT_MODEL.to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| crate::providers::gemini::DEFAULT_API_URL.to_string()),
            embedding_model: env::var("LINCHPIN_EMBED_MODEL")
                .unwrap_or_else(|_| crate::providers::gemini::DEFAULT_MODEL.to_string()),
            policy,
            prompt_interval,
        })
    }

    /// Check that the chat-completion API key is configured.
    pub fn require_generator(&self) -> Result<()> {
        if self.groq_api_key.is_empty() {
            anyhow::bail!(
                "GROQ_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that the embedding API key is configured.
    pub fn require_embedder(&self) -> Result<()> {
        if self.gemini_api_key.is_empty() {
            anyhow::bail!(
                "GEMINI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that both providers have what they need.
    /// Call this before any command that runs the pipeline.
    pub fn require_providers(&self) -> Result<()> {
        self.require_generator()?;
        self.require_embedder()
    }
}

/// Default pause between prompt evaluations. Free-tier chat and embedding
/// quotas are per-minute, and one prompt costs 2(N+1) requests for an N-word
/// prompt.
pub const DEFAULT_PROMPT_INTERVAL: Duration = Duration::from_secs(30);
