// Provider traits — the swap-ready abstractions.
//
// The pipeline never talks to a concrete API. It sees two capabilities:
// something that turns a prompt into text, and something that turns text
// into a vector. Both are async because the production implementations are
// HTTP calls; both are constructed from explicit configuration so tests can
// substitute fakes.

use anyhow::Result;
use async_trait::async_trait;

/// Generates text from a prompt via a chat-completion model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a response for `prompt` using `model`.
    ///
    /// Returns an empty string when the provider produces no content;
    /// callers must not treat emptiness as an error.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}

/// Embeds text into a fixed-dimension vector.
///
/// Implementations must be dimensionally consistent across calls within one
/// pipeline run: the base and every variant share the same embedding space.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Produce an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;
}
