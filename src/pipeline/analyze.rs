// Single-prompt influence analysis.
//
// Staged scatter/gather. Given a prompt, this module:
// 1. Generates the base response and embeds it
// 2. Creates one leave-one-out variant per word
// 3. Generates all variant responses (concurrent, ordered gather)
// 4. Embeds all variant responses (concurrent, ordered gather)
// 5. Scores each variant's drift from the base embedding
// 6. Selects the influential words per the configured policy
//
// Requests within a stage run concurrently, but each stage is a barrier:
// embedding starts only after every response arrived. Gathering uses an
// ordered buffer, so distances[i] always belongs to word i regardless of
// completion order. Any request failure aborts the whole prompt; there is
// no partial-result recovery.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::influence::distance::score_distances;
use crate::influence::select::{select_influential, SelectionPolicy};
use crate::influence::variants::{create_variants, split_words};
use crate::providers::traits::{TextEmbedder, TextGenerator};

/// Everything one pipeline run learns about a prompt.
#[derive(Debug, Clone)]
pub struct InfluenceReport {
    /// The prompt as given
    pub prompt: String,
    /// Its whitespace-delimited words, in order
    pub words: Vec<String>,
    /// The unmodified prompt's generated response
    pub base_response: String,
    /// Embedding drift per word position (1 - cosine similarity)
    pub distances: Vec<f64>,
    /// The selected influential words
    pub influential: Vec<String>,
}

impl InfluenceReport {
    fn empty(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            words: Vec::new(),
            base_response: String::new(),
            distances: Vec::new(),
            influential: Vec::new(),
        }
    }
}

/// Run the full influence pipeline for one prompt.
///
/// `concurrency` bounds the outstanding requests per stage. A zero-word
/// prompt short-circuits to an empty report without touching either
/// provider.
pub async fn analyze_prompt(
    generator: &dyn TextGenerator,
    embedder: &dyn TextEmbedder,
    prompt: &str,
    model: &str,
    policy: &SelectionPolicy,
    concurrency: usize,
) -> Result<InfluenceReport> {
    let words = split_words(prompt);
    if words.is_empty() {
        return Ok(InfluenceReport::empty(prompt));
    }

    // Step 1: base response and its embedding
    let base_response = generator.generate(prompt, model).await?;
    let base_embedding = embedder.embed(&base_response).await?;
    debug!(dim = base_embedding.len(), "Base response embedded");

    // Step 2: one variant per word position
    let variants = create_variants(prompt);

    // Step 3: variant responses (concurrent fan-out, ordered gather)
    let responses = gather_ordered(
        variants.iter().map(|v| generator.generate(v, model)),
        concurrency,
    )
    .await?;

    // Step 4: variant embeddings, same scatter/gather
    let embeddings = gather_ordered(responses.iter().map(|r| embedder.embed(r)), concurrency).await?;

    // Step 5 and 6: drift per position, then the policy's selection
    let distances = score_distances(&base_embedding, &embeddings);
    let influential = select_influential(&words, &distances, policy);

    info!(
        word_count = words.len(),
        influential_count = influential.len(),
        "Analyzed prompt"
    );

    Ok(InfluenceReport {
        prompt: prompt.to_string(),
        words,
        base_response,
        distances,
        influential,
    })
}

/// Drive up to `concurrency` futures at once, yielding results in the input
/// order and failing fast on the first error.
async fn gather_ordered<T, F>(
    futures: impl Iterator<Item = F>,
    concurrency: usize,
) -> Result<Vec<T>>
where
    F: std::future::Future<Output = Result<T>>,
{
    stream::iter(futures)
        .buffered(concurrency.max(1))
        .collect::<Vec<Result<T>>>()
        .await
        .into_iter()
        .collect()
}
