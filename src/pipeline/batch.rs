// Paced batch driver — evaluates a list of prompts end to end.
//
// One prompt at a time: wait out the pacing interval, run the pipeline,
// print the report, move on. Pacing lives here, at the driver level; the
// scoring core never sleeps on its own. A failing prompt aborts the whole
// run; later prompts are not processed.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

use crate::influence::select::SelectionPolicy;
use crate::output::terminal;
use crate::pipeline::analyze::{analyze_prompt, InfluenceReport};
use crate::providers::rate_limiter::RateLimiter;
use crate::providers::traits::{TextEmbedder, TextGenerator};

/// Demo prompts used when `batch` runs without a file.
pub const DEMO_PROMPTS: &[&str] = &[
    "What are the benefits of a balanced diet and regular exercise for overall health?",
    "Describe the process of photosynthesis and its importance to plant life.",
    "Do you remember the name of the book I mentioned last week about artificial intelligence?",
    "Can you recall the recipe for the chocolate cake we made during the holidays?",
    "How can I reset my password if I have forgotten my current one?",
    "What are the shipping options available for international orders?",
    "What are the common causes of a computer overheating and how can it be prevented?",
    "Explain how to set up a virtual private network (VPN) on a home router.",
    "Remind me to schedule a meeting with the project team on Monday at 10 AM.",
    "Can you find a good Italian restaurant near me for dinner tonight?",
];

/// Run the pipeline over a list of prompts, paced by `pacer`.
///
/// Returns the reports in prompt order. Progress is shown with a spinner
/// per prompt; each finished report is displayed immediately.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    generator: &dyn TextGenerator,
    embedder: &dyn TextEmbedder,
    prompts: &[String],
    model: &str,
    policy: &SelectionPolicy,
    concurrency: usize,
    pacer: &RateLimiter,
    show_distances: bool,
) -> Result<Vec<InfluenceReport>> {
    let mut reports = Vec::with_capacity(prompts.len());

    for (i, prompt) in prompts.iter().enumerate() {
        pacer.acquire().await;

        info!(index = i + 1, total = prompts.len(), "Evaluating prompt");

        let report = analyze_with_spinner(
            generator,
            embedder,
            prompt,
            model,
            policy,
            concurrency,
            &format!("[{}/{}] {}", i + 1, prompts.len(), prompt),
        )
        .await?;

        terminal::display_report(&report, show_distances);
        reports.push(report);
    }

    Ok(reports)
}

/// Analyze one prompt behind a terminal spinner.
async fn analyze_with_spinner(
    generator: &dyn TextGenerator,
    embedder: &dyn TextEmbedder,
    prompt: &str,
    model: &str,
    policy: &SelectionPolicy,
    concurrency: usize,
    message: &str,
) -> Result<InfluenceReport> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = analyze_prompt(generator, embedder, prompt, model, policy, concurrency).await;

    spinner.finish_and_clear();
    result
}
