use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use linchpin::config::{Config, PolicyKind};
use linchpin::influence::select::{
    SelectionPolicy, DEFAULT_GLOBAL_FRACTION, DEFAULT_TOP_K, DEFAULT_TOP_K_FRACTION,
};
use linchpin::output::terminal;
use linchpin::pipeline::{analyze, batch};
use linchpin::providers::gemini::GeminiEmbedder;
use linchpin::providers::groq::GroqGenerator;
use linchpin::providers::rate_limiter::RateLimiter;
use linchpin::text;

/// Linchpin: leave-one-out influence estimation for prompt words.
///
/// Replaces each word of a prompt with a placeholder, re-queries the model,
/// and measures how far the response drifts in embedding space. The words
/// whose removal moves the response furthest are the ones the answer
/// hinges on.
#[derive(Parser)]
#[command(name = "linchpin", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single prompt
    Analyze {
        /// The prompt to analyze
        prompt: String,

        /// Selection policy: "topk" or "global" (default: LINCHPIN_POLICY or topk)
        #[arg(long)]
        policy: Option<String>,

        /// Winner count for the topk policy (default: 3)
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Threshold fraction (default: 0.15 for topk, 0.35 for global)
        #[arg(long)]
        threshold: Option<f64>,

        /// Number of variant requests in flight at once (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Hide the per-word distance table
        #[arg(long)]
        no_distances: bool,
    },

    /// Evaluate the built-in demo prompts, or a file of prompts (one per line)
    Batch {
        /// File of prompts, one per line; omit for the built-in demo set
        #[arg(long)]
        file: Option<PathBuf>,

        /// Selection policy: "topk" or "global" (default: LINCHPIN_POLICY or topk)
        #[arg(long)]
        policy: Option<String>,

        /// Winner count for the topk policy (default: 3)
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Threshold fraction (default: 0.15 for topk, 0.35 for global)
        #[arg(long)]
        threshold: Option<f64>,

        /// Number of variant requests in flight at once (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Show the per-word distance table for each prompt
        #[arg(long)]
        distances: bool,
    },

    /// Split a paragraph into sentences and analyze each one
    Paragraph {
        /// The paragraph to analyze
        text: String,

        /// Selection policy: "topk" or "global" (default: LINCHPIN_POLICY or topk)
        #[arg(long)]
        policy: Option<String>,

        /// Winner count for the topk policy (default: 3)
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Threshold fraction (default: 0.15 for topk, 0.35 for global)
        #[arg(long)]
        threshold: Option<f64>,

        /// Number of variant requests in flight at once (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("linchpin=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            prompt,
            policy,
            top_k,
            threshold,
            concurrency,
            no_distances,
        } => {
            let config = Config::load()?;
            config.require_providers()?;
            let policy = resolve_policy(&config, policy.as_deref(), top_k, threshold)?;
            let (generator, embedder) = create_providers(&config)?;

            println!("Analyzing prompt ({} variant queries)...", word_count(&prompt));

            let report = analyze::analyze_prompt(
                &generator,
                &embedder,
                &prompt,
                &config.generation_model,
                &policy,
                concurrency,
            )
            .await?;

            terminal::display_report(&report, !no_distances);
        }

        Commands::Batch {
            file,
            policy,
            top_k,
            threshold,
            concurrency,
            distances,
        } => {
            let config = Config::load()?;
            config.require_providers()?;
            let policy = resolve_policy(&config, policy.as_deref(), top_k, threshold)?;
            let (generator, embedder) = create_providers(&config)?;

            let prompts = load_prompts(file.as_deref())?;
            let pacer = RateLimiter::from_interval(config.prompt_interval);

            println!(
                "Evaluating {} prompts ({}s between prompts)...",
                prompts.len(),
                config.prompt_interval.as_secs(),
            );

            let reports = batch::run(
                &generator,
                &embedder,
                &prompts,
                &config.generation_model,
                &policy,
                concurrency,
                &pacer,
                distances,
            )
            .await?;

            println!("\n{}", "Batch complete.".bold());
            println!("  Prompts evaluated: {}", reports.len());
        }

        Commands::Paragraph {
            text,
            policy,
            top_k,
            threshold,
            concurrency,
        } => {
            let config = Config::load()?;
            config.require_providers()?;
            let policy = resolve_policy(&config, policy.as_deref(), top_k, threshold)?;
            let (generator, embedder) = create_providers(&config)?;

            let sentences = text::split_sentences(&text);
            if sentences.is_empty() {
                println!("No sentences found.");
                return Ok(());
            }

            info!(sentence_count = sentences.len(), "Split paragraph");
            println!("Analyzing {} sentences...", sentences.len());

            let pacer = RateLimiter::from_interval(config.prompt_interval);
            let reports = batch::run(
                &generator,
                &embedder,
                &sentences,
                &config.generation_model,
                &policy,
                concurrency,
                &pacer,
                false,
            )
            .await?;

            // Per-sentence token arrays, like the terse summary the report
            // view doesn't give you
            let token_arrays: Vec<&Vec<String>> =
                reports.iter().map(|r| &r.influential).collect();
            println!(
                "\nInfluential tokens by sentence:\n{}",
                serde_json::to_string_pretty(&token_arrays)?
            );
        }
    }

    Ok(())
}

/// Resolve the selection policy from the CLI flag (or the configured
/// default) plus the shared tuning flags.
fn resolve_policy(
    config: &Config,
    flag: Option<&str>,
    top_k: usize,
    threshold: Option<f64>,
) -> Result<SelectionPolicy> {
    let kind = match flag {
        Some("topk") => PolicyKind::TopK,
        Some("global") => PolicyKind::Global,
        Some(other) => anyhow::bail!("Unknown policy '{other}' (expected 'topk' or 'global')"),
        None => config.policy,
    };

    Ok(match kind {
        PolicyKind::TopK => SelectionPolicy::TopKAdaptive {
            top_k,
            threshold_fraction: threshold.unwrap_or(DEFAULT_TOP_K_FRACTION),
        },
        PolicyKind::Global => SelectionPolicy::GlobalThreshold {
            threshold_fraction: threshold.unwrap_or(DEFAULT_GLOBAL_FRACTION),
        },
    })
}

/// Construct the production providers from configuration.
fn create_providers(config: &Config) -> Result<(GroqGenerator, GeminiEmbedder)> {
    let generator = GroqGenerator::new(&config.groq_api_url, config.groq_api_key.clone())?;
    let embedder = GeminiEmbedder::new(
        &config.gemini_api_url,
        config.gemini_api_key.clone(),
        config.embedding_model.clone(),
    )?;
    Ok((generator, embedder))
}

/// Read prompts from a file (one per line, blanks skipped), or fall back to
/// the built-in demo set.
fn load_prompts(file: Option<&std::path::Path>) -> Result<Vec<String>> {
    match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
            let prompts: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            if prompts.is_empty() {
                anyhow::bail!("No prompts found in {}", path.display());
            }
            Ok(prompts)
        }
        None => Ok(batch::DEMO_PROMPTS.iter().map(|p| p.to_string()).collect()),
    }
}

fn word_count(prompt: &str) -> usize {
    linchpin::influence::variants::split_words(prompt).len()
}
