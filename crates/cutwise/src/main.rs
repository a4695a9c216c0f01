//! # Cutwise CLI
//!
//! The `cutwise` binary drives the recipe engine from the command line.
//!
//! ## Usage
//!
//! ```bash
//! cutwise --config ./config/cutwise.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cutwise search "<query>"` | Search the corpus (keyword, vector, or hybrid) |
//! | `cutwise recipe --query "..."` | Generate a recipe (or `--dry-run` to print the prompt) |
//! | `cutwise corpus stats` | Chunk counts per category |
//! | `cutwise serve` | Start the JSON HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Keyword search works without any API keys
//! cutwise search "volume crown layer" --mode keyword
//!
//! # Inspect the assembled prompt without calling the model
//! cutwise recipe --params-file style.json --language en --dry-run
//!
//! # Full generation (requires provider API keys)
//! cutwise recipe --query "shoulder-length layered cut" --language ko
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use cutwise::config::{self, Config};
use cutwise::corpus;
use cutwise::pipeline::{self, RequestContext};
use cutwise::server;
use cutwise_core::embedding::EmbeddingProvider;
use cutwise_core::models::{Language, RecipeRequest, StyleParameters};
use cutwise_core::search::tokenize_query;
use cutwise_core::store::memory::MemoryStore;
use cutwise_core::store::ChunkStore;

/// Cutwise — retrieval-grounded haircut recipe generation.
#[derive(Parser)]
#[command(
    name = "cutwise",
    about = "Retrieval-grounded haircut recipe generation",
    version,
    long_about = "Cutwise grounds model-generated haircut recipes in a corpus of styling \
    theory chunks and recipe samples via hybrid (vector + keyword) retrieval, assembles a \
    multilingual prompt, and serves the result over a CLI and JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cutwise.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus and print ranked results.
    Search {
        /// The search query string.
        query: String,

        /// Search mode: `keyword`, `vector`, or `hybrid`.
        /// Vector and hybrid modes use the configured embedding provider.
        #[arg(long, default_value = "hybrid")]
        mode: String,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Generate a haircut recipe.
    Recipe {
        /// Free-text style description or question.
        #[arg(long)]
        query: Option<String>,

        /// JSON file with structured style parameters.
        #[arg(long)]
        params_file: Option<PathBuf>,

        /// Output language: `ko`, `en`, `ja`, `zh`, or `vi`.
        #[arg(long, default_value = "ko")]
        language: String,

        /// Maximum number of context chunks to ground the recipe on.
        #[arg(long)]
        top_k: Option<usize>,

        /// Assemble and print the prompt without calling the model.
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect the corpus.
    Corpus {
        #[command(subcommand)]
        action: CorpusAction,
    },

    /// Start the JSON HTTP server.
    Serve,
}

#[derive(Subcommand)]
enum CorpusAction {
    /// Chunk counts per category.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cutwise=info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Search { query, mode, limit } => {
            run_search(&cfg, &query, &mode, limit).await?;
        }
        Commands::Recipe {
            query,
            params_file,
            language,
            top_k,
            dry_run,
        } => {
            run_recipe(&cfg, query, params_file, &language, top_k, dry_run).await?;
        }
        Commands::Corpus { action } => match action {
            CorpusAction::Stats => {
                run_stats(&cfg)?;
            }
        },
        Commands::Serve => {
            let store = corpus::load_corpus(&cfg.corpus.path)?;
            check_embedding_dims(&cfg, &store)?;
            server::run_server(&cfg, store).await?;
        }
    }

    Ok(())
}

async fn run_search(cfg: &Config, query: &str, mode: &str, limit: Option<usize>) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let store = corpus::load_corpus(&cfg.corpus.path)?;
    let final_limit = limit.unwrap_or(cfg.retrieval.final_count).max(1);

    let results = match mode {
        "keyword" => {
            let tokens = tokenize_query(query);
            store.keyword_query(&tokens, final_limit).await?
        }
        "vector" => {
            if !cfg.embedding.is_enabled() {
                bail!("Mode 'vector' requires embeddings. Set [embedding] provider in config.");
            }
            let query_vec = cutwise::embedding::embed_query(&cfg.embedding, query).await?;
            store
                .vector_query(&query_vec, cfg.retrieval.vector_threshold, final_limit)
                .await?
        }
        "hybrid" => {
            let ctx = RequestContext::new(cfg, &store);
            let (results, used_fallback) = pipeline::retrieve(&ctx, query, final_limit).await?;
            if used_fallback {
                eprintln!("(vector channel unavailable; keyword results only)");
            }
            results
        }
        other => bail!("Unknown search mode: {}. Use keyword, vector, or hybrid.", other),
    };

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        let title = result.chunk.title.as_deref().unwrap_or("(untitled)");
        let score = match (result.similarity, result.keyword_matches) {
            (Some(sim), Some(kw)) => format!("sim {:.2}, {} tokens", sim, kw),
            (Some(sim), None) => format!("sim {:.2}", sim),
            (None, Some(kw)) => format!("{} tokens", kw),
            (None, None) => String::new(),
        };
        println!("{}. [{}] {}", i + 1, score, title);
        if let Some(category) = &result.chunk.category {
            println!("    category: {}", category);
        }
        let snippet: String = result.chunk.text.chars().take(160).collect();
        println!("    excerpt: \"{}\"", snippet.replace('\n', " "));
        println!("    id: {}", result.chunk.id);
        println!();
    }

    Ok(())
}

async fn run_recipe(
    cfg: &Config,
    query: Option<String>,
    params_file: Option<PathBuf>,
    language: &str,
    top_k: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let language = Language::from_str(language).map_err(|e| anyhow::anyhow!(e))?;

    let style_parameters: Option<StyleParameters> = match params_file {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read params file: {}", path.display()))?;
            Some(serde_json::from_str(&content).with_context(|| "Failed to parse params file")?)
        }
        None => None,
    };

    if query.is_none() && style_parameters.is_none() {
        bail!("Provide --query or --params-file.");
    }

    let store = corpus::load_corpus(&cfg.corpus.path)?;
    let ctx = RequestContext::new(cfg, &store);
    let request = RecipeRequest {
        query_text: query,
        style_parameters,
        language,
        top_k,
    };

    if dry_run {
        let prepared = pipeline::prepare(&ctx, &request).await?;
        println!("{}", prepared.prompt);
        eprintln!(
            "(dry-run: {} sources, fallback: {})",
            prepared.sources_used, prepared.used_fallback
        );
        return Ok(());
    }

    let response = pipeline::generate_recipe(&ctx, &request).await?;
    println!("{}", response.recipe_text);
    eprintln!(
        "(sources: {}, fallback: {})",
        response.sources_used, response.used_fallback
    );

    Ok(())
}

/// Fail fast at startup when the configured provider cannot produce
/// vectors matching the corpus dimensionality. A mismatch here is a
/// configuration error every later vector query would hit.
fn check_embedding_dims(cfg: &Config, store: &MemoryStore) -> Result<()> {
    if !cfg.embedding.is_enabled() {
        return Ok(());
    }
    let provider = cutwise::embedding::create_provider(&cfg.embedding)?;
    if let Some(dims) = store.dims() {
        if dims != provider.dims() {
            bail!(
                "embedding.dims is {} ({}) but the corpus stores {}-dim vectors",
                provider.dims(),
                provider.model_name(),
                dims
            );
        }
    }
    Ok(())
}

fn run_stats(cfg: &Config) -> Result<()> {
    let store = corpus::load_corpus(&cfg.corpus.path)?;
    let stats = corpus::category_stats(&store);
    let total: usize = stats.values().sum();

    println!("chunks: {}", total);
    for (category, count) in &stats {
        println!("  {}: {}", category, count);
    }

    Ok(())
}
