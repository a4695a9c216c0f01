//! Request orchestration: screen → embed → retrieve → assemble → generate.
//!
//! Each request is handled independently against the read-only chunk store;
//! all per-request state lives in an explicit [`RequestContext`] rather
//! than process-wide globals. The vector and keyword searches are
//! independent of each other and run concurrently, joining before the
//! hybrid merge. The keyword channel always runs — similarity thresholds
//! may legitimately exclude everything, so it is a safety net, not an
//! error path.
//!
//! Degradation policy: a failed embedding call is logged and absorbed by
//! falling back to keyword-only retrieval; an empty result set still
//! produces a best-effort prompt; only configuration errors and the final
//! generation call surface to the caller.

use cutwise_core::error::{EngineError, RetrievalError};
use cutwise_core::models::{Language, RecipeRequest, RecipeResponse, ScoredResult, StyleParameters};
use cutwise_core::prompt::build_prompt;
use cutwise_core::query::{build_search_query, is_protected_query, normalize_query};
use cutwise_core::sanitize::redact_recipe;
use cutwise_core::search::{merge, tokenize_query};
use cutwise_core::store::ChunkStore;
use cutwise_core::terms::terms;

use crate::config::Config;
use crate::embedding::embed_query;
use crate::generation;

/// Per-request state handed to every pipeline step.
pub struct RequestContext<'a> {
    pub request_id: String,
    pub config: &'a Config,
    pub store: &'a dyn ChunkStore,
}

impl<'a> RequestContext<'a> {
    pub fn new(config: &'a Config, store: &'a dyn ChunkStore) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            config,
            store,
        }
    }
}

/// Everything needed to answer a request, short of calling the model.
pub struct PreparedRequest {
    pub language: Language,
    pub prompt: String,
    pub sources_used: usize,
    pub used_fallback: bool,
    /// Set when the query probed the proprietary formula system; `prompt`
    /// then holds the canned refusal and generation must be skipped.
    pub refusal: bool,
}

/// Run hybrid retrieval for a query string.
///
/// Returns the merged results and whether the lexical safety net was the
/// only contributor (embedding failed or the vector channel came back
/// empty while keyword hits exist).
pub async fn retrieve(
    ctx: &RequestContext<'_>,
    query: &str,
    final_limit: usize,
) -> Result<(Vec<ScoredResult>, bool), EngineError> {
    let retrieval = &ctx.config.retrieval;
    let query = normalize_query(query);
    let tokens = tokenize_query(&query);

    let query_vec = if ctx.config.embedding.is_enabled() {
        match embed_query(&ctx.config.embedding, &query).await {
            Ok(vec) => Some(vec),
            Err(EngineError::EmbeddingUnavailable(reason)) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    %reason,
                    "embedding unavailable, degrading to keyword-only retrieval"
                );
                None
            }
            Err(other) => return Err(other),
        }
    } else {
        None
    };
    let embed_failed = query_vec.is_none();

    let vector_fut = async {
        match &query_vec {
            Some(vec) => {
                ctx.store
                    .vector_query(vec, retrieval.vector_threshold, retrieval.vector_count)
                    .await
            }
            None => Ok(Vec::new()),
        }
    };
    let keyword_fut = ctx.store.keyword_query(&tokens, retrieval.keyword_count);

    let (vector_results, keyword_results) = tokio::join!(vector_fut, keyword_fut);
    let vector_results = vector_results.map_err(fatal_retrieval)?;
    let keyword_results = keyword_results.map_err(fatal_retrieval)?;

    tracing::debug!(
        request_id = %ctx.request_id,
        vector = vector_results.len(),
        keyword = keyword_results.len(),
        "retrieval channels joined"
    );

    let vector_empty = vector_results.is_empty();
    let merged = merge(vector_results, keyword_results, final_limit);
    let used_fallback = embed_failed || (vector_empty && !merged.is_empty());

    Ok((merged, used_fallback))
}

/// A dimension mismatch is a configuration/data error: surface it as fatal
/// rather than degrading, since retrying cannot fix the corpus.
fn fatal_retrieval(err: RetrievalError) -> EngineError {
    match err {
        RetrievalError::DimensionMismatch { .. } => EngineError::Configuration(err.to_string()),
        other => EngineError::Retrieval(other),
    }
}

/// Resolve retrieval text and assemble the prompt, without generating.
pub async fn prepare(
    ctx: &RequestContext<'_>,
    request: &RecipeRequest,
) -> Result<PreparedRequest, EngineError> {
    let language = request.language;
    let params = request.style_parameters.clone().unwrap_or_default();

    let query = match &request.query_text {
        Some(text) if !text.trim().is_empty() => text.clone(),
        _ => build_search_query(&params),
    };

    if is_protected_query(&query) {
        tracing::info!(request_id = %ctx.request_id, "protected query screened");
        return Ok(PreparedRequest {
            language,
            prompt: terms(language).refusal.to_string(),
            sources_used: 0,
            used_fallback: false,
            refusal: true,
        });
    }

    let final_limit = request
        .top_k
        .unwrap_or(ctx.config.retrieval.final_count)
        .max(1);

    let (results, used_fallback) = if query.trim().is_empty() {
        // Nothing to search with; assembly falls back to the fixed
        // procedural flow.
        (Vec::new(), false)
    } else {
        retrieve(ctx, &query, final_limit).await?
    };

    let prompt = build_prompt(language, &params, &results);

    Ok(PreparedRequest {
        language,
        prompt,
        sources_used: results.len(),
        used_fallback,
        refusal: false,
    })
}

/// Full pipeline: prepare, generate, redact.
pub async fn generate_recipe(
    ctx: &RequestContext<'_>,
    request: &RecipeRequest,
) -> Result<RecipeResponse, EngineError> {
    let prepared = prepare(ctx, request).await?;

    if prepared.refusal {
        return Ok(RecipeResponse {
            recipe_text: prepared.prompt,
            sources_used: 0,
            used_fallback: false,
        });
    }

    let raw = generation::generate(&ctx.config.generation, &prepared.prompt, prepared.language)
        .await?;
    let recipe_text = redact_recipe(&raw, prepared.language);

    tracing::info!(
        request_id = %ctx.request_id,
        sources = prepared.sources_used,
        fallback = prepared.used_fallback,
        "recipe generated"
    );

    Ok(RecipeResponse {
        recipe_text,
        sources_used: prepared.sources_used,
        used_fallback: prepared.used_fallback,
    })
}

/// Convenience for callers that only have style parameters.
pub fn request_from_params(params: StyleParameters, language: Language) -> RecipeRequest {
    RecipeRequest {
        query_text: None,
        style_parameters: Some(params),
        language,
        top_k: None,
    }
}
