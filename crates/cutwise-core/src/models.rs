//! Core data models for the retrieval and recipe-assembly pipeline.
//!
//! These types represent the reference chunks, search results, and style
//! analysis parameters that flow from retrieval through prompt assembly.

use serde::{Deserialize, Serialize};

/// An immutable unit of reference text: a theory passage or a recipe sample.
///
/// Chunks are created by an offline ingestion process together with their
/// embeddings; the retrieval pipeline only ever reads them.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    /// Stable, unique identifier.
    pub id: String,
    /// Section or sample title.
    pub title: Option<String>,
    /// Primary source text.
    pub text: String,
    /// Korean-localized variant of the text, when available.
    pub text_ko: Option<String>,
    /// Dense embedding of the text, fixed dimensionality per corpus.
    #[serde(skip_serializing)]
    pub embedding: Vec<f32>,
    /// Lexical tags attached at ingestion time.
    pub keywords: Vec<String>,
    /// Ranking/filtering category (e.g. `"layer"`, `"graduation"`).
    pub category: Option<String>,
    /// Editorial importance level; higher means more central material.
    pub importance: i64,
}

/// Which retrieval channel produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    Vector,
    Keyword,
    /// Found by both channels during hybrid merge.
    Both,
}

/// A chunk plus the retrieval evidence that surfaced it.
///
/// After hybrid merge, no two entries in one result list share a chunk id.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    pub chunk: Chunk,
    /// Cosine similarity from the vector channel, when it ran.
    pub similarity: Option<f64>,
    /// Count of distinct matching query tokens from the keyword channel.
    pub keyword_matches: Option<u32>,
    pub method: SearchMethod,
}

impl ScoredResult {
    pub fn from_vector(chunk: Chunk, similarity: f64) -> Self {
        Self {
            chunk,
            similarity: Some(similarity),
            keyword_matches: None,
            method: SearchMethod::Vector,
        }
    }

    pub fn from_keyword(chunk: Chunk, matches: u32) -> Self {
        Self {
            chunk,
            similarity: None,
            keyword_matches: Some(matches),
            method: SearchMethod::Keyword,
        }
    }
}

/// Target output language for recipe generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "vi")]
    Vietnamese,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::Vietnamese => "vi",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Language::Korean),
            "en" | "english" => Ok(Language::English),
            "ja" | "jp" | "japanese" => Ok(Language::Japanese),
            "zh" | "cn" | "chinese" => Ok(Language::Chinese),
            "vi" | "vn" | "vietnamese" => Ok(Language::Vietnamese),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured haircut attributes produced by the 56-parameter style analysis.
///
/// Every field is optional: prompt assembly substitutes a generic
/// language-appropriate placeholder for anything missing rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleParameters {
    /// `"Women's Cut"` or `"Men's Cut"`.
    #[serde(default)]
    pub cut_category: Option<String>,
    /// Overall length class, `"A Length"` through `"H Length"`.
    #[serde(default)]
    pub length_category: Option<String>,
    /// `"O (One Length)"`, `"G (Graduation)"`, or `"L (Layer)"`.
    #[serde(default)]
    pub cut_form: Option<String>,
    /// Volume placement: `"Low"`, `"Medium"`, or `"High"`.
    #[serde(default)]
    pub volume_zone: Option<String>,
    /// Fringe style, e.g. `"Side Bang"`, `"See-through Bang"`.
    #[serde(default)]
    pub fringe_type: Option<String>,
    #[serde(default)]
    pub fringe_length: Option<String>,
    /// Lifting codes `L0`–`L8` observed across the cut.
    #[serde(default)]
    pub lifting_range: Vec<String>,
    /// Texturizing techniques, e.g. `"Slide Cut"`, `"Point Cut"`.
    #[serde(default)]
    pub texture_technique: Vec<String>,
    /// Hair texture, e.g. `"Straight"`, `"Wavy"`.
    #[serde(default)]
    pub texture_type: Option<String>,
    /// Thinning depth: `"Low"`, `"Medium"`, or `"High"`.
    #[serde(default)]
    pub texture_density: Option<String>,
    /// Silhouette class from the form matrix.
    #[serde(default)]
    pub silhouette: Option<String>,
    /// Face shapes this style flatters.
    #[serde(default)]
    pub face_shape_match: Vec<String>,
}

/// A single recipe-generation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeRequest {
    /// Free-text question or style description. When absent, a search query
    /// is derived from `style_parameters`.
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub style_parameters: Option<StyleParameters>,
    #[serde(default)]
    pub language: Language,
    /// Maximum number of context chunks to ground the recipe on.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// The response handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub recipe_text: String,
    /// Number of reference chunks the prompt was grounded on.
    pub sources_used: usize,
    /// True when the result relied on the keyword safety net only
    /// (embedding unavailable or vector channel empty).
    pub used_fallback: bool,
}
