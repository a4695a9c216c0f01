//! Corpus loading and vendor-shape normalization.
//!
//! The corpus file is a JSON array of chunk records exported by the
//! offline ingestion pipeline. Record fields follow the ingestion store's
//! column names (`section_title`, `content`, `content_ko`,
//! `importance_level`, …); this module is the adapter boundary that
//! normalizes them into core [`Chunk`] values so the rest of the engine
//! never sees the upstream shape.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use cutwise_core::models::Chunk;
use cutwise_core::store::memory::MemoryStore;

/// On-disk chunk record, as exported by the ingestion pipeline.
#[derive(Debug, Deserialize)]
struct ChunkRecord {
    id: String,
    #[serde(default)]
    section_title: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    content_ko: Option<String>,
    embedding: Vec<f32>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    sub_category: Option<String>,
    #[serde(default = "default_importance")]
    importance_level: i64,
}

fn default_importance() -> i64 {
    1
}

impl From<ChunkRecord> for Chunk {
    fn from(record: ChunkRecord) -> Self {
        Chunk {
            id: record.id,
            title: record.section_title,
            text: record.content,
            text_ko: record.content_ko,
            embedding: record.embedding,
            keywords: record.keywords,
            category: record.sub_category,
            importance: record.importance_level,
        }
    }
}

/// Load the corpus file into an in-memory store.
///
/// Every record must carry an embedding of the same dimensionality as the
/// first; a disagreement is a data error in the export and is rejected at
/// load rather than surfacing later as a bad search.
pub fn load_corpus(path: &Path) -> Result<MemoryStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;

    let records: Vec<ChunkRecord> =
        serde_json::from_str(&content).with_context(|| "Failed to parse corpus file")?;

    let mut dims: Option<usize> = None;
    for record in &records {
        match dims {
            None => dims = Some(record.embedding.len()),
            Some(d) if record.embedding.len() != d => bail!(
                "corpus chunk '{}' has embedding dimension {} but the corpus uses {}",
                record.id,
                record.embedding.len(),
                d
            ),
            _ => {}
        }
    }

    let chunks: Vec<Chunk> = records.into_iter().map(Chunk::from).collect();
    tracing::debug!(chunks = chunks.len(), "corpus loaded");
    Ok(MemoryStore::new(chunks))
}

/// Chunk counts per category, for the `corpus stats` command.
pub fn category_stats(store: &MemoryStore) -> BTreeMap<String, usize> {
    let mut stats: BTreeMap<String, usize> = BTreeMap::new();
    for chunk in store.chunks() {
        let category = chunk
            .category
            .clone()
            .unwrap_or_else(|| "(uncategorized)".to_string());
        *stats.entry(category).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_corpus(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_corpus_normalizes_records() {
        let file = write_corpus(
            r#"[
                {
                    "id": "t-001",
                    "section_title": "Graduation basics",
                    "content": "Graduation stacks weight toward the perimeter.",
                    "content_ko": "그래쥬에이션은 무게를 아래쪽에 쌓는다.",
                    "embedding": [0.1, 0.2, 0.3],
                    "keywords": ["graduation", "weight"],
                    "sub_category": "graduation",
                    "importance_level": 4
                }
            ]"#,
        );

        let store = load_corpus(file.path()).unwrap();
        assert_eq!(store.chunks().len(), 1);
        let chunk = &store.chunks()[0];
        assert_eq!(chunk.id, "t-001");
        assert_eq!(chunk.title.as_deref(), Some("Graduation basics"));
        assert_eq!(chunk.category.as_deref(), Some("graduation"));
        assert_eq!(chunk.importance, 4);
        assert_eq!(store.dims(), Some(3));
    }

    #[test]
    fn test_load_corpus_rejects_mixed_dimensions() {
        let file = write_corpus(
            r#"[
                {"id": "a", "content": "x", "embedding": [0.1, 0.2]},
                {"id": "b", "content": "y", "embedding": [0.1]}
            ]"#,
        );

        let err = load_corpus(file.path()).unwrap_err();
        assert!(err.to_string().contains("dimension"));
    }

    #[test]
    fn test_load_corpus_empty_array() {
        let file = write_corpus("[]");
        let store = load_corpus(file.path()).unwrap();
        assert!(store.chunks().is_empty());
    }

    #[test]
    fn test_category_stats() {
        let file = write_corpus(
            r#"[
                {"id": "a", "content": "x", "embedding": [0.1], "sub_category": "layer"},
                {"id": "b", "content": "y", "embedding": [0.2], "sub_category": "layer"},
                {"id": "c", "content": "z", "embedding": [0.3]}
            ]"#,
        );
        let store = load_corpus(file.path()).unwrap();
        let stats = category_stats(&store);
        assert_eq!(stats.get("layer"), Some(&2));
        assert_eq!(stats.get("(uncategorized)"), Some(&1));
    }
}
