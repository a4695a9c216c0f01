//! Query tokenization and hybrid result merging.
//!
//! The two retrieval channels are independent: the application issues the
//! vector and keyword queries concurrently and joins them here. Merging
//! follows a two-tier policy — vector-confirmed relevance outranks
//! lexical-only relevance, since substring matching on short tokens is the
//! noisier signal:
//!
//! 1. Union the two lists by chunk id; a chunk found by both channels keeps
//!    one entry carrying both scores.
//! 2. Vector-sourced hits come first, ordered by similarity (desc), then
//!    keyword match count (desc), then id (asc).
//! 3. Keyword-only hits are appended, ordered by match count (desc), then
//!    id (asc).
//! 4. Truncate to `final_limit`.

use std::collections::HashMap;

use crate::models::{ScoredResult, SearchMethod};

/// Split query text into lowercased search tokens.
///
/// Tokens are whitespace-separated; tokens shorter than 2 characters are
/// dropped and duplicates are removed (first occurrence wins), so keyword
/// scores count *distinct* matching tokens.
pub fn tokenize_query(text: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let token = token.to_lowercase();
        if token.chars().count() < 2 {
            continue;
        }
        if !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen
}

/// Merge vector and keyword result lists into one ranked, deduplicated list.
pub fn merge(
    vector_results: Vec<ScoredResult>,
    keyword_results: Vec<ScoredResult>,
    final_limit: usize,
) -> Vec<ScoredResult> {
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut primary: Vec<ScoredResult> = Vec::with_capacity(vector_results.len());

    for result in vector_results {
        by_id.insert(result.chunk.id.clone(), primary.len());
        primary.push(result);
    }

    let mut keyword_only: Vec<ScoredResult> = Vec::new();
    for result in keyword_results {
        match by_id.get(&result.chunk.id) {
            Some(&idx) => {
                // Present in both channels: record the keyword evidence on
                // the vector entry, keeping the chunk once.
                primary[idx].keyword_matches = result.keyword_matches;
                primary[idx].method = SearchMethod::Both;
            }
            None => keyword_only.push(result),
        }
    }

    primary.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.keyword_matches.cmp(&a.keyword_matches))
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });
    keyword_only.sort_by(|a, b| {
        b.keyword_matches
            .cmp(&a.keyword_matches)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });

    primary.extend(keyword_only);
    primary.truncate(final_limit);
    primary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;

    fn chunk(id: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            title: None,
            text: String::new(),
            text_ko: None,
            embedding: Vec::new(),
            keywords: Vec::new(),
            category: None,
            importance: 1,
        }
    }

    #[test]
    fn test_tokenize_drops_short_and_duplicates() {
        let tokens = tokenize_query("a volume Volume crown b layer");
        assert_eq!(tokens, vec!["volume", "crown", "layer"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize_query("").is_empty());
        assert!(tokenize_query("a b c").is_empty());
    }

    #[test]
    fn test_merge_vector_confirmed_outranks_keyword_only() {
        // X found by vector (0.9); Y excluded by the vector threshold but
        // found by keyword (3 matches); Z keyword-only (1 match).
        let vector = vec![ScoredResult::from_vector(chunk("x"), 0.9)];
        let keyword = vec![
            ScoredResult::from_keyword(chunk("y"), 3),
            ScoredResult::from_keyword(chunk("z"), 1),
        ];

        let merged = merge(vector, keyword, 3);
        let ids: Vec<&str> = merged.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_merge_deduplicates_and_keeps_both_scores() {
        let vector = vec![
            ScoredResult::from_vector(chunk("a"), 0.8),
            ScoredResult::from_vector(chunk("b"), 0.7),
        ];
        let keyword = vec![
            ScoredResult::from_keyword(chunk("b"), 4),
            ScoredResult::from_keyword(chunk("c"), 2),
        ];

        let merged = merge(vector, keyword, 10);
        let ids: Vec<&str> = merged.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let b = &merged[1];
        assert_eq!(b.method, SearchMethod::Both);
        assert_eq!(b.similarity, Some(0.7));
        assert_eq!(b.keyword_matches, Some(4));

        // Dedup invariant: no id appears twice.
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_merge_keyword_count_breaks_similarity_ties() {
        let vector = vec![
            ScoredResult::from_vector(chunk("p"), 0.75),
            ScoredResult::from_vector(chunk("q"), 0.75),
        ];
        let keyword = vec![ScoredResult::from_keyword(chunk("q"), 2)];

        let merged = merge(vector, keyword, 10);
        assert_eq!(merged[0].chunk.id, "q");
        assert_eq!(merged[1].chunk.id, "p");
    }

    #[test]
    fn test_merge_truncates_to_final_limit() {
        let vector = vec![
            ScoredResult::from_vector(chunk("a"), 0.9),
            ScoredResult::from_vector(chunk("b"), 0.8),
        ];
        let keyword = vec![ScoredResult::from_keyword(chunk("c"), 1)];

        let merged = merge(vector, keyword, 2);
        let ids: Vec<&str> = merged.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_merge_both_empty() {
        assert!(merge(Vec::new(), Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_merge_keyword_only_ordered_by_score_then_id() {
        let keyword = vec![
            ScoredResult::from_keyword(chunk("n"), 1),
            ScoredResult::from_keyword(chunk("m"), 1),
            ScoredResult::from_keyword(chunk("k"), 3),
        ];
        let merged = merge(Vec::new(), keyword, 10);
        let ids: Vec<&str> = merged.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["k", "m", "n"]);
    }
}
