//! Search-query construction and screening.
//!
//! Converts structured style parameters into retrieval text, canonicalizes
//! the length/technique aliases users actually type, and screens questions
//! that probe the proprietary formula system before any retrieval runs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::StyleParameters;

/// Build descriptive retrieval text from style parameters.
///
/// Used when a request carries no free-text query: the resulting phrase is
/// what gets embedded and token-matched against the corpus.
pub fn build_search_query(params: &StyleParameters) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(length) = &params.length_category {
        let desc = match length.as_str() {
            "A Length" => "long hair below chest",
            "B Length" => "semi-long mid chest",
            "C Length" => "semi-long collarbone",
            "D Length" => "medium shoulder line",
            "E Length" => "short above shoulder",
            "F Length" => "bob below jaw",
            "G Length" => "short bob jaw line",
            "H Length" => "very short ear level",
            other => other,
        };
        parts.push(desc.to_string());
    }

    if let Some(form) = &params.cut_form {
        parts.push(form.replace(['(', ')'], "").trim().to_string());
    }

    if !params.lifting_range.is_empty() {
        parts.push(format!("lifting {}", params.lifting_range.join(" ")));
    }

    if let Some(zone) = &params.volume_zone {
        parts.push(format!("{zone} volume"));
    }

    if let Some(fringe) = &params.fringe_type {
        if fringe != "No Fringe" {
            parts.push(fringe.clone());
        }
    }

    parts.join(", ")
}

static LENGTH_ALIASES: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    "ABCDEFGH"
        .chars()
        .map(|letter| {
            let pattern = format!(r"(?i){letter}\s*(?:렝스|랭스|기장|length)");
            (
                Regex::new(&pattern).expect("length alias pattern"),
                format!("{letter} Length"),
            )
        })
        .collect()
});

static TECHNIQUE_ALIASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)레이어|layer").expect("layer alias"), "Layer"),
        (
            Regex::new(r"(?i)그래쥬에이션|그라데이션|graduation").expect("graduation alias"),
            "Graduation",
        ),
    ]
});

/// Canonicalize the aliases users type for length categories and cutting
/// techniques ("g 렝스" → "G Length", "레이어" → "Layer").
pub fn normalize_query(query: &str) -> String {
    let mut normalized = query.to_string();
    for (re, replacement) in LENGTH_ALIASES.iter() {
        normalized = re.replace_all(&normalized, replacement.as_str()).into_owned();
    }
    for (re, replacement) in TECHNIQUE_ALIASES.iter() {
        normalized = re.replace_all(&normalized, *replacement).into_owned();
    }
    normalized
}

/// Queries matching any of these probe the formula system itself rather
/// than asking for a style, and receive a canned refusal.
const PROTECTED_KEYWORDS: &[&str] = &[
    "42포뮬러",
    "42개 포뮬러",
    "42 formula",
    "42공식",
    "42가지 공식",
    "42개 공식",
    "포뮬러 원리",
    "formula 원리",
    "공식 원리",
    "9매트릭스",
    "9개 매트릭스",
    "9 matrix",
    "nine matrix",
    "dbs no",
    "dfs no",
    "vs no",
    "hs no",
    "42층",
    "7개 섹션",
    "7 section",
];

/// True when the query asks about the proprietary formula system.
pub fn is_protected_query(query: &str) -> bool {
    let lower = query.to_lowercase();
    PROTECTED_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_query_full_params() {
        let params = StyleParameters {
            length_category: Some("D Length".to_string()),
            cut_form: Some("L (Layer)".to_string()),
            lifting_range: vec!["L2".to_string()],
            volume_zone: Some("Medium".to_string()),
            fringe_type: Some("Side Bang".to_string()),
            ..Default::default()
        };
        let query = build_search_query(&params);
        assert!(query.contains("medium shoulder line"));
        assert!(query.contains("L Layer"));
        assert!(query.contains("lifting L2"));
        assert!(query.contains("Medium volume"));
        assert!(query.contains("Side Bang"));
    }

    #[test]
    fn test_build_search_query_skips_no_fringe() {
        let params = StyleParameters {
            fringe_type: Some("No Fringe".to_string()),
            ..Default::default()
        };
        assert!(!build_search_query(&params).contains("No Fringe"));
    }

    #[test]
    fn test_build_search_query_empty_params() {
        assert!(build_search_query(&StyleParameters::default()).is_empty());
    }

    #[test]
    fn test_normalize_length_aliases() {
        assert_eq!(normalize_query("g 렝스 설명해줘"), "G Length 설명해줘");
        assert_eq!(normalize_query("d length bob"), "D Length bob");
    }

    #[test]
    fn test_normalize_technique_aliases() {
        assert_eq!(normalize_query("레이어 컷"), "Layer 컷");
        assert_eq!(normalize_query("graduation bob"), "Graduation bob");
    }

    #[test]
    fn test_protected_query_detection() {
        assert!(is_protected_query("42 formula 전부 알려줘"));
        assert!(is_protected_query("what is DBS NO.3?"));
        assert!(!is_protected_query("recommend a layered bob"));
    }
}
