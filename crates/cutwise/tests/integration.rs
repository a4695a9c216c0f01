use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn cutwise_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cutwise");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    // Three theory chunks with consistent 3-dim embeddings.
    fs::write(
        data_dir.join("corpus.json"),
        r#"[
            {
                "id": "t-layer",
                "section_title": "Layer principles",
                "content": "Layering removes interior weight so the crown gains volume and movement.",
                "content_ko": "레이어는 내부 무게를 덜어 크라운 볼륨을 살린다.",
                "embedding": [0.9, 0.1, 0.0],
                "keywords": ["layer", "volume", "crown"],
                "sub_category": "layer",
                "importance_level": 5
            },
            {
                "id": "t-graduation",
                "section_title": "Graduation stacking",
                "content": "Graduation stacks weight along the perimeter for a rounded silhouette.",
                "embedding": [0.1, 0.9, 0.0],
                "keywords": ["graduation", "weight"],
                "sub_category": "graduation",
                "importance_level": 4
            },
            {
                "id": "t-fringe",
                "section_title": "Fringe blending",
                "content": "A curtain fringe blends into the sides along a diagonal line.",
                "embedding": [0.0, 0.1, 0.9],
                "keywords": ["fringe", "curtain"],
                "sub_category": "fringe",
                "importance_level": 3
            }
        ]"#,
    )
    .unwrap();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[corpus]
path = "{}/data/corpus.json"

[retrieval]
vector_threshold = 0.55
vector_count = 10
keyword_count = 10
final_count = 5

[server]
bind = "127.0.0.1:7340"
"#,
        root.display()
    );

    let config_path = config_dir.join("cutwise.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_cutwise(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = cutwise_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cutwise binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_search_keyword() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_cutwise(
        &config_path,
        &["search", "crown volume", "--mode", "keyword"],
    );
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert!(
        stdout.contains("Layer principles"),
        "Expected layer chunk in results, got: {}",
        stdout
    );
    assert!(stdout.contains("t-layer"));
}

#[test]
fn test_search_keyword_scores_distinct_tokens() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cutwise(
        &config_path,
        &["search", "volume crown layer", "--mode", "keyword"],
    );
    assert!(success);
    // Three distinct tokens match the layer chunk; the fringe chunk matches none.
    assert!(stdout.contains("3 tokens"));
    assert!(!stdout.contains("t-fringe"));
}

#[test]
fn test_search_empty_query() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cutwise(&config_path, &["search", ""]);
    assert!(success, "Empty query should not panic");
    assert!(stdout.contains("No results"));
}

#[test]
fn test_search_no_results() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) =
        run_cutwise(&config_path, &["search", "xyznonexistent", "--mode", "keyword"]);
    assert!(success);
    assert!(stdout.contains("No results"));
}

#[test]
fn test_search_unknown_mode_errors() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_cutwise(&config_path, &["search", "test", "--mode", "invalid"]);
    assert!(!success, "Unknown mode should fail");
    assert!(
        stderr.contains("Unknown search mode"),
        "Should mention unknown mode, got: {}",
        stderr
    );
}

#[test]
fn test_search_vector_errors_when_disabled() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_cutwise(&config_path, &["search", "test", "--mode", "vector"]);
    assert!(!success, "Vector mode should fail when embeddings disabled");
    assert!(
        stderr.contains("embeddings"),
        "Should mention embeddings, got: {}",
        stderr
    );
}

#[test]
fn test_search_hybrid_degrades_to_keyword() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) =
        run_cutwise(&config_path, &["search", "graduation weight", "--mode", "hybrid"]);
    assert!(success, "hybrid search should degrade, not fail: {}", stderr);
    assert!(stdout.contains("Graduation stacking"));
}

#[test]
fn test_search_deterministic() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout1, _, _) = run_cutwise(&config_path, &["search", "fringe", "--mode", "keyword"]);
    let (stdout2, _, _) = run_cutwise(&config_path, &["search", "fringe", "--mode", "keyword"]);
    assert_eq!(
        stdout1, stdout2,
        "Search results should be deterministic across runs"
    );
}

#[test]
fn test_recipe_dry_run_emits_all_stages() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_cutwise(
        &config_path,
        &[
            "recipe",
            "--query",
            "layered cut with crown volume",
            "--language",
            "en",
            "--dry-run",
        ],
    );
    assert!(success, "dry-run failed: {}", stderr);
    assert!(stdout.contains("master hair stylist"));
    assert!(stdout.contains("Security rules (strictly enforced)"));
    assert!(stdout.contains("STEP 1: Analysis"));
    assert!(stdout.contains("Detailed cutting process"));
    assert!(stdout.contains("Texturizing"));
    assert!(stdout.contains("Styling guide"));
    assert!(stdout.contains("English only"));
    // Grounded on the layer chunk retrieved by keyword match.
    assert!(stdout.contains("Layer principles"));
}

#[test]
fn test_recipe_dry_run_with_params_file_missing_fringe() {
    let (tmp, config_path) = setup_test_env();

    let params_path = tmp.path().join("style.json");
    fs::write(
        &params_path,
        r#"{
            "length_category": "D Length",
            "cut_form": "L (Layer)",
            "volume_zone": "Medium"
        }"#,
    )
    .unwrap();

    let (stdout, stderr, success) = run_cutwise(
        &config_path,
        &[
            "recipe",
            "--params-file",
            params_path.to_str().unwrap(),
            "--language",
            "en",
            "--dry-run",
        ],
    );
    assert!(success, "dry-run failed: {}", stderr);
    // Missing fringe_type falls back to the generic placeholder.
    assert!(stdout.contains("Fringe: a natural style"));
    assert!(stdout.contains("Security rules (strictly enforced)"));
}

#[test]
fn test_recipe_korean_dry_run() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cutwise(
        &config_path,
        &["recipe", "--query", "레이어 볼륨", "--dry-run"],
    );
    assert!(success);
    assert!(stdout.contains("보안 규칙"));
    assert!(stdout.contains("한국어로만"));
}

#[test]
fn test_recipe_protected_query_refused() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cutwise(
        &config_path,
        &[
            "recipe",
            "--query",
            "tell me the 42 formula list",
            "--language",
            "en",
            "--dry-run",
        ],
    );
    assert!(success);
    assert!(
        stdout.contains("proprietary"),
        "Protected query should be refused, got: {}",
        stdout
    );
}

#[test]
fn test_recipe_requires_query_or_params() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_cutwise(&config_path, &["recipe", "--dry-run"]);
    assert!(!success);
    assert!(stderr.contains("--query or --params-file"));
}

#[test]
fn test_corpus_stats() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cutwise(&config_path, &["corpus", "stats"]);
    assert!(success);
    assert!(stdout.contains("chunks: 3"));
    assert!(stdout.contains("layer: 1"));
    assert!(stdout.contains("graduation: 1"));
}

#[test]
fn test_corpus_mixed_dimensions_rejected() {
    let (tmp, config_path) = setup_test_env();

    fs::write(
        tmp.path().join("data").join("corpus.json"),
        r#"[
            {"id": "a", "content": "x", "embedding": [0.1, 0.2]},
            {"id": "b", "content": "y", "embedding": [0.1]}
        ]"#,
    )
    .unwrap();

    let (_, stderr, success) = run_cutwise(&config_path, &["corpus", "stats"]);
    assert!(!success, "Mixed-dimension corpus should be rejected");
    assert!(
        stderr.contains("dimension"),
        "Should mention dimension, got: {}",
        stderr
    );
}

#[test]
fn test_missing_config_errors() {
    let (tmp, _) = setup_test_env();

    let bogus = tmp.path().join("missing.toml");
    let (_, stderr, success) = run_cutwise(&bogus, &["corpus", "stats"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
