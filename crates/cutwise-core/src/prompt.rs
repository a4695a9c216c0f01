//! Deterministic multilingual prompt assembly.
//!
//! One builder serves every supported language, driven by the term tables
//! in [`crate::terms`]. Assembly is total: missing style parameters are
//! replaced by the language's generic placeholder, unknown enum values pass
//! through unchanged, and an empty retrieval result falls back to a fixed
//! five-stage procedure, so a prompt is always produced for the best-effort
//! generation step downstream.
//!
//! Every prompt carries the same six structural stages, in order: role
//! header, security rules, analysis summary, cutting procedure, the
//! texturizing/styling/advisory templates, and the closing instruction
//! pinning the output language.

use std::fmt::Write;

use crate::models::{Language, ScoredResult, StyleParameters};
use crate::terms::{face_shape_desc, form_desc, fringe_desc, length_desc, terms, volume_desc};

/// Reference excerpt length per procedure sub-block.
const EXCERPT_CHARS: usize = 300;

/// Maximum number of retrieved chunks rendered into the procedure section.
const MAX_PROCEDURE_BLOCKS: usize = 8;

/// Build the generation prompt for one request.
pub fn build_prompt(
    language: Language,
    params: &StyleParameters,
    retrieved: &[ScoredResult],
) -> String {
    let t = terms(language);
    let mut out = String::with_capacity(2048);

    // Stage 1: role framing.
    out.push_str(t.role_header);
    out.push_str("\n\n");

    // Stage 2: security rules, identical for every request in a language.
    out.push_str(t.security_rules);
    out.push_str("\n\n");

    // Stage 3: localized analysis summary.
    push_analysis(&mut out, language, params);

    // Stage 4: cutting procedure, one sub-block per retrieved chunk or the
    // fixed five-stage flow when retrieval came back empty.
    push_procedure(&mut out, language, params, retrieved);

    // Stage 5: texturizing, styling, and advisory templates.
    push_texturizing(&mut out, language, params);
    push_styling(&mut out, language, params);
    push_advisory(&mut out, language, params);

    // Stage 6: pin the output language, forbid meta-commentary.
    out.push_str(t.closing);
    out.push('\n');

    out
}

/// Localize an optional enum value: term-table lookup first, raw value if
/// the lookup misses, the generic placeholder if the field is absent.
fn localized<'a>(
    language: Language,
    value: &'a Option<String>,
    lookup: fn(Language, &str) -> Option<&'static str>,
) -> &'a str {
    match value {
        Some(v) => lookup(language, v).unwrap_or(v),
        None => terms(language).placeholder,
    }
}

fn push_analysis(out: &mut String, language: Language, params: &StyleParameters) {
    let t = terms(language);
    let _ = writeln!(out, "### STEP 1: {}", t.heading_analysis);

    let _ = writeln!(
        out,
        "- {}: {}",
        t.label_length,
        localized(language, &params.length_category, length_desc)
    );
    let _ = writeln!(
        out,
        "- {}: {}",
        t.label_form,
        localized(language, &params.cut_form, form_desc)
    );
    let _ = writeln!(
        out,
        "- {}: {}",
        t.label_volume,
        localized(language, &params.volume_zone, volume_desc)
    );
    let _ = writeln!(
        out,
        "- {}: {}",
        t.label_fringe,
        localized(language, &params.fringe_type, fringe_desc)
    );

    let texture = if params.texture_technique.is_empty() {
        t.placeholder.to_string()
    } else {
        params.texture_technique.join(", ")
    };
    let _ = writeln!(out, "- {}: {}", t.label_texture, texture);

    let silhouette = params.silhouette.as_deref().unwrap_or(t.placeholder);
    let _ = writeln!(out, "- {}: {}", t.label_silhouette, silhouette);

    if !params.lifting_range.is_empty() {
        let _ = writeln!(
            out,
            "- {}: {}",
            t.label_lifting,
            lifting_desc(&params.lifting_range)
        );
    }
    out.push('\n');
}

/// Human-readable angle band for the dominant lifting code.
fn lifting_desc(range: &[String]) -> &'static str {
    match range.first().map(String::as_str) {
        Some("L0") | Some("L1") => "0-22.5°",
        Some("L2") | Some("L3") => "45-67.5°",
        _ => "90°+",
    }
}

/// Technique split for the overall form: blunt-heavy for one-length,
/// graduation or layer dominant otherwise.
fn technique_ratio(params: &StyleParameters) -> &'static str {
    match params.cut_form.as_deref().map(|f| f.chars().next()) {
        Some(Some('G')) => "Graduation 60% + Slide Cut 40%",
        Some(Some('L')) => "Layer 65% + Point Cut 35%",
        _ => "Blunt Cut 70% + Point Cut 30%",
    }
}

fn push_procedure(
    out: &mut String,
    language: Language,
    params: &StyleParameters,
    retrieved: &[ScoredResult],
) {
    let t = terms(language);
    let _ = writeln!(out, "### STEP 2: {}", t.heading_procedure);
    out.push('\n');

    let goal = localized(language, &params.volume_zone, volume_desc);
    let ratio = technique_ratio(params);
    let lifting = if params.lifting_range.is_empty() {
        t.redact.angle_phrase
    } else {
        lifting_desc(&params.lifting_range)
    };

    if retrieved.is_empty() {
        for (idx, stage) in t.default_stages.iter().enumerate() {
            let _ = writeln!(out, "**[{}. {}]**", idx + 1, stage);
            let _ = writeln!(out, "- {}: 1-2cm", t.label_sectioning);
            let _ = writeln!(out, "- {}: {}", t.label_lifting, lifting);
            let _ = writeln!(out, "- {}: {}", t.label_technique, ratio);
            let _ = writeln!(out, "- {}: {}", t.label_goal, goal);
            out.push('\n');
        }
        return;
    }

    for (idx, result) in retrieved.iter().take(MAX_PROCEDURE_BLOCKS).enumerate() {
        let stage_name = result
            .chunk
            .title
            .as_deref()
            .unwrap_or(t.default_stages[idx % t.default_stages.len()]);
        let _ = writeln!(out, "**[{}. {}]**", idx + 1, stage_name);
        let _ = writeln!(out, "- {}: 1-2cm", t.label_sectioning);
        let _ = writeln!(out, "- {}: {}", t.label_lifting, lifting);
        let _ = writeln!(out, "- {}: {}", t.label_technique, ratio);
        let _ = writeln!(out, "- {}: {}", t.label_goal, goal);

        let reference = excerpt(preferred_text(language, result), EXCERPT_CHARS);
        match result.similarity {
            Some(sim) => {
                let _ = writeln!(
                    out,
                    "- {}: {} ({:.0}%)",
                    t.label_reference,
                    reference,
                    sim * 100.0
                );
            }
            None => {
                let _ = writeln!(out, "- {}: {}", t.label_reference, reference);
            }
        }
        out.push('\n');
    }
}

/// Prefer the Korean variant for Korean output when the chunk carries one.
fn preferred_text(language: Language, result: &ScoredResult) -> &str {
    if language == Language::Korean {
        if let Some(ko) = &result.chunk.text_ko {
            return ko;
        }
    }
    &result.chunk.text
}

/// Char-boundary-safe excerpt with whitespace collapsed to single spaces.
fn excerpt(text: &str, max_chars: usize) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

fn push_texturizing(out: &mut String, language: Language, params: &StyleParameters) {
    let t = terms(language);
    let _ = writeln!(out, "### STEP 3: {}", t.heading_texturizing);

    let technique = if params.texture_technique.is_empty() {
        "Point Cut 30%".to_string()
    } else {
        params
            .texture_technique
            .iter()
            .map(|tech| format!("{tech} 30-40%"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "- {}: {}", t.label_technique, technique);

    let depth = match params.texture_density.as_deref() {
        Some("High") => "1-2cm",
        Some("Low") => "3-4cm",
        _ => "2-3cm",
    };
    let _ = writeln!(out, "- {}: {}", t.label_sectioning, depth);
    out.push('\n');
}

fn push_styling(out: &mut String, language: Language, params: &StyleParameters) {
    let t = terms(language);
    let _ = writeln!(out, "### STEP 4: {}", t.heading_styling);

    let volume = localized(language, &params.volume_zone, volume_desc);
    let _ = writeln!(out, "- {}: {}", t.label_volume, volume);

    let texture = params.texture_type.as_deref().unwrap_or(t.placeholder);
    let _ = writeln!(out, "- {}: {}", t.label_texture, texture);
    out.push('\n');
}

fn push_advisory(out: &mut String, language: Language, params: &StyleParameters) {
    let t = terms(language);
    let _ = writeln!(out, "### STEP 5: {}", t.heading_advisory);

    let shapes = if params.face_shape_match.is_empty() {
        t.placeholder.to_string()
    } else {
        params
            .face_shape_match
            .iter()
            .map(|s| face_shape_desc(language, s).unwrap_or(s.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "- {}: {}", t.label_face_shapes, shapes);

    let trim = match params.length_category.as_deref() {
        Some("G Length") | Some("H Length") => "3-4",
        Some("E Length") | Some("F Length") => "4-6",
        _ => "6-8",
    };
    let _ = writeln!(out, "- {}: {} {}", t.label_trim_cycle, trim, t.unit_weeks);
    out.push('\n');
}
