//! Post-generation redaction of internal codes.
//!
//! The generation model is instructed never to surface formula codes, angle
//! codes, or structural taxonomy names, but the instruction alone is not a
//! guarantee. This pass rewrites anything that leaked into the generated
//! text, replacing each protected code family with its public effect
//! description in the output language, and stripping book-page citations.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Language;
use crate::terms::terms;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("redaction pattern")
}

// Formula codes.
static DBS_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)DBS\s+NO\.?\s*\d+"));
static DFS_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)DFS\s+NO\.?\s*\d+"));
static VS_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)VS\s+NO\.?\s*\d+"));
static HS_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)HS\s+NO\.?\s*\d+"));
static UPSTEM_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)UP[\s-]?STEM\s+NO\.?\s*\d+"));
static NAPE_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)NAPE\s+ZONE\s+NO\.?\s*\d+"));

// Section taxonomy names.
static HORIZONTAL_SECTION: Lazy<Regex> = Lazy::new(|| re(r"(?i)가로섹션|Horizontal\s+Section"));
static DIAG_BACK_SECTION: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)후대각섹션|Diagonal\s+Backward\s+Section"));
static DIAG_FRONT_SECTION: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)전대각섹션|Diagonal\s+Forward\s+Section"));
static VERTICAL_SECTION: Lazy<Regex> = Lazy::new(|| re(r"(?i)세로섹션|Vertical\s+Section"));
static NAPE_ZONE: Lazy<Regex> = Lazy::new(|| re(r"(?i)네이프존|Nape\s+Zone"));
static UP_STEM: Lazy<Regex> = Lazy::new(|| re(r"(?i)업스템|Up[\s-]?Stem"));
static BACK_ZONE: Lazy<Regex> = Lazy::new(|| re(r"(?i)백존|Back\s+Zone"));

// Lifting/direction codes with their angle annotations.
static LIFT_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)L[0-8]\s*\([^)]*\)"));
static DIRECTION_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)D[0-8]\s*\([^)]*\)"));

// Structure counts and matrix taxonomy.
static LAYER_42: Lazy<Regex> = Lazy::new(|| re(r"(?i)42층|42\s+layers?|42-layer"));
static LAYER_STRUCTURE: Lazy<Regex> = Lazy::new(|| re(r"\d+층\s+구조"));
static MATRIX_9: Lazy<Regex> = Lazy::new(|| re(r"(?i)9개\s+매트릭스|9\s+matrix|nine\s+matrix"));
static MATRIX_CODE: Lazy<Regex> = Lazy::new(|| re(r"(?i)매트릭스\s+코드|matrix\s+code"));
static SECTION_7: Lazy<Regex> = Lazy::new(|| re(r"(?i)7개\s+섹션|7개\s+존|7\s+sections?|7\s+zones?"));

// Book-page citations.
static BOOK_CITATION: Lazy<Regex> =
    Lazy::new(|| re(r"(?i)\((?:2WAY\s+CUT\s+)?Book\s+[A-E],\s+(?:p\.|Page)\s*\d+\)"));

/// Rewrite generated recipe text so no internal code survives.
pub fn redact_recipe(text: &str, language: Language) -> String {
    let r = &terms(language).redact;

    let replacements: [(&Lazy<Regex>, &str); 21] = [
        (&DBS_CODE, r.back_technique),
        (&DFS_CODE, r.front_technique),
        (&VS_CODE, r.center_technique),
        (&HS_CODE, r.top_technique),
        (&UPSTEM_CODE, r.crown_technique),
        (&NAPE_CODE, r.nape_technique),
        (&HORIZONTAL_SECTION, r.upper_part),
        (&DIAG_BACK_SECTION, r.back_part),
        (&DIAG_FRONT_SECTION, r.front_part),
        (&VERTICAL_SECTION, r.center_part),
        (&NAPE_ZONE, r.nape_part),
        (&UP_STEM, r.crown_part),
        (&BACK_ZONE, r.back_part),
        (&LIFT_CODE, r.angle_phrase),
        (&DIRECTION_CODE, r.direction_phrase),
        (&LAYER_42, r.systematic_structure),
        (&LAYER_STRUCTURE, r.systematic_structure),
        (&MATRIX_9, r.professional_classification),
        (&MATRIX_CODE, r.professional_classification),
        (&SECTION_7, r.systematic_structure),
        (&BOOK_CITATION, ""),
    ];

    let mut out = text.to_string();
    for (pattern, replacement) in replacements {
        out = pattern.replace_all(&out, replacement).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_formula_codes() {
        let text = "Start with DBS NO.3, then apply VS NO. 6 at the center.";
        let out = redact_recipe(text, Language::English);
        assert!(!out.contains("DBS"));
        assert!(!out.contains("VS NO"));
        assert!(out.contains("back technique"));
        assert!(out.contains("center technique"));
    }

    #[test]
    fn test_redacts_angle_codes_keeps_surroundings() {
        let text = "Lift at L2(45°) toward D4(180°).";
        let out = redact_recipe(text, Language::English);
        assert!(!out.contains("L2"));
        assert!(!out.contains("D4"));
        assert!(out.contains("at a suitable angle"));
        assert!(out.contains("in a natural direction"));
    }

    #[test]
    fn test_redacts_section_names_localized() {
        let text = "가로섹션으로 나눈 뒤 네이프존부터 커트합니다.";
        let out = redact_recipe(text, Language::Korean);
        assert!(!out.contains("가로섹션"));
        assert!(!out.contains("네이프존"));
        assert!(out.contains("상단 부분"));
        assert!(out.contains("목 부위"));
    }

    #[test]
    fn test_redacts_structure_counts_and_matrix() {
        let text = "The 42-layer design with 9 matrix classes and 7 sections.";
        let out = redact_recipe(text, Language::English);
        assert!(!out.contains("42-layer"));
        assert!(!out.contains("9 matrix"));
        assert!(!out.contains("7 sections"));
        assert!(out.contains("systematic structure"));
        assert!(out.contains("professional classification"));
    }

    #[test]
    fn test_strips_book_citations() {
        let text = "Blend softly (Book C, p. 41) and check the outline (2WAY CUT Book A, Page 3).";
        let out = redact_recipe(text, Language::English);
        assert!(!out.contains("Book C"));
        assert!(!out.contains("Book A"));
    }

    #[test]
    fn test_clean_text_unchanged() {
        let text = "Cut the perimeter at 45 degrees, then point-cut the ends.";
        assert_eq!(redact_recipe(text, Language::English), text);
    }
}
