//! Input validation for agent ergonomics.
//!
//! Provides validation for phase numbers and knowledge categories with
//! three-tier resolution: exact match → synonym lookup → error with a
//! closest-match suggestion.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::Category;
use crate::phases;

// ── Synonym map (agent typo recovery) ────────────────────────

static CATEGORY_SYNONYMS: LazyLock<HashMap<&str, Category>> = LazyLock::new(|| {
    [
        ("patterns", Category::Pattern),
        ("practice", Category::Pattern),
        ("solution", Category::Pattern),
        ("recipe", Category::Pattern),
        ("failures", Category::Failure),
        ("mistake", Category::Failure),
        ("lesson", Category::Failure),
        ("postmortem", Category::Failure),
        ("incident", Category::Failure),
        ("decisions", Category::Decision),
        ("adr", Category::Decision),
        ("choice", Category::Decision),
        ("tradeoff", Category::Decision),
    ]
    .into_iter()
    .collect()
});

/// Validate a phase number argument.
///
/// Accepts the digits 1-5. Non-numeric input and out-of-range numbers
/// are both rejected with [`Error::InvalidPhase`] so callers never see a
/// phase outside the catalog.
pub fn validate_phase_number(input: &str) -> Result<u8> {
    let n: u8 = input.trim().parse().map_err(|_| Error::InvalidPhase {
        input: input.to_string(),
    })?;

    if (phases::FIRST_PHASE..=phases::LAST_PHASE).contains(&n) {
        Ok(n)
    } else {
        Err(Error::InvalidPhase {
            input: input.to_string(),
        })
    }
}

/// Normalize a category string via exact match or synonym lookup.
///
/// Tier 1 accepts the canonical singular names; tier 2 resolves common
/// synonyms (including the storage-directory plurals); tier 3 rejects
/// with the closest suggestion by edit distance.
pub fn normalize_category(input: &str) -> Result<Category> {
    let lower = input.to_lowercase();

    // Tier 1: exact match
    for category in crate::model::entry::CATEGORIES {
        if lower == category.as_str() {
            return Ok(category);
        }
    }

    // Tier 2: synonym lookup
    if let Some(&category) = CATEGORY_SYNONYMS.get(lower.as_str()) {
        return Ok(category);
    }

    // Tier 3: find closest suggestion
    let mut best: Option<(&str, usize)> = None;
    for category in crate::model::entry::CATEGORIES {
        let dist = levenshtein_distance(&lower, category.as_str());
        if dist <= 3 && best.is_none_or(|(_, d)| dist < d) {
            best = Some((category.as_str(), dist));
        }
    }

    Err(Error::InvalidCategory {
        input: input.to_string(),
        suggestion: best.map(|(s, _)| s.to_string()),
    })
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find existing IDs similar to the searched ID.
///
/// Returns up to `max` suggestions with edit distance ≤ 3,
/// sorted by distance then alphabetically.
pub fn find_similar_ids(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| (levenshtein_distance(searched, id), id.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max)
        .map(|(_, id)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phase_number_accepts_valid() {
        assert_eq!(validate_phase_number("1").unwrap(), 1);
        assert_eq!(validate_phase_number("3").unwrap(), 3);
        assert_eq!(validate_phase_number("5").unwrap(), 5);
    }

    #[test]
    fn test_validate_phase_number_rejects_invalid() {
        assert!(matches!(
            validate_phase_number("0"),
            Err(Error::InvalidPhase { .. })
        ));
        assert!(matches!(
            validate_phase_number("6"),
            Err(Error::InvalidPhase { .. })
        ));
        assert!(matches!(
            validate_phase_number("abc"),
            Err(Error::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("pattern").unwrap(), Category::Pattern);
        assert_eq!(normalize_category("PATTERN").unwrap(), Category::Pattern);
        assert_eq!(normalize_category("patterns").unwrap(), Category::Pattern);
        assert_eq!(normalize_category("adr").unwrap(), Category::Decision);
        assert_eq!(normalize_category("lesson").unwrap(), Category::Failure);
        assert!(normalize_category("nonsense").is_err());
    }

    #[test]
    fn test_normalize_category_suggests_closest() {
        match normalize_category("patern") {
            Err(Error::InvalidCategory { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("pattern"));
            }
            other => panic!("expected InvalidCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar_ids() {
        let ids = vec![
            "auth-flow".to_string(),
            "auth-form".to_string(),
            "payments".to_string(),
        ];
        let result = find_similar_ids("auth-flo", &ids, 3);
        assert!(!result.is_empty());
        assert!(result.contains(&"auth-flow".to_string()));
        assert!(!result.contains(&"payments".to_string()));
    }
}
