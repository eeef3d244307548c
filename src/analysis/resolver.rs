//! Lookup of logical column names against the headers of a loaded file.
//!
//! Headers in the wild differ from the names the views ask for in case,
//! accents and separators ("Note Praticien" vs `note_practicien`), so both
//! sides are normalized before comparing.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters collapsed into `_` during normalization.
const SEPARATORS: [char; 6] = [' ', '-', ':', ';', ',', '.'];

/// Trim, strip diacritics, lowercase and fold separators into single
/// underscores, without leading or trailing underscores.
pub fn normalize(name: &str) -> String {
    let folded: String = name
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if SEPARATORS.contains(&c) { '_' } else { c })
        .collect();

    let mut out = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

/// A fallback applied when no header matches exactly.
///
/// The rule fires for targets whose normalized form contains any of
/// `triggers`, and accepts the first header whose normalized form contains
/// every entry of `required`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicRule {
    pub triggers: Vec<String>,
    pub required: Vec<String>,
}

impl HeuristicRule {
    pub fn new(triggers: &[&str], required: &[&str]) -> Self {
        HeuristicRule {
            triggers: triggers.iter().map(|s| s.to_string()).collect(),
            required: required.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn applies_to(&self, normalized_target: &str) -> bool {
        self.triggers.iter().any(|t| normalized_target.contains(t.as_str()))
    }

    fn accepts(&self, normalized_candidate: &str) -> bool {
        !self.required.is_empty()
            && self
                .required
                .iter()
                .all(|r| normalized_candidate.contains(r.as_str()))
    }
}

/// Resolves requested column names against the available headers.
///
/// Resolution order, first hit wins:
/// 1. normalized equality
/// 2. heuristic rules that apply to the target, in table order
/// 3. a header whose normalized form contains the normalized target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnResolver {
    pub rules: Vec<HeuristicRule>,
}

impl Default for ColumnResolver {
    /// Grade lookups fall back to any "note … praticien" header.
    fn default() -> Self {
        ColumnResolver {
            rules: vec![HeuristicRule::new(&["note", "grade"], &["note", "praticien"])],
        }
    }
}

impl ColumnResolver {
    /// A resolver without heuristics: exact and substring matching only.
    pub fn without_heuristics() -> Self {
        ColumnResolver { rules: Vec::new() }
    }

    pub fn resolve<'a, S: AsRef<str>>(&self, target: &str, columns: &'a [S]) -> Option<&'a str> {
        let target_norm = normalize(target);
        let normalized: Vec<(&'a str, String)> = columns
            .iter()
            .map(|c| (c.as_ref(), normalize(c.as_ref())))
            .collect();

        if let Some((col, _)) = normalized.iter().find(|(_, n)| *n == target_norm) {
            return Some(*col);
        }

        for rule in self.rules.iter().filter(|r| r.applies_to(&target_norm)) {
            if let Some((col, _)) = normalized.iter().find(|(_, n)| rule.accepts(n)) {
                log::debug!("column '{target}' resolved to '{col}' by heuristic {:?}", rule.required);
                return Some(*col);
            }
        }

        if target_norm.is_empty() {
            return None;
        }
        normalized
            .iter()
            .find(|(_, n)| n.contains(target_norm.as_str()))
            .map(|(col, _)| *col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_folds_case_accents_and_separators() {
        assert_eq!(normalize("  Note Praticien "), "note_praticien");
        assert_eq!(normalize("Durée - minutes"), "duree_minutes");
        assert_eq!(normalize("qualité;score.."), "qualite_score");
        assert_eq!(normalize("__Langue__"), "langue");
        assert_eq!(normalize("Élève:Âge"), "eleve_age");
    }

    #[test]
    fn exact_match_after_normalization() {
        let resolver = ColumnResolver::default();
        let cols = ["Qualité Score", "date"];
        assert_eq!(resolver.resolve("qualite_score", &cols), Some("Qualité Score"));
    }

    #[test]
    fn grade_lookup_finds_misspelled_header() {
        let resolver = ColumnResolver::default();
        let cols = ["Note Praticien", "date"];
        assert_eq!(resolver.resolve("note_practicien", &cols), Some("Note Praticien"));
    }

    #[test]
    fn unmatched_target_is_not_found() {
        let resolver = ColumnResolver::default();
        assert_eq!(resolver.resolve("grade", &["score_final"]), None);
        assert_eq!(resolver.resolve("", &["score_final"]), None);
    }

    #[test]
    fn substring_match_is_last_resort() {
        let resolver = ColumnResolver::default();
        let cols = ["session_date", "date_fin"];
        assert_eq!(resolver.resolve("date", &cols), Some("session_date"));
    }

    #[test]
    fn heuristics_only_fire_for_their_triggers() {
        let resolver = ColumnResolver::default();
        let cols = ["note_du_praticien"];
        assert_eq!(resolver.resolve("langue", &cols), None);
        assert_eq!(resolver.resolve("grade", &cols), Some("note_du_praticien"));
        assert_eq!(ColumnResolver::without_heuristics().resolve("grade", &cols), None);
    }

    #[test]
    fn exact_match_beats_heuristic() {
        let resolver = ColumnResolver::default();
        let cols = ["note_praticien_old", "Grade"];
        assert_eq!(resolver.resolve("grade", &cols), Some("Grade"));
    }

    #[test]
    fn resolution_is_repeatable() {
        let resolver = ColumnResolver::default();
        let cols = vec!["Note Praticien".to_string(), "date".to_string()];
        let first = resolver.resolve("note_practicien", &cols);
        assert_eq!(first, resolver.resolve("note_practicien", &cols));
    }
}
