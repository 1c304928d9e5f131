//! PatientProfile → registry search expression.
//!
//! Diagnosis and keyword terms are each expanded with the synonyms of every
//! group they trigger, then OR-combined. Eligibility is enforced locally
//! afterwards.

use crate::domains::trials::models::{push_unique, PatientProfile};

/// Query used when the profile has no usable terms.
pub const BROAD_QUERY: &str = "\"breast cancer\" OR HER2";

/// Keywords beyond this many are not added to the query.
const MAX_KEYWORD_TERMS: usize = 6;

struct SynonymGroup {
    /// Lowercase substrings that select this group
    triggers: &'static [&'static str],
    synonyms: &'static [&'static str],
}

const SYNONYM_GROUPS: &[SynonymGroup] = &[
    SynonymGroup {
        triggers: &["breast", "ductal carcinoma", "lobular carcinoma"],
        synonyms: &["breast cancer", "breast neoplasms", "invasive ductal carcinoma"],
    },
    SynonymGroup {
        triggers: &["her2", "erbb2"],
        synonyms: &["HER2 positive", "HER2", "ERBB2"],
    },
    SynonymGroup {
        triggers: &["heart failure", "hfref", "hfpef", "cardiac failure"],
        synonyms: &["heart failure", "cardiac failure"],
    },
    SynonymGroup {
        triggers: &["hfref", "reduced ejection fraction"],
        synonyms: &["HFrEF", "reduced ejection fraction"],
    },
    SynonymGroup {
        triggers: &["nsclc", "non-small cell lung", "non small cell lung", "non-small-cell lung"],
        synonyms: &["non-small cell lung cancer", "NSCLC"],
    },
    SynonymGroup {
        triggers: &["egfr"],
        synonyms: &["EGFR", "EGFR mutation"],
    },
    SynonymGroup {
        triggers: &["type 2 diabetes", "t2dm", "type ii diabetes"],
        synonyms: &["type 2 diabetes", "diabetes mellitus, type 2"],
    },
];

/// Build the search expression for a profile.
///
/// Never empty: a profile with no diagnosis or keywords yields [`BROAD_QUERY`].
pub fn build_expr(profile: &PatientProfile, include_locations: bool) -> String {
    let mut terms = Vec::new();
    if let Some(dx) = profile.diagnosis.as_deref() {
        push_unique(&mut terms, dx);
    }
    for kw in profile.keywords.iter().take(MAX_KEYWORD_TERMS) {
        push_unique(&mut terms, kw);
    }

    let mut clauses: Vec<String> = Vec::new();
    for term in terms.iter().filter(|t| !unquoted(t).is_empty()) {
        let clause = expand_term(term);
        if !clauses.contains(&clause) {
            clauses.push(clause);
        }
    }

    let terms_expr = if clauses.is_empty() {
        BROAD_QUERY.to_string()
    } else {
        clauses.join(" OR ")
    };

    let locations: Vec<String> = if include_locations {
        profile
            .locations
            .iter()
            .filter(|l| !unquoted(l).is_empty())
            .map(|l| quote(l))
            .collect()
    } else {
        Vec::new()
    };

    if locations.is_empty() {
        terms_expr
    } else {
        format!("({}) AND ({})", terms_expr, locations.join(" OR "))
    }
}

/// `term` alone, or `(term OR synonym …)` when it triggers any synonym group.
fn expand_term(term: &str) -> String {
    let lower = term.to_lowercase();
    let mut alternatives = Vec::new();

    for group in SYNONYM_GROUPS {
        if group.triggers.iter().any(|t| lower.contains(t)) {
            for syn in group.synonyms {
                if !syn.eq_ignore_ascii_case(term) {
                    push_unique(&mut alternatives, syn);
                }
            }
        }
    }

    if alternatives.is_empty() {
        return quote(term);
    }

    let parts: Vec<String> = std::iter::once(term)
        .chain(alternatives.iter().map(String::as_str))
        .map(quote)
        .collect();
    format!("({})", parts.join(" OR "))
}

/// Single alphanumeric tokens stay bare; anything else is phrase-quoted.
fn quote(term: &str) -> String {
    let term = unquoted(term);
    if !term.is_empty() && term.chars().all(char::is_alphanumeric) {
        term
    } else {
        format!("\"{}\"", term)
    }
}

fn unquoted(term: &str) -> String {
    term.replace('"', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(diagnosis: Option<&str>, keywords: &[&str]) -> PatientProfile {
        PatientProfile {
            diagnosis: diagnosis.map(str::to_string),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..PatientProfile::default()
        }
    }

    #[test]
    fn her2_breast_cancer_expands_with_synonyms() {
        let expr = build_expr(&profile(Some("HER2-positive breast cancer"), &[]), false);

        assert!(expr.starts_with("(\"HER2-positive breast cancer\" OR "));
        assert!(expr.contains(" OR \"breast neoplasms\""));
        assert!(expr.contains(" OR ERBB2"));
    }

    #[test]
    fn keywords_become_their_own_clauses() {
        let expr = build_expr(&profile(Some("Melanoma"), &["immunotherapy", "pd-l1"]), false);
        assert_eq!(expr, "Melanoma OR immunotherapy OR \"pd-l1\"");
    }

    #[test]
    fn term_equal_to_a_synonym_is_not_repeated() {
        let expr = build_expr(&profile(None, &["HER2"]), false);
        assert_eq!(expr, "(HER2 OR \"HER2 positive\" OR ERBB2)");
    }

    #[test]
    fn duplicate_clauses_collapse() {
        let expr = build_expr(&profile(Some("her2"), &["HER2"]), false);
        assert_eq!(expr.matches(" OR ERBB2").count(), 1);
    }

    #[test]
    fn unknown_profile_degrades_to_broad_query() {
        assert_eq!(build_expr(&PatientProfile::default(), false), BROAD_QUERY);
        assert_eq!(build_expr(&PatientProfile::default(), true), BROAD_QUERY);
    }

    #[test]
    fn locations_are_and_appended_when_enabled() {
        let mut p = profile(Some("Melanoma"), &[]);
        p.locations = vec!["Boston".into(), "New York".into()];

        assert_eq!(build_expr(&p, false), "Melanoma");
        assert_eq!(build_expr(&p, true), "(Melanoma) AND (Boston OR \"New York\")");
    }

    #[test]
    fn keyword_terms_are_bounded() {
        let kws = ["a1", "b2", "c3", "d4", "e5", "f6", "g7", "h8"];
        let expr = build_expr(&profile(None, &kws), false);
        assert!(expr.contains("f6"));
        assert!(!expr.contains("g7"));
    }

    #[test]
    fn quote_only_terms_are_ignored() {
        let mut p = profile(Some("\"\""), &["\"", "Melanoma"]);
        p.locations = vec!["\"".into()];

        assert_eq!(build_expr(&p, true), "Melanoma");
        assert_eq!(build_expr(&profile(Some("\""), &[]), false), BROAD_QUERY);
    }
}
