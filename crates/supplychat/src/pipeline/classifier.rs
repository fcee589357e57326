//! Ordered rule table mapping a chunk of answer text to a [`Section`].
//!
//! The backend encodes structure as literal markers inside free text. Rules
//! are tried top to bottom and the first match wins, so a chunk that satisfies
//! several predicates is resolved by position in [`RULES`], not by how specific
//! the match is.

use super::suggestions::extract_suggestions;
use crate::types::{Section, SectionKind};

pub const TABLE_PREFIX: &str = "Database results:";
pub const EXPLANATION_PREFIX: &str = "Explanation and insights:";
pub const SQL_PREFIX: &str = "SQL query used:";
pub const ACCESS_LOG_PREFIX: &str = "Access attempt logged:";
pub const SUGGESTIONS_PREFIX: &str = "Proactive Suggestions:";
pub const PREDICTION_PREFIX: &str = "prediction results:";

const TABLE_MARKERS: [&str; 3] = ["customer ID", "+---", "|"];
const METADATA_MARKERS: [&str; 2] = ["Leaderboard Position:", "Compliance Score:"];

/// One row of the classification table.
pub struct ClassificationRule {
    pub kind: SectionKind,
    pub matches: fn(&str) -> bool,
    pub build: fn(&str) -> Section,
}

impl ClassificationRule {
    pub fn apply(&self, chunk: &str) -> Option<Section> {
        (self.matches)(chunk).then(|| (self.build)(chunk))
    }
}

/// Classification rules in priority order. The last rule always matches.
pub static RULES: [ClassificationRule; 8] = [
    ClassificationRule {
        kind: SectionKind::Table,
        matches: is_table,
        build: |chunk| Section::Table(chunk.to_string()),
    },
    ClassificationRule {
        kind: SectionKind::Explanation,
        matches: |chunk| chunk.starts_with(EXPLANATION_PREFIX),
        build: |chunk| Section::Explanation(strip_marker(chunk, EXPLANATION_PREFIX)),
    },
    ClassificationRule {
        kind: SectionKind::SqlQuery,
        matches: |chunk| chunk.starts_with(SQL_PREFIX),
        build: |chunk| Section::SqlQuery(strip_marker(chunk, SQL_PREFIX)),
    },
    ClassificationRule {
        kind: SectionKind::AccessLog,
        matches: |chunk| chunk.starts_with(ACCESS_LOG_PREFIX),
        build: |chunk| Section::AccessLog(chunk.to_string()),
    },
    ClassificationRule {
        kind: SectionKind::Suggestions,
        matches: |chunk| chunk.starts_with(SUGGESTIONS_PREFIX),
        build: |chunk| {
            Section::Suggestions(extract_suggestions(&strip_marker(chunk, SUGGESTIONS_PREFIX)))
        },
    },
    ClassificationRule {
        kind: SectionKind::Metadata,
        matches: |chunk| METADATA_MARKERS.iter().any(|marker| chunk.contains(marker)),
        build: |chunk| Section::Metadata(chunk.to_string()),
    },
    ClassificationRule {
        kind: SectionKind::PredictionResult,
        matches: starts_with_prediction_marker,
        build: |chunk| Section::PredictionResult(after_first_colon(chunk)),
    },
    ClassificationRule {
        kind: SectionKind::PlainText,
        matches: |_| true,
        build: |chunk| Section::PlainText(chunk.to_string()),
    },
];

/// Classify a single chunk. Never fails: unmatched text becomes plain text.
pub fn classify(chunk: &str) -> Section {
    RULES
        .iter()
        .find_map(|rule| rule.apply(chunk))
        .unwrap_or_else(|| Section::PlainText(chunk.to_string()))
}

// Any pipe anywhere forces a table, even in prose.
fn is_table(chunk: &str) -> bool {
    chunk.starts_with(TABLE_PREFIX) || TABLE_MARKERS.iter().any(|marker| chunk.contains(marker))
}

fn starts_with_prediction_marker(chunk: &str) -> bool {
    chunk
        .get(..PREDICTION_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(PREDICTION_PREFIX))
}

fn strip_marker(chunk: &str, prefix: &str) -> String {
    chunk.strip_prefix(prefix).unwrap_or(chunk).trim().to_string()
}

fn after_first_colon(chunk: &str) -> String {
    match chunk.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => chunk.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::build_sections;

    #[test]
    fn test_table_before_explanation() {
        let sections = build_sections("Database results:\nfoo\n\nExplanation and insights:\nbar");
        assert_eq!(
            sections,
            vec![
                Section::Table("Database results:\nfoo".to_string()),
                Section::Explanation("bar".to_string()),
            ]
        );
    }

    #[test]
    fn test_pipe_overrides_metadata() {
        let chunk = "Leaderboard Position: 3 | Compliance Score: 92";
        assert_eq!(classify(chunk), Section::Table(chunk.to_string()));
        let shadowed: Vec<_> = RULES
            .iter()
            .filter(|rule| (rule.matches)(chunk))
            .map(|rule| rule.kind)
            .collect();
        assert_eq!(
            shadowed,
            vec![SectionKind::Table, SectionKind::Metadata, SectionKind::PlainText]
        );
    }

    #[test]
    fn test_pipe_overrides_explanation() {
        let chunk = "Explanation and insights: revenue | cost";
        assert!(matches!(classify(chunk), Section::Table(_)));
    }

    #[test]
    fn test_table_markers() {
        assert!(matches!(classify("+---+---+\n| a | b |"), Section::Table(_)));
        assert!(matches!(classify("Top rows by customer ID"), Section::Table(_)));
        assert!(matches!(classify("Database results: none"), Section::Table(_)));
    }

    #[test]
    fn test_sql_prefix_stripped() {
        assert_eq!(
            classify("SQL query used:\nSELECT * FROM orders"),
            Section::SqlQuery("SELECT * FROM orders".to_string())
        );
    }

    #[test]
    fn test_access_log_verbatim() {
        let chunk = "Access attempt logged: user 7 at 10:02";
        assert_eq!(classify(chunk), Section::AccessLog(chunk.to_string()));
    }

    #[test]
    fn test_suggestions_delegated() {
        assert_eq!(
            classify("Proactive Suggestions: Q1?,Q2"),
            Section::Suggestions(vec!["Q1?".to_string(), "Q2?".to_string()])
        );
    }

    #[test]
    fn test_metadata_verbatim() {
        let chunk = "Compliance Score: 88%";
        assert_eq!(classify(chunk), Section::Metadata(chunk.to_string()));
    }

    #[test]
    fn test_prediction_case_insensitive() {
        assert_eq!(
            classify("PREDICTION RESULTS:  Standard Class has 40% late risk "),
            Section::PredictionResult("Standard Class has 40% late risk".to_string())
        );
        assert_eq!(
            classify("Prediction results: a: b"),
            Section::PredictionResult("a: b".to_string())
        );
    }

    #[test]
    fn test_prefix_must_lead() {
        let chunk = "See the Explanation and insights: below";
        assert_eq!(classify(chunk), Section::PlainText(chunk.to_string()));
    }

    #[test]
    fn test_empty_chunk_is_plain() {
        assert_eq!(classify(""), Section::PlainText(String::new()));
    }

    #[test]
    fn test_short_chunk_prediction_check() {
        // Shorter than the marker and not on a char boundary past it.
        assert_eq!(classify("préd"), Section::PlainText("préd".to_string()));
    }

    #[test]
    fn test_rule_order() {
        let kinds: Vec<_> = RULES.iter().map(|rule| rule.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Table,
                SectionKind::Explanation,
                SectionKind::SqlQuery,
                SectionKind::AccessLog,
                SectionKind::Suggestions,
                SectionKind::Metadata,
                SectionKind::PredictionResult,
                SectionKind::PlainText,
            ]
        );
    }
}
