//! Per-artifact analysis results.
//!
//! An [`AnalysisResult`] can only be built through its constructors, which
//! enforce the two invariants every consumer relies on:
//!
//! 1. `status` is derived from the lists: `error` iff `errors` is non-empty,
//!    else `warning` iff `warnings` is non-empty, else `ok`.
//! 2. A result never carries zero actionable content: when all three lists
//!    are empty, `suggestions` is replaced by [`GENERIC_SUGGESTIONS`]. A clean
//!    result (no errors, no warnings) always has at least three suggestions;
//!    short lists are topped up from the same generic set.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Recommendations used when an analysis produced nothing actionable.
pub const GENERIC_SUGGESTIONS: [&str; 3] = [
    "Check names and descriptions for consistency across the artifact",
    "Add strict schemas and examples for the key entities",
    "Clarify error handling and the status codes that are returned",
];

/// Suggestions a result with no errors and no warnings must carry.
pub const MIN_CLEAN_SUGGESTIONS: usize = 3;

/// Health of a single artifact or of a whole report.
///
/// Variants are ordered by severity, so `max` yields the rolled-up status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Error,
}

impl Status {
    /// Apply the precedence rule to a pair of counts.
    pub fn from_counts(errors: usize, warnings: usize) -> Self {
        if errors > 0 {
            Status::Error
        } else if warnings > 0 {
            Status::Warning
        } else {
            Status::Ok
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("ok"),
            Status::Warning => f.write_str("warning"),
            Status::Error => f.write_str("error"),
        }
    }
}

/// Raw lists of findings, before invariants are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty()
    }

    /// Read the three finding lists out of a model-produced JSON object.
    ///
    /// A missing key, or a key whose value is not an array, reads as an empty
    /// list. String items are kept verbatim, `null` items are dropped and any
    /// other item is kept as its compact JSON text.
    pub fn from_json(value: &JsonValue) -> Self {
        Self {
            errors: string_list(value.get("errors")),
            warnings: string_list(value.get("warnings")),
            suggestions: string_list(value.get("suggestions")),
        }
    }

    /// Top up a clean result's suggestions from the generic set.
    fn backfill(&mut self) {
        if !self.errors.is_empty() || !self.warnings.is_empty() {
            return;
        }
        for generic in GENERIC_SUGGESTIONS {
            if self.suggestions.len() >= MIN_CLEAN_SUGGESTIONS {
                break;
            }
            if !self.suggestions.iter().any(|s| s == generic) {
                self.suggestions.push(generic.to_string());
            }
        }
    }
}

fn string_list(value: Option<&JsonValue>) -> Vec<String> {
    let Some(JsonValue::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}

/// The verdict for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    status: Status,
    errors: Vec<String>,
    warnings: Vec<String>,
    suggestions: Vec<String>,
    summary: String,
}

impl AnalysisResult {
    /// Build a result with a generated summary.
    pub fn new(findings: Findings) -> Self {
        Self::build(findings, None, describe)
    }

    /// Build a result, keeping `summary` when it is a non-empty string.
    ///
    /// Used for model-produced sections where the model may already have
    /// written a summary. A missing summary is replaced by a plain count.
    pub fn with_summary(findings: Findings, summary: Option<String>) -> Self {
        Self::build(findings, summary, count_summary)
    }

    fn build(
        mut findings: Findings,
        summary: Option<String>,
        fallback_summary: fn(&Findings) -> String,
    ) -> Self {
        findings.backfill();

        let status = Status::from_counts(findings.errors.len(), findings.warnings.len());
        let summary = summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| fallback_summary(&findings));

        Self {
            status,
            errors: findings.errors,
            warnings: findings.warnings,
            suggestions: findings.suggestions,
            summary,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// "Found 2 errors, 1 warnings" style summary.
///
/// Only called after backfill, so at least one part is always present.
fn describe(findings: &Findings) -> String {
    let mut parts = Vec::new();
    if !findings.errors.is_empty() {
        parts.push(format!("Found {} errors", findings.errors.len()));
    }
    if !findings.warnings.is_empty() {
        parts.push(format!("{} warnings", findings.warnings.len()));
    }
    if !findings.suggestions.is_empty() {
        parts.push(format!("{} suggestions", findings.suggestions.len()));
    }
    parts.join(", ")
}

fn count_summary(findings: &Findings) -> String {
    format!(
        "{} errors, {} warnings, {} suggestions",
        findings.errors.len(),
        findings.warnings.len(),
        findings.suggestions.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_empty_findings_are_backfilled() {
        let result = AnalysisResult::new(Findings::new());
        assert_eq!(result.status(), Status::Ok);
        assert_eq!(result.suggestions().len(), 3);
        assert_eq!(result.summary(), "3 suggestions");
    }

    #[test]
    fn test_short_suggestions_are_topped_up() {
        let mut findings = Findings::new();
        findings.suggestion("Add a servers section");
        let result = AnalysisResult::new(findings);
        assert_eq!(result.suggestions().len(), 3);
        assert_eq!(result.suggestions()[0], "Add a servers section");
        assert_eq!(result.suggestions()[1], GENERIC_SUGGESTIONS[0]);
    }

    #[test]
    fn test_generic_suggestion_not_duplicated() {
        let mut findings = Findings::new();
        findings.suggestion(GENERIC_SUGGESTIONS[1]);
        let result = AnalysisResult::new(findings);
        assert_eq!(
            result.suggestions(),
            [GENERIC_SUGGESTIONS[1], GENERIC_SUGGESTIONS[0], GENERIC_SUGGESTIONS[2]]
        );
    }

    #[test]
    fn test_long_suggestion_list_untouched() {
        let mut findings = Findings::new();
        for s in ["a", "b", "c", "d"] {
            findings.suggestion(s);
        }
        let result = AnalysisResult::new(findings);
        assert_eq!(result.suggestions(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_warning_alone_is_not_backfilled() {
        let mut findings = Findings::new();
        findings.warning("paths is empty");
        let result = AnalysisResult::new(findings);
        assert_eq!(result.status(), Status::Warning);
        assert!(result.suggestions().is_empty());
        assert_eq!(result.summary(), "1 warnings");
    }

    #[test]
    fn test_error_summary() {
        let mut findings = Findings::new();
        findings.error("a");
        findings.error("b");
        findings.warning("c");
        let result = AnalysisResult::new(findings);
        assert_eq!(result.status(), Status::Error);
        assert_eq!(result.summary(), "Found 2 errors, 1 warnings");
    }

    #[test]
    fn test_with_summary_keeps_model_text() {
        let result = AnalysisResult::with_summary(Findings::new(), Some("Looks fine".into()));
        assert_eq!(result.summary(), "Looks fine");
    }

    #[test]
    fn test_with_summary_counts_when_blank() {
        let mut findings = Findings::new();
        findings.warning("w");
        let result = AnalysisResult::with_summary(findings, Some("  ".into()));
        assert_eq!(result.summary(), "0 errors, 1 warnings, 0 suggestions");
    }

    #[test]
    fn test_findings_from_json_wrong_shapes() {
        let value = json!({
            "errors": "not a list",
            "warnings": [null, "w1", 42, {"code": "X"}],
        });
        let findings = Findings::from_json(&value);
        assert!(findings.errors.is_empty());
        assert_eq!(findings.warnings, vec!["w1", "42", r#"{"code":"X"}"#]);
        assert!(findings.suggestions.is_empty());
    }

    #[test]
    fn test_findings_from_non_object() {
        assert!(Findings::from_json(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_status_ordering() {
        assert!(Status::Error > Status::Warning);
        assert!(Status::Warning > Status::Ok);
        assert_eq!(serde_json::to_string(&Status::Warning).unwrap(), "\"warning\"");
    }

    fn findings_strategy() -> impl Strategy<Value = Findings> {
        let list = || proptest::collection::vec("[a-z ]{0,12}", 0..4);
        (list(), list(), list()).prop_map(|(errors, warnings, suggestions)| Findings {
            errors,
            warnings,
            suggestions,
        })
    }

    proptest! {
        #[test]
        fn prop_status_follows_precedence(findings in findings_strategy()) {
            let result = AnalysisResult::new(findings);
            prop_assert_eq!(result.status() == Status::Error, !result.errors().is_empty());
            prop_assert_eq!(
                result.status() == Status::Warning,
                result.errors().is_empty() && !result.warnings().is_empty()
            );
        }

        #[test]
        fn prop_clean_results_carry_suggestions(findings in findings_strategy()) {
            let result = AnalysisResult::with_summary(findings, None);
            if result.errors().is_empty() && result.warnings().is_empty() {
                prop_assert!(result.suggestions().len() >= MIN_CLEAN_SUGGESTIONS);
            }
            prop_assert!(!result.summary().is_empty());
        }
    }
}
