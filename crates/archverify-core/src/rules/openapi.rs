//! OpenAPI structural checks.

use serde_json::Value as JsonValue;

use crate::extract::is_empty_value;
use crate::result::Findings;
use crate::types::ArtifactKind;

use super::RuleCheck;

pub(crate) const MISSING_PATHS: &str = "OpenAPI document is missing the paths section";
pub(crate) const EMPTY_PATHS: &str = "OpenAPI paths section is empty";

/// Checks that an OpenAPI document is JSON and declares some paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenApiRules;

impl RuleCheck for OpenApiRules {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::OpenApi
    }

    fn inspect(&self, content: &str, findings: &mut Findings) {
        let document: JsonValue = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                findings.error(format!("OpenAPI document is invalid JSON: {}", e));
                return;
            }
        };

        match document.get("paths") {
            None => findings.warning(MISSING_PATHS),
            Some(paths) if is_empty_value(paths) => findings.warning(EMPTY_PATHS),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspect(content: &str) -> Findings {
        let mut findings = Findings::new();
        OpenApiRules.inspect(content, &mut findings);
        findings
    }

    #[test]
    fn test_invalid_json_is_error() {
        let findings = inspect("openapi: 3.0.0");
        assert_eq!(findings.errors.len(), 1);
        assert!(findings.errors[0].contains("invalid JSON"));
        assert!(findings.warnings.is_empty());
    }

    #[test]
    fn test_empty_input_is_error() {
        assert_eq!(inspect("").errors.len(), 1);
    }

    #[test]
    fn test_missing_paths_is_warning() {
        let findings = inspect(r#"{"info":{}}"#);
        assert!(findings.errors.is_empty());
        assert_eq!(findings.warnings, vec![MISSING_PATHS]);
    }

    #[test]
    fn test_non_object_document_is_missing_paths() {
        assert_eq!(inspect("[1, 2]").warnings, vec![MISSING_PATHS]);
        assert_eq!(inspect("42").warnings, vec![MISSING_PATHS]);
    }

    #[test]
    fn test_empty_paths_is_warning() {
        assert_eq!(inspect(r#"{"paths":{}}"#).warnings, vec![EMPTY_PATHS]);
        assert_eq!(inspect(r#"{"paths":null}"#).warnings, vec![EMPTY_PATHS]);
        assert_eq!(inspect(r#"{"paths":[]}"#).warnings, vec![EMPTY_PATHS]);
    }

    #[test]
    fn test_populated_paths_pass() {
        assert!(inspect(r#"{"paths":{"/a":{}}}"#).is_empty());
    }
}
