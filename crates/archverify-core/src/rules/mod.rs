//! Rule-based validation.
//!
//! Deterministic, model-free checks for each artifact kind. These are the
//! primary mode when no generation backend is configured and the universal
//! fallback when the backend fails.
//!
//! ## Guarantees
//!
//! - **Infallible**: garbage or empty input produces findings, never an error
//! - **Pure**: the same `(kind, content)` always yields the same result
//! - **Minimal**: structural sanity only, not full grammar validation

mod bpmn;
mod openapi;
mod patterns;
mod puml;

pub use bpmn::BpmnRules;
pub use openapi::OpenApiRules;
pub use puml::PumlRules;

use crate::result::{AnalysisResult, Findings};
use crate::types::ArtifactKind;

/// A deterministic check for one artifact kind.
pub trait RuleCheck: Send + Sync {
    /// The artifact kind this check applies to.
    fn kind(&self) -> ArtifactKind;

    /// Record findings for `content`.
    fn inspect(&self, content: &str, findings: &mut Findings);
}

/// Dispatches an artifact to the rule check for its kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleValidator;

impl RuleValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check one artifact and build its result.
    pub fn check(&self, kind: ArtifactKind, content: &str) -> AnalysisResult {
        let rules: &dyn RuleCheck = match kind {
            ArtifactKind::OpenApi => &OpenApiRules,
            ArtifactKind::Bpmn => &BpmnRules,
            ArtifactKind::Puml => &PumlRules,
        };

        let mut findings = Findings::new();
        rules.inspect(content, &mut findings);

        tracing::debug!(
            kind = %rules.kind(),
            errors = findings.errors.len(),
            warnings = findings.warnings.len(),
            "Rule-based check complete"
        );

        AnalysisResult::new(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Status;

    #[test]
    fn test_dispatch_by_kind() {
        let validator = RuleValidator::new();
        assert_eq!(validator.check(ArtifactKind::OpenApi, "{").status(), Status::Error);
        assert_eq!(validator.check(ArtifactKind::Bpmn, "").status(), Status::Error);
        assert_eq!(validator.check(ArtifactKind::Puml, "").status(), Status::Warning);
    }

    #[test]
    fn test_wsdl_is_not_bpmn() {
        let wsdl = r#"<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"><wsdl:types/></wsdl:definitions>"#;
        let result = RuleValidator::new().check(ArtifactKind::Bpmn, wsdl);
        assert_eq!(result.status(), Status::Error);
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_check_is_pure() {
        let validator = RuleValidator::new();
        for kind in ArtifactKind::ALL {
            for content in ["", "garbage", r#"{"paths":{}}"#, "@startuml\n@enduml"] {
                assert_eq!(validator.check(kind, content), validator.check(kind, content));
            }
        }
    }

    #[test]
    fn test_clean_artifact_gets_generic_suggestions() {
        let result = RuleValidator::new().check(ArtifactKind::Puml, "@startuml\nA -> B\n@enduml");
        assert_eq!(result.status(), Status::Ok);
        assert!(result.suggestions().len() >= 3);
    }
}
