//! # archverify-core
//!
//! Deterministic verification of architecture artifacts.
//!
//! This crate provides the model-free half of archverify:
//! - Rule-based structural checks for OpenAPI, BPMN and PlantUML
//! - Recovery of JSON objects from free-form generated text
//! - Result invariants and report aggregation
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No model calls**: All checks are rule-based
//! 3. **Total**: Every well-typed input yields a well-typed report
//!
//! ## Example
//!
//! ```rust
//! use archverify_core::{verify, Artifacts, Status};
//!
//! let artifacts = Artifacts::new()
//!     .with_openapi(r#"{"paths": {"/orders": {}}}"#)
//!     .with_bpmn("<bpmn:definitions></bpmn:definitions>");
//!
//! let report = verify(&artifacts).unwrap();
//! assert_eq!(report.overall_status(), Status::Ok);
//! ```

pub mod aggregator;
pub mod extract;
pub mod result;
pub mod rules;
pub mod types;

// Re-export main types at crate root
pub use aggregator::{Aggregator, Report, REPORT_KINDS};
pub use extract::{
    extract_json_object, is_empty_value, locate_json_object, Extraction, EMPTY_OBJECT,
};
pub use result::{AnalysisResult, Findings, Status, GENERIC_SUGGESTIONS, MIN_CLEAN_SUGGESTIONS};
pub use rules::{BpmnRules, OpenApiRules, PumlRules, RuleCheck, RuleValidator};
pub use types::{truncate_chars, ArtifactKind, Artifacts, Profile};

use thiserror::Error;

/// Errors that stop a verification request before any analysis runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("{0} artifact not provided")]
    MissingArtifact(ArtifactKind),
}

/// Refuse requests that do not carry the primary (OpenAPI) artifact.
///
/// An empty-but-present artifact is accepted; only total absence is misuse.
pub fn require_primary(artifacts: &Artifacts) -> Result<(), VerificationError> {
    if artifacts.has(ArtifactKind::OpenApi) {
        Ok(())
    } else {
        Err(VerificationError::MissingArtifact(ArtifactKind::OpenApi))
    }
}

/// Verify artifacts with rule-based checks only.
///
/// This is the deterministic entry point. For model-assisted analysis use
/// `archverify-runtime`, which falls back to exactly these checks.
pub fn verify(artifacts: &Artifacts) -> Result<Report, VerificationError> {
    require_primary(artifacts)?;

    let validator = RuleValidator::new();
    let results = REPORT_KINDS
        .iter()
        .map(|&kind| (kind, validator.check(kind, artifacts.content(kind))));

    Ok(Aggregator::new().aggregate(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_artifacts_yield_ok() {
        let artifacts = Artifacts::new()
            .with_openapi(r#"{"paths":{"/a":{}}}"#)
            .with_bpmn(r#"<bpmn:definitions id="d"><bpmn:process id="p"/></bpmn:definitions>"#);

        let report = verify(&artifacts).unwrap();

        assert_eq!(report.overall_status(), Status::Ok);
        assert_eq!(report.total_errors(), 0);
        assert!(report.get(ArtifactKind::OpenApi).unwrap().suggestions().len() >= 3);
        assert!(report.get(ArtifactKind::Bpmn).unwrap().suggestions().len() >= 3);
    }

    #[test]
    fn test_missing_bpmn_is_error() {
        let artifacts = Artifacts::new().with_openapi(r#"{"paths":{"/a":{}}}"#);
        let report = verify(&artifacts).unwrap();

        assert_eq!(report.overall_status(), Status::Error);
        assert_eq!(report.get(ArtifactKind::Bpmn).unwrap().status(), Status::Error);
        assert!(report.get(ArtifactKind::Puml).is_none());
    }

    #[test]
    fn test_missing_openapi_is_refused() {
        let artifacts = Artifacts::new().with_bpmn("<definitions></definitions>");
        assert_eq!(
            verify(&artifacts),
            Err(VerificationError::MissingArtifact(ArtifactKind::OpenApi))
        );
    }

    #[test]
    fn test_error_message() {
        let err = VerificationError::MissingArtifact(ArtifactKind::OpenApi);
        assert_eq!(err.to_string(), "openapi artifact not provided");
    }
}
