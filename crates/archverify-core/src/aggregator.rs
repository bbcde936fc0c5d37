//! Aggregator: rolls per-artifact results into one report.
//!
//! The roll-up is the same whichever strategy produced the results:
//! 1. Totals are plain sums of list lengths across artifacts
//! 2. `overall_status` uses the per-artifact precedence on those totals
//!
//! The report carries one top-level health signal for the caller.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::result::{AnalysisResult, Status};
use crate::types::ArtifactKind;

/// The artifact kinds that appear in a report, in analysis order.
pub const REPORT_KINDS: [ArtifactKind; 2] = [ArtifactKind::OpenApi, ArtifactKind::Bpmn];

/// Combined verdict over all analyzed artifacts.
///
/// Serializes flat: `openapi`, `bpmn`, `overall_status`, `total_errors`,
/// `total_warnings`, `total_suggestions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    per_artifact: BTreeMap<ArtifactKind, AnalysisResult>,
    overall_status: Status,
    total_errors: usize,
    total_warnings: usize,
    total_suggestions: usize,
}

impl Report {
    /// Result for one artifact kind, if it was analyzed.
    pub fn get(&self, kind: ArtifactKind) -> Option<&AnalysisResult> {
        self.per_artifact.get(&kind)
    }

    /// Iterate results in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &AnalysisResult)> {
        self.per_artifact.iter().map(|(kind, result)| (*kind, result))
    }

    pub fn overall_status(&self) -> Status {
        self.overall_status
    }

    pub fn total_errors(&self) -> usize {
        self.total_errors
    }

    pub fn total_warnings(&self) -> usize {
        self.total_warnings
    }

    pub fn total_suggestions(&self) -> usize {
        self.total_suggestions
    }
}

/// Builds a [`Report`] from per-artifact results.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate results into a report.
    ///
    /// If a kind appears more than once, the last result wins; totals are
    /// always computed from the results actually kept.
    pub fn aggregate<I>(&self, results: I) -> Report
    where
        I: IntoIterator<Item = (ArtifactKind, AnalysisResult)>,
    {
        let per_artifact: BTreeMap<ArtifactKind, AnalysisResult> = results.into_iter().collect();

        let total_errors = per_artifact.values().map(|r| r.errors().len()).sum();
        let total_warnings = per_artifact.values().map(|r| r.warnings().len()).sum();
        let total_suggestions = per_artifact.values().map(|r| r.suggestions().len()).sum();

        Report {
            overall_status: Status::from_counts(total_errors, total_warnings),
            per_artifact,
            total_errors,
            total_warnings,
            total_suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Findings;
    use proptest::prelude::*;

    fn result(errors: usize, warnings: usize, suggestions: usize) -> AnalysisResult {
        let mut findings = Findings::new();
        (0..errors).for_each(|i| findings.error(format!("e{}", i)));
        (0..warnings).for_each(|i| findings.warning(format!("w{}", i)));
        (0..suggestions).for_each(|i| findings.suggestion(format!("s{}", i)));
        AnalysisResult::new(findings)
    }

    #[test]
    fn test_all_ok_yields_ok() {
        let report = Aggregator::new().aggregate([
            (ArtifactKind::OpenApi, result(0, 0, 0)),
            (ArtifactKind::Bpmn, result(0, 0, 4)),
        ]);
        assert_eq!(report.overall_status(), Status::Ok);
        assert_eq!(report.total_suggestions(), 7);
    }

    #[test]
    fn test_error_takes_priority_over_warning() {
        let report = Aggregator::new().aggregate([
            (ArtifactKind::OpenApi, result(0, 2, 0)),
            (ArtifactKind::Bpmn, result(1, 0, 0)),
        ]);
        assert_eq!(report.overall_status(), Status::Error);
        assert_eq!(report.total_errors(), 1);
        assert_eq!(report.total_warnings(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let report = Aggregator::new().aggregate([
            (ArtifactKind::OpenApi, result(0, 1, 0)),
            (ArtifactKind::Bpmn, result(0, 0, 0)),
        ]);
        let json = serde_json::to_value(&report).unwrap();

        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["bpmn", "openapi", "overall_status", "total_errors", "total_suggestions", "total_warnings"]
        );
        assert_eq!(json["overall_status"], "warning");
        assert_eq!(json["openapi"]["status"], "warning");
        assert_eq!(json["bpmn"]["suggestions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_kind_last_wins() {
        let report = Aggregator::new().aggregate([
            (ArtifactKind::OpenApi, result(3, 0, 0)),
            (ArtifactKind::OpenApi, result(0, 0, 5)),
        ]);
        assert_eq!(report.total_errors(), 0);
        assert_eq!(report.get(ArtifactKind::OpenApi).unwrap().suggestions().len(), 5);
    }

    proptest! {
        #[test]
        fn prop_totals_are_sums(
            oe in 0..4usize, ow in 0..4usize, os in 0..4usize,
            be in 0..4usize, bw in 0..4usize, bs in 0..4usize,
        ) {
            let openapi = result(oe, ow, os);
            let bpmn = result(be, bw, bs);
            let expected_errors = openapi.errors().len() + bpmn.errors().len();
            let expected_warnings = openapi.warnings().len() + bpmn.warnings().len();

            let report = Aggregator::new().aggregate([
                (ArtifactKind::OpenApi, openapi),
                (ArtifactKind::Bpmn, bpmn),
            ]);

            prop_assert_eq!(report.total_errors(), expected_errors);
            prop_assert_eq!(report.total_warnings(), expected_warnings);
            prop_assert_eq!(
                report.overall_status(),
                Status::from_counts(expected_errors, expected_warnings)
            );
            let worst = report.iter().map(|(_, r)| r.status()).max().unwrap();
            prop_assert_eq!(report.overall_status(), worst);
        }
    }
}
