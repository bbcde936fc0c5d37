//! Joint analysis: one combined judgment across all artifacts.
//!
//! The model sees BPMN, OpenAPI and PUML together and answers with nested
//! `openapi` and `bpmn` sections. When that answer is unusable the analyzer
//! degrades to per-artifact analysis.

use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

use archverify_core::{
    is_empty_value, truncate_chars, Aggregator, AnalysisResult, ArtifactKind, Artifacts, Findings,
    Report, REPORT_KINDS,
};

use crate::analyzer::{read_model_object, Attempt, SingleArtifactAnalyzer, UnusableOutput};
use crate::config::RuntimeConfig;
use crate::prompts;
use crate::providers::TextSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointStrategy {
    /// One prompt covering every artifact.
    Combined,
    /// Degraded mode: [`SingleArtifactAnalyzer::analyze_split`].
    PerArtifact,
}

impl fmt::Display for JointStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointStrategy::Combined => f.write_str("combined"),
            JointStrategy::PerArtifact => f.write_str("per_artifact"),
        }
    }
}

const FULL_LADDER: &[JointStrategy] = &[JointStrategy::Combined, JointStrategy::PerArtifact];
const SPLIT_ONLY: &[JointStrategy] = &[JointStrategy::PerArtifact];

#[derive(Clone)]
pub struct JointAnalyzer {
    source: Arc<dyn TextSource>,
    single: SingleArtifactAnalyzer,
    aggregator: Aggregator,
    max_chars: usize,
    max_new_tokens: u32,
}

impl JointAnalyzer {
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self::from_config(source, &RuntimeConfig::default())
    }

    pub fn from_config(source: Arc<dyn TextSource>, config: &RuntimeConfig) -> Self {
        Self {
            single: SingleArtifactAnalyzer::from_config(Arc::clone(&source), config),
            source,
            aggregator: Aggregator::new(),
            max_chars: config.limits.joint_chars,
            max_new_tokens: config.tokens.joint,
        }
    }

    pub fn ladder(&self) -> &'static [JointStrategy] {
        if self.source.is_available() {
            FULL_LADDER
        } else {
            SPLIT_ONLY
        }
    }

    pub async fn analyze(&self, artifacts: &Artifacts) -> Report {
        for &strategy in self.ladder() {
            match self.attempt(strategy, artifacts).await {
                Attempt::Produced(report) => {
                    tracing::info!(strategy = %strategy, overall_status = %report.overall_status(), "Joint analysis complete");
                    return report;
                }
                Attempt::Unusable(reason) => {
                    tracing::warn!(strategy = %strategy, reason = %reason, "Joint output unusable, analyzing artifacts separately");
                }
            }
        }

        // Every ladder ends in PerArtifact, which always produces.
        self.single.analyze_split(artifacts).await
    }

    async fn attempt(&self, strategy: JointStrategy, artifacts: &Artifacts) -> Attempt<Report> {
        match strategy {
            JointStrategy::Combined => self.combined(artifacts).await,
            JointStrategy::PerArtifact => Attempt::Produced(self.single.analyze_split(artifacts).await),
        }
    }

    async fn combined(&self, artifacts: &Artifacts) -> Attempt<Report> {
        let body = |kind| truncate_chars(artifacts.content(kind), self.max_chars);
        let prompt = prompts::joint_prompt(
            body(ArtifactKind::Bpmn),
            body(ArtifactKind::OpenApi),
            body(ArtifactKind::Puml),
        );

        tracing::info!(len = prompt.len(), "Generating joint analysis");
        let output = self.source.generate(&prompt, self.max_new_tokens).await;
        tracing::info!(len = output.len(), "Generated text");

        let object = match read_model_object(&output) {
            Ok(object) => object,
            Err(reason) => return Attempt::Unusable(reason),
        };

        let results: Result<Vec<_>, _> = REPORT_KINDS
            .iter()
            .map(|&kind| section_result(kind, object.get(kind.as_str())).map(|result| (kind, result)))
            .collect();

        match results {
            Ok(results) => Attempt::Produced(self.aggregator.aggregate(results)),
            Err(reason) => Attempt::Unusable(reason),
        }
    }
}

/// Turn one model-produced section into a result.
///
/// A missing, `null` or empty section reads as `{}`. Any other non-object
/// value makes the whole output unusable. Status is always recomputed; a
/// model-written summary is kept when non-blank.
fn section_result(
    kind: ArtifactKind,
    section: Option<&JsonValue>,
) -> Result<AnalysisResult, UnusableOutput> {
    match section {
        Some(section @ JsonValue::Object(_)) => {
            let summary = section
                .get("summary")
                .and_then(JsonValue::as_str)
                .map(str::to_owned);
            Ok(AnalysisResult::with_summary(Findings::from_json(section), summary))
        }
        Some(value) if !is_empty_value(value) => Err(UnusableOutput::NonObjectSection(kind)),
        _ => Ok(AnalysisResult::with_summary(Findings::new(), None)),
    }
}

impl fmt::Debug for JointAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JointAnalyzer")
            .field("source", &self.source.name())
            .field("max_chars", &self.max_chars)
            .field("max_new_tokens", &self.max_new_tokens)
            .finish()
    }
}
