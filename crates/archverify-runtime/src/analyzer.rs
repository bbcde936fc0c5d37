//! Single-artifact analysis.
//!
//! Each artifact walks an ordered ladder of strategies until one produces a
//! result. Rule-based validation is always the last rung and always
//! produces, so analysis never fails.

use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use archverify_core::{
    locate_json_object, truncate_chars, Aggregator, AnalysisResult, ArtifactKind, Artifacts,
    Extraction, Findings, Report, RuleValidator, REPORT_KINDS,
};

use crate::config::RuntimeConfig;
use crate::prompts;
use crate::providers::TextSource;

/// One way of producing an [`AnalysisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Ask the text source and parse its JSON.
    Generative,
    /// Deterministic structural checks.
    RuleBased,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Generative => f.write_str("generative"),
            Strategy::RuleBased => f.write_str("rule_based"),
        }
    }
}

const FULL_LADDER: &[Strategy] = &[Strategy::Generative, Strategy::RuleBased];
const RULES_ONLY: &[Strategy] = &[Strategy::RuleBased];

/// Why model output could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnusableOutput {
    #[error("backend returned no text")]
    EmptyOutput,

    #[error("model output is not a valid JSON object: {0}")]
    Malformed(String),

    #[error("model output has a non-object {0} section")]
    NonObjectSection(ArtifactKind),
}

/// Outcome of one strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    Produced(T),
    Unusable(UnusableOutput),
}

/// Read the JSON object out of raw model output.
///
/// Empty output and a malformed candidate are unusable. Output with no
/// object at all reads as the empty object.
pub(crate) fn read_model_object(output: &str) -> Result<Map<String, JsonValue>, UnusableOutput> {
    if output.trim().is_empty() {
        return Err(UnusableOutput::EmptyOutput);
    }

    match locate_json_object(output) {
        Extraction::Object(object) => Ok(object),
        Extraction::NotFound => {
            tracing::debug!(len = output.len(), "No JSON object in model output, reading as empty");
            Ok(Map::new())
        }
        Extraction::Malformed { candidate, reason } => {
            tracing::debug!(candidate_len = candidate.len(), reason = %reason, "Malformed JSON candidate");
            Err(UnusableOutput::Malformed(reason))
        }
    }
}

/// Analyzes one artifact at a time.
#[derive(Clone)]
pub struct SingleArtifactAnalyzer {
    source: Arc<dyn TextSource>,
    validator: RuleValidator,
    aggregator: Aggregator,
    max_chars: usize,
    max_new_tokens: u32,
}

impl SingleArtifactAnalyzer {
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self::from_config(source, &RuntimeConfig::default())
    }

    pub fn from_config(source: Arc<dyn TextSource>, config: &RuntimeConfig) -> Self {
        Self {
            source,
            validator: RuleValidator::new(),
            aggregator: Aggregator::new(),
            max_chars: config.limits.single_chars,
            max_new_tokens: config.tokens.single,
        }
    }

    /// Strategies tried, in order, for the current backend.
    pub fn ladder(&self) -> &'static [Strategy] {
        if self.source.is_available() {
            FULL_LADDER
        } else {
            RULES_ONLY
        }
    }

    /// Analyze one artifact body.
    pub async fn analyze(&self, kind: ArtifactKind, content: &str) -> AnalysisResult {
        for &strategy in self.ladder() {
            match self.attempt(strategy, kind, content).await {
                Attempt::Produced(result) => {
                    tracing::info!(kind = %kind, strategy = %strategy, status = %result.status(), "Artifact analyzed");
                    return result;
                }
                Attempt::Unusable(reason) => {
                    tracing::warn!(kind = %kind, strategy = %strategy, reason = %reason, "Falling back to next strategy");
                }
            }
        }

        // Every ladder ends in RuleBased, which always produces.
        self.validator.check(kind, content)
    }

    /// Analyze OpenAPI then BPMN independently and aggregate.
    pub async fn analyze_split(&self, artifacts: &Artifacts) -> Report {
        let mut results = Vec::with_capacity(REPORT_KINDS.len());
        for kind in REPORT_KINDS {
            results.push((kind, self.analyze(kind, artifacts.content(kind)).await));
        }
        self.aggregator.aggregate(results)
    }

    async fn attempt(
        &self,
        strategy: Strategy,
        kind: ArtifactKind,
        content: &str,
    ) -> Attempt<AnalysisResult> {
        match strategy {
            Strategy::Generative => self.generate(kind, content).await,
            Strategy::RuleBased => Attempt::Produced(self.validator.check(kind, content)),
        }
    }

    async fn generate(&self, kind: ArtifactKind, content: &str) -> Attempt<AnalysisResult> {
        let body = truncate_chars(content, self.max_chars);
        let prompt = prompts::single_artifact_prompt(kind, body);

        tracing::info!(kind = %kind, len = body.len(), "Generating analysis");
        let output = self.source.generate(&prompt, self.max_new_tokens).await;
        tracing::info!(kind = %kind, len = output.len(), "Generated text");

        match read_model_object(&output) {
            Ok(object) => {
                let findings = Findings::from_json(&JsonValue::Object(object));
                Attempt::Produced(AnalysisResult::new(findings))
            }
            Err(reason) => Attempt::Unusable(reason),
        }
    }
}

impl fmt::Debug for SingleArtifactAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleArtifactAnalyzer")
            .field("source", &self.source.name())
            .field("max_chars", &self.max_chars)
            .field("max_new_tokens", &self.max_new_tokens)
            .finish()
    }
}
