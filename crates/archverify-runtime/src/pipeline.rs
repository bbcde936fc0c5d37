//! The verification pipeline.
//!
//! A [`Pipeline`] owns the text source chosen at startup and both analyzers.
//! It is read-only after construction and can be shared by reference across
//! requests.

use std::sync::Arc;
use thiserror::Error;

use archverify_core::{
    require_primary, AnalysisResult, ArtifactKind, Artifacts, Profile, Report, VerificationError,
};

use crate::analyzer::SingleArtifactAnalyzer;
use crate::config::{BackendConfig, ConfigError, RuntimeConfig};
use crate::joint::JointAnalyzer;
use crate::providers::{
    ChainedSource, LocalModel, LocalSource, NullSource, ProviderError, RemoteSource, TextSource,
};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0} artifact not provided")]
    MissingArtifact(ArtifactKind),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build text source: {0}")]
    Provider(#[from] ProviderError),
}

impl From<VerificationError> for PipelineError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::MissingArtifact(kind) => PipelineError::MissingArtifact(kind),
        }
    }
}

pub struct Pipeline {
    source: Arc<dyn TextSource>,
    single: SingleArtifactAnalyzer,
    joint: JointAnalyzer,
    profile: Profile,
}

impl Pipeline {
    pub fn new(source: Arc<dyn TextSource>, config: &RuntimeConfig) -> Self {
        Self {
            single: SingleArtifactAnalyzer::from_config(Arc::clone(&source), config),
            joint: JointAnalyzer::from_config(Arc::clone(&source), config),
            source,
            profile: config.profile,
        }
    }

    /// A pipeline with no backend: every analysis is rule-based.
    pub fn rule_based() -> Self {
        Self::new(Arc::new(NullSource), &RuntimeConfig::default())
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Name of the text source, for logs.
    pub fn backend(&self) -> &str {
        self.source.name()
    }

    /// Analyze with the configured profile.
    pub async fn analyze(&self, artifacts: &Artifacts) -> Result<Report, PipelineError> {
        self.analyze_with_profile(artifacts, self.profile).await
    }

    /// Analyze with an explicit profile.
    ///
    /// The only error is a missing OpenAPI artifact. Backend failures and
    /// malformed model output degrade to rule-based checks instead.
    pub async fn analyze_with_profile(
        &self,
        artifacts: &Artifacts,
        profile: Profile,
    ) -> Result<Report, PipelineError> {
        require_primary(artifacts)?;

        tracing::info!(
            profile = %profile,
            backend = self.source.name(),
            available = self.source.is_available(),
            "Starting verification"
        );

        let report = match profile {
            Profile::Joint => self.joint.analyze(artifacts).await,
            Profile::Split => self.single.analyze_split(artifacts).await,
        };

        tracing::info!(
            overall_status = %report.overall_status(),
            total_errors = report.total_errors(),
            total_warnings = report.total_warnings(),
            total_suggestions = report.total_suggestions(),
            "Verification finished"
        );

        Ok(report)
    }

    /// Analyze a single artifact of any kind, PUML included.
    pub async fn check(&self, kind: ArtifactKind, content: &str) -> AnalysisResult {
        self.single.analyze(kind, content).await
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source.name())
            .field("profile", &self.profile)
            .finish()
    }
}

/// Builder for [`Pipeline`].
///
/// An explicit source wins. Otherwise the source is composed from the
/// configured backend and the optional local model: remote first, then
/// local, else the null source.
pub struct PipelineBuilder {
    config: RuntimeConfig,
    source: Option<Arc<dyn TextSource>>,
    local_model: Option<Arc<dyn LocalModel>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            source: None,
            local_model: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(mut self, source: Arc<dyn TextSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach a model already loaded by the process.
    pub fn local_model(mut self, model: Arc<dyn LocalModel>) -> Self {
        self.local_model = Some(model);
        self
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        self.config.validate()?;

        let source = match self.source {
            Some(source) => source,
            None => compose_source(&self.config, self.local_model)?,
        };

        tracing::debug!(backend = source.name(), profile = %self.config.profile, "Pipeline built");
        Ok(Pipeline::new(source, &self.config))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn compose_source(
    config: &RuntimeConfig,
    local_model: Option<Arc<dyn LocalModel>>,
) -> Result<Arc<dyn TextSource>, ProviderError> {
    let mut sources: Vec<Arc<dyn TextSource>> = Vec::new();

    if let BackendConfig::Remote(settings) = &config.backend {
        sources.push(Arc::new(RemoteSource::from_settings(settings)?));
    }
    if let Some(model) = local_model {
        sources.push(Arc::new(LocalSource::new(model).with_max_time(config.local.max_time)));
    }

    if sources.len() > 1 {
        return Ok(Arc::new(ChainedSource::new(sources)));
    }
    Ok(sources
        .pop()
        .unwrap_or_else(|| Arc::new(NullSource) as Arc<dyn TextSource>))
}
