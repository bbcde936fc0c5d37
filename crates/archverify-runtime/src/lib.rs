//! # archverify-runtime
//!
//! Model-assisted verification for archverify.
//!
//! This crate layers optional text generation over the deterministic checks
//! in `archverify-core`. A model is asked for findings as JSON; whenever the
//! backend is missing, fails, times out or returns something unusable, the
//! rule-based checks answer instead.
//!
//! ## Important
//!
//! A backend is never required. With no backend configured the pipeline
//! produces exactly what `archverify_core::verify` produces.
//!
//! ## Example
//!
//! ```rust,ignore
//! use archverify_core::Artifacts;
//! use archverify_runtime::{Pipeline, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_file("archverify.yaml")?.with_env_overrides();
//! let pipeline = Pipeline::builder().config(config).build()?;
//!
//! let artifacts = Artifacts::new()
//!     .with_openapi(openapi_json)
//!     .with_bpmn(bpmn_xml);
//! let report = pipeline.analyze(&artifacts).await?;
//! ```

pub mod analyzer;
pub mod config;
pub mod joint;
pub mod pipeline;
pub mod prompts;
pub mod providers;

pub use analyzer::{Attempt, SingleArtifactAnalyzer, Strategy, UnusableOutput};
pub use config::{BackendConfig, ConfigError, RemoteSettings, RuntimeConfig};
pub use joint::{JointAnalyzer, JointStrategy};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineError};
pub use providers::{
    ApiCredential, ChainedSource, DecodingParams, LocalModel, LocalSource, NullSource,
    ProviderError, RemoteSource, TextSource,
};
