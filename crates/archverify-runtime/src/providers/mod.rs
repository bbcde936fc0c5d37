//! Text source abstractions for archverify-runtime.
//!
//! A [`TextSource`] turns a prompt into raw generated text. Sources never
//! return errors to their callers: any failure inside a backend is logged
//! and reported as the empty string, which is the signal for the analyzers
//! to fall back to rule-based validation.
//!
//! Implementations:
//! - [`RemoteSource`]: one HTTP call to a hosted inference endpoint
//! - [`LocalSource`]: bounded greedy generation on a process-owned model
//! - [`NullSource`]: no backend configured
//! - [`ChainedSource`]: tries its sources in order, first non-empty wins
//!
//! ## Security
//!
//! Remote tokens are held in [`ApiCredential`], see the [`secrets`] module.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

mod local;
mod remote;
pub mod secrets;

pub use local::{DecodingParams, LocalModel, LocalSource, LOCAL_MAX_TIME};
pub use remote::{RemoteSource, REMOTE_TIMEOUT};
pub use secrets::ApiCredential;

/// Errors from generation backends.
///
/// These never cross the [`TextSource`] boundary; they exist so backends can
/// use `?` internally and so failures are logged with a reason.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Unrecognized response shape: {0}")]
    UnrecognizedResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Local model failed: {0}")]
    LocalModel(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Produces raw text continuations for prompts.
///
/// # Contract
/// - `generate` never fails; total failure is the empty string
/// - one attempt per call, no retries
/// - timeouts are enforced here, not by callers
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Generate a continuation of `prompt` of at most `max_new_tokens`.
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> String;

    /// Whether a real backend stands behind this source.
    fn is_available(&self) -> bool {
        true
    }

    /// Source name for logs.
    fn name(&self) -> &str;
}

/// Source used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSource;

#[async_trait]
impl TextSource for NullSource {
    async fn generate(&self, _prompt: &str, _max_new_tokens: u32) -> String {
        String::new()
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Tries each source in order and returns the first non-empty output.
pub struct ChainedSource {
    sources: Vec<Arc<dyn TextSource>>,
}

impl ChainedSource {
    pub fn new(sources: Vec<Arc<dyn TextSource>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl TextSource for ChainedSource {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> String {
        for source in self.sources.iter().filter(|s| s.is_available()) {
            let text = source.generate(prompt, max_new_tokens).await;
            if !text.trim().is_empty() {
                return text;
            }
            tracing::debug!(source = source.name(), "Source produced no text, trying next");
        }
        String::new()
    }

    fn is_available(&self) -> bool {
        self.sources.iter().any(|s| s.is_available())
    }

    fn name(&self) -> &str {
        "chain"
    }
}

impl std::fmt::Debug for ChainedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("ChainedSource").field("sources", &names).finish()
    }
}

/// Log a backend failure and turn it into the empty-string signal.
pub(crate) fn empty_on_error(source: &str, result: Result<String, ProviderError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(source, error = %e, "Generation failed, returning empty output");
            String::new()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;

    #[tokio::test]
    async fn test_null_source_is_empty_and_unavailable() {
        let source = NullSource;
        assert!(!source.is_available());
        assert_eq!(source.generate("prompt", 16).await, "");
    }

    #[tokio::test]
    async fn test_chain_returns_first_non_empty() {
        let chain = ChainedSource::new(vec![
            Arc::new(ScriptedSource::new([""])),
            Arc::new(ScriptedSource::new(["{\"errors\": []}"])),
        ]);
        assert!(chain.is_available());
        assert_eq!(chain.generate("p", 16).await, "{\"errors\": []}");
    }

    #[tokio::test]
    async fn test_chain_skips_unavailable_sources() {
        let second = Arc::new(ScriptedSource::new(["text"]));
        let chain = ChainedSource::new(vec![Arc::new(NullSource), second.clone()]);
        assert_eq!(chain.generate("p", 16).await, "text");
        assert_eq!(second.prompts(), vec!["p"]);
    }

    #[tokio::test]
    async fn test_chain_all_failing_is_empty() {
        let chain = ChainedSource::new(vec![Arc::new(ScriptedSource::new(["  "]))]);
        assert_eq!(chain.generate("p", 16).await, "");

        let empty = ChainedSource::new(Vec::new());
        assert!(!empty.is_available());
        assert_eq!(empty.generate("p", 16).await, "");
    }

    #[test]
    fn test_empty_on_error() {
        assert_eq!(empty_on_error("t", Ok("x".into())), "x");
        assert_eq!(
            empty_on_error("t", Err(ProviderError::Timeout(Duration::from_secs(1)))),
            ""
        );
    }
}
