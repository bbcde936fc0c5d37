//! In-process generation on a model owned by the caller.
//!
//! Model loading is outside this crate. The process builds its model once,
//! wraps it in an `Arc<dyn LocalModel>` and hands it to [`LocalSource`]; the
//! handle is read-only afterwards.
//!
//! Generation is synchronous and CPU-bound, so it runs on tokio's blocking
//! pool under a hard timeout. A call that overruns is abandoned: its thread
//! finishes in the background and the output is discarded.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{empty_on_error, ProviderError, TextSource};

/// Hard bound on one local generation.
pub const LOCAL_MAX_TIME: Duration = Duration::from_secs(45);

/// Decoding settings passed to the model on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingParams {
    pub max_new_tokens: u32,
    pub do_sample: bool,
    pub num_beams: u32,
    pub use_cache: bool,
    /// Return only the continuation, without the prompt.
    pub return_full_text: bool,
    pub max_time: Duration,
}

impl DecodingParams {
    /// Deterministic single-beam decoding.
    pub fn greedy(max_new_tokens: u32, max_time: Duration) -> Self {
        Self {
            max_new_tokens,
            do_sample: false,
            num_beams: 1,
            use_cache: true,
            return_full_text: false,
            max_time,
        }
    }
}

/// A text-generation model loaded into this process.
pub trait LocalModel: Send + Sync {
    /// Continue `prompt`. Called from a blocking thread.
    fn continue_text(&self, prompt: &str, params: &DecodingParams) -> Result<String, ProviderError>;

    fn name(&self) -> &str {
        "local"
    }
}

pub struct LocalSource {
    model: Arc<dyn LocalModel>,
    max_time: Duration,
}

impl LocalSource {
    pub fn new(model: Arc<dyn LocalModel>) -> Self {
        Self {
            model,
            max_time: LOCAL_MAX_TIME,
        }
    }

    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = max_time;
        self
    }

    async fn try_generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String, ProviderError> {
        let model = Arc::clone(&self.model);
        let prompt = prompt.to_owned();
        let params = DecodingParams::greedy(max_new_tokens, self.max_time);

        let task = tokio::task::spawn_blocking(move || model.continue_text(&prompt, &params));

        match tokio::time::timeout(self.max_time, task).await {
            Err(_) => Err(ProviderError::Timeout(self.max_time)),
            Ok(Err(join_error)) => Err(ProviderError::LocalModel(format!(
                "generation task failed: {}",
                join_error
            ))),
            Ok(Ok(result)) => result,
        }
    }
}

impl std::fmt::Debug for LocalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSource")
            .field("model", &self.model.name())
            .field("max_time", &self.max_time)
            .finish()
    }
}

#[async_trait]
impl TextSource for LocalSource {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> String {
        tracing::debug!(model = self.model.name(), prompt_len = prompt.len(), max_new_tokens, "Running local generation");
        empty_on_error(self.name(), self.try_generate(prompt, max_new_tokens).await)
    }

    fn name(&self) -> &str {
        "local"
    }
}
