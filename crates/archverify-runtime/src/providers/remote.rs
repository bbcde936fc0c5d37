//! Hosted text-generation endpoint.
//!
//! One POST per call to `{base_url}/models/{model_id}`. The HTTP client is
//! only compiled with the `remote` feature; without it the source reports
//! itself unavailable and the analyzers go straight to rule-based checks.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::Duration;

use super::secrets::ApiCredential;
use super::{empty_on_error, ProviderError, TextSource};
use crate::config::RemoteSettings;

/// Hard bound on one remote call.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Credential name used in log and error messages.
const TOKEN_NAME: &str = "inference API token";

pub struct RemoteSource {
    endpoint: String,
    credential: Option<ApiCredential>,
    timeout: Duration,
    #[cfg(feature = "remote")]
    client: reqwest::Client,
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteSource {
    /// Create a source for `model_id` hosted under `base_url`.
    pub fn new(
        base_url: &str,
        model_id: &str,
        credential: Option<ApiCredential>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if model_id.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "remote model id must not be empty".to_string(),
            ));
        }

        let endpoint = format!("{}/models/{}", base_url.trim_end_matches('/'), model_id.trim());

        #[cfg(feature = "remote")]
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        Ok(Self {
            endpoint,
            credential,
            timeout,
            #[cfg(feature = "remote")]
            client,
        })
    }

    /// Build from configuration, reading the token from its environment variable.
    pub fn from_settings(settings: &RemoteSettings) -> Result<Self, ProviderError> {
        let credential = settings
            .token_env
            .as_deref()
            .and_then(|var| ApiCredential::from_env_optional(var, TOKEN_NAME));

        if credential.is_none() {
            tracing::info!("No inference token found, calling the remote endpoint anonymously");
        }

        Self::new(&settings.base_url, &settings.model_id, credential, settings.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[cfg(feature = "remote")]
    async fn try_generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String, ProviderError> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens,
                temperature: 0.0,
            },
        };

        let mut call = self.client.post(&self.endpoint).json(&request);
        if let Some(credential) = &self.credential {
            call = call.bearer_auth(credential.expose());
        }

        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout)
            } else {
                ProviderError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| ProviderError::UnrecognizedResponse(e.to_string()))?;

        generated_text(&body).ok_or_else(|| ProviderError::UnrecognizedResponse(shape_of(&body)))
    }

    #[cfg(not(feature = "remote"))]
    async fn try_generate(&self, _prompt: &str, _max_new_tokens: u32) -> Result<String, ProviderError> {
        Err(ProviderError::NotConfigured(
            "remote inference requires the 'remote' feature".to_string(),
        ))
    }
}

#[async_trait]
impl TextSource for RemoteSource {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> String {
        tracing::debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), max_new_tokens, "Calling remote endpoint");
        empty_on_error(self.name(), self.try_generate(prompt, max_new_tokens).await)
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "remote")
    }

    fn name(&self) -> &str {
        "remote"
    }
}

#[cfg(feature = "remote")]
#[derive(Debug, serde::Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[cfg(feature = "remote")]
#[derive(Debug, serde::Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
}

/// Read the generated text out of an inference response body.
///
/// Accepts `[{"generated_text": ...}, ...]` and `{"generated_text": ...}`.
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
fn generated_text(body: &JsonValue) -> Option<String> {
    let item = match body {
        JsonValue::Array(items) => items.first()?,
        other => other,
    };
    item.get("generated_text")?.as_str().map(str::to_owned)
}

#[cfg_attr(not(feature = "remote"), allow(dead_code))]
fn shape_of(body: &JsonValue) -> String {
    match body {
        JsonValue::Array(items) => format!("array of {}", items.len()),
        JsonValue::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_text_from_list() {
        let body = json!([{"generated_text": "{\"errors\": []}"}, {"generated_text": "ignored"}]);
        assert_eq!(generated_text(&body).as_deref(), Some("{\"errors\": []}"));
    }

    #[test]
    fn test_generated_text_from_object() {
        let body = json!({"generated_text": "hello"});
        assert_eq!(generated_text(&body).as_deref(), Some("hello"));
    }

    #[test]
    fn test_generated_text_other_shapes() {
        assert_eq!(generated_text(&json!([])), None);
        assert_eq!(generated_text(&json!({"error": "Model is loading"})), None);
        assert_eq!(generated_text(&json!([{"text": "x"}])), None);
        assert_eq!(generated_text(&json!({"generated_text": 7})), None);
    }

    #[test]
    fn test_endpoint_is_joined() {
        let source =
            RemoteSource::new("https://example.test/", "org/model", None, REMOTE_TIMEOUT).unwrap();
        assert_eq!(source.endpoint(), "https://example.test/models/org/model");
        assert_eq!(source.name(), "remote");
    }

    #[test]
    fn test_empty_model_id_rejected() {
        assert!(RemoteSource::new("https://example.test", " ", None, REMOTE_TIMEOUT).is_err());
    }

    #[test]
    fn test_shape_of() {
        assert_eq!(shape_of(&json!({"error": "x"})), "object with keys [error]");
        assert_eq!(shape_of(&json!([])), "array of 0");
    }

    #[cfg(not(feature = "remote"))]
    #[tokio::test]
    async fn test_without_feature_is_unavailable_and_empty() {
        let source = RemoteSource::new("https://example.test", "m", None, REMOTE_TIMEOUT).unwrap();
        assert!(!source.is_available());
        assert_eq!(source.generate("prompt", 8).await, "");
    }
}
