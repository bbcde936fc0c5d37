//! Credential handling for remote inference.
//!
//! Inference tokens are wrapped in [`ApiCredential`] as soon as they are read:
//!
//! - `Debug` never prints the value
//! - the value is zeroed on drop through `secrecy`
//! - reading it requires an explicit call to [`ApiCredential::expose`]
//!
//! ```ignore
//! if let Some(token) = ApiCredential::from_env_optional("HF_TOKEN", "inference token") {
//!     request = request.bearer_auth(token.expose());
//! }
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            name,
        }
    }

    /// Load a credential if the variable is set and non-empty.
    ///
    /// Remote inference works anonymously (with tighter rate limits), so a
    /// missing token is not an error.
    pub fn from_env_optional(env_var: &str, name: &'static str) -> Option<Self> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| Self::new(v, name))
    }

    /// Expose the value at the point of use. Never store the result.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let cred = ApiCredential::new("hf_secret_value", "token");
        let debug = format!("{:?}", cred);

        assert!(!debug.contains("hf_secret_value"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("token"));
    }

    #[test]
    fn test_expose_returns_value() {
        let cred = ApiCredential::new("abc", "token");
        assert_eq!(cred.expose(), "abc");
    }

    #[test]
    fn test_missing_env_var_is_anonymous() {
        let var = "ARCHVERIFY_TEST_TOKEN_THAT_IS_NEVER_SET";
        assert!(ApiCredential::from_env_optional(var, "token").is_none());
    }
}
