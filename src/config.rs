//! Runtime configuration for the assist services and the model client

use crate::error::{AgriMarketError, Result};
use crate::negotiation::BoundsPolicy;
use std::time::Duration;

/// Public endpoint of the Gemini REST API
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Model used for structured text generation
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
/// Model used for listing images
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-fast-generate-001";
/// Upper bound on a single model call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];
const API_BASE_VAR: &str = "AGRIMARKET_API_BASE";
const TEXT_MODEL_VAR: &str = "AGRIMARKET_TEXT_MODEL";
const IMAGE_MODEL_VAR: &str = "AGRIMARKET_IMAGE_MODEL";

/// Settings shared by every assist component
#[derive(Clone, Debug, PartialEq)]
pub struct AdvisorConfig {
    /// Applied around each outbound service call
    pub timeout: Duration,
    /// What to do when the model ignores the price bounds
    pub bounds_policy: BoundsPolicy,
    /// Concurrent requests allowed in a batch
    pub max_concurrent_requests: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            bounds_policy: BoundsPolicy::Clamp,
            max_concurrent_requests: 4,
        }
    }
}

impl AdvisorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bounds_policy(mut self, policy: BoundsPolicy) -> Self {
        self.bounds_policy = policy;
        self
    }

    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(AgriMarketError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(AgriMarketError::InvalidConfig(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection settings for the hosted Gemini API
#[derive(Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| get(*key))
            .ok_or_else(|| AgriMarketError::MissingConfig(API_KEY_VARS[0].to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(base) = get(API_BASE_VAR) {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(AgriMarketError::InvalidConfig(format!(
                    "{API_BASE_VAR} must be an http(s) URL, got {base}"
                )));
            }
            config.api_base = base;
        }
        if let Some(model) = get(TEXT_MODEL_VAR) {
            config.text_model = model;
        }
        if let Some(model) = get(IMAGE_MODEL_VAR) {
            config.image_model = model;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_advisor_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.bounds_policy, BoundsPolicy::Clamp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_advisor_validation() {
        let zero_timeout = AdvisorConfig::default().with_timeout(Duration::ZERO);
        assert!(matches!(
            zero_timeout.validate(),
            Err(AgriMarketError::InvalidConfig(_))
        ));

        let no_concurrency = AdvisorConfig::default().with_max_concurrent_requests(0);
        assert!(no_concurrency.validate().is_err());
    }

    #[test]
    fn test_gemini_from_lookup_defaults() {
        let config = GeminiConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k-123")])).unwrap();

        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_gemini_fallback_key_and_overrides() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "  "),
            ("GOOGLE_API_KEY", "g-456"),
            ("AGRIMARKET_API_BASE", "http://localhost:8080"),
            ("AGRIMARKET_TEXT_MODEL", "gemini-test"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "g-456");
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.text_model, "gemini-test");
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_gemini_missing_key() {
        let result = GeminiConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(AgriMarketError::MissingConfig(key)) if key == "GEMINI_API_KEY"));
    }

    #[test]
    fn test_gemini_rejects_bad_base() {
        let result = GeminiConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("AGRIMARKET_API_BASE", "ftp://nope"),
        ]));
        assert!(matches!(result, Err(AgriMarketError::InvalidConfig(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig::new("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
