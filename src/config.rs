use crate::error::EvalError;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "internvl2_5_chemvlm20250306";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where and how to reach the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `CHEM_EVAL_API_URL`, `CHEM_EVAL_API_KEY`, `CHEM_EVAL_MODEL`
    /// and `CHEM_EVAL_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self, EvalError> {
        let api_url = std::env::var("CHEM_EVAL_API_URL")
            .map_err(|_| EvalError::config("CHEM_EVAL_API_URL not set"))?;
        let api_key = std::env::var("CHEM_EVAL_API_KEY")
            .map_err(|_| EvalError::config("CHEM_EVAL_API_KEY not set"))?;
        let model = std::env::var("CHEM_EVAL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let timeout = std::env::var("CHEM_EVAL_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Ok(Self::new(api_url, api_key)
            .with_model(model)
            .with_timeout(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EndpointConfig::new("http://localhost:8000/v1/chat/completions", "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_builders() {
        let config = EndpointConfig::new("http://x", "k")
            .with_model("other")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "other");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    // The only test touching CHEM_EVAL_* variables, so no other test races it.
    #[test]
    fn test_from_env() {
        unsafe {
            std::env::set_var("CHEM_EVAL_API_URL", "http://localhost:9/v1/chat/completions");
            std::env::set_var("CHEM_EVAL_API_KEY", "sk-env");
            std::env::set_var("CHEM_EVAL_MODEL", "env-model");
            std::env::set_var("CHEM_EVAL_TIMEOUT_SECONDS", "7");
        }

        let config = EndpointConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:9/v1/chat/completions");
        assert_eq!(config.api_key, "sk-env");
        assert_eq!(config.model, "env-model");
        assert_eq!(config.timeout, Duration::from_secs(7));

        unsafe {
            std::env::remove_var("CHEM_EVAL_MODEL");
            std::env::set_var("CHEM_EVAL_TIMEOUT_SECONDS", "soon");
        }
        let config = EndpointConfig::from_env().unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        unsafe {
            std::env::remove_var("CHEM_EVAL_API_KEY");
        }
        let err = EndpointConfig::from_env().unwrap_err();
        assert!(matches!(err, EvalError::Config(ref m) if m.contains("CHEM_EVAL_API_KEY")));

        unsafe {
            std::env::remove_var("CHEM_EVAL_API_URL");
            std::env::remove_var("CHEM_EVAL_TIMEOUT_SECONDS");
        }
    }
}
