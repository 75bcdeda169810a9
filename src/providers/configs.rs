use anyhow::Result;
use std::env;

pub const ANTHROPIC_API_HOST: &str = "https://api.anthropic.com";

pub trait ProviderConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => {
                Err(anyhow::anyhow!("Environment variable '{}' is required but not set.", key))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnthropicProviderConfig {
    /// Resolved lazily: a missing key only fails once a request is sent.
    pub api_key: Option<String>,
    pub host: String,
}

impl AnthropicProviderConfig {
    pub fn new(api_key: Option<String>, host: String) -> Self {
        Self { api_key, host }
    }

    /// An explicit key wins over whatever the environment provided.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }
}

impl ProviderConfig for AnthropicProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("ANTHROPIC_API_KEY", false, None)?.filter(|k| !k.is_empty());

        let host = Self::get_env(
            "ANTHROPIC_API_HOST",
            false,
            Some(ANTHROPIC_API_HOST.to_string()),
        )?
        .unwrap_or_else(|| ANTHROPIC_API_HOST.to_string());

        Ok(Self::new(api_key, host))
    }
}
