use std::time::Duration;

pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// Upper bound on tokens the model may generate per turn
    pub max_tokens: u32,
    /// Text placed before the thought instead of the default analysis request
    pub prompt_template: Option<String>,
    /// Budget shared by both turns of a run
    pub timeout: Duration,
}

impl ConversationConfig {
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_prompt_template<S: Into<String>>(mut self, template: Option<S>) -> Self {
        self.prompt_template = template.map(Into::into);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            prompt_template: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
