use crate::error::{RecipeError, Result};
use std::fmt;
use std::time::Duration;

/// Placeholder used when no image can be found for a recipe.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/400x220.png?text=AI+Recipe+Image";

/// Configuration for chat-completion requests.
///
/// `Debug` output never includes the API key.
#[derive(Clone)]
pub struct CompletionConfig {
    /// OpenAI-compatible base URL (`/chat/completions` is appended).
    pub endpoint: String,

    /// Bearer token. Checked before any request is made.
    pub api_key: String,

    pub model: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f64,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.7,
            max_tokens: 600,
            timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("CompletionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &api_key)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CompletionConfig {
    /// Read the configuration from the environment.
    ///
    /// - `GROQ_API_KEY`: required
    /// - `RECIPE_LLM_MODEL`: overrides the model
    /// - `RECIPE_LLM_ENDPOINT`: overrides the base URL
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RecipeError::Configuration("GROQ_API_KEY not set".to_string()))?;

        let mut config = Self::default().with_api_key(api_key);
        if let Some(model) = lookup("RECIPE_LLM_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(endpoint) = lookup("RECIPE_LLM_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for image backfill.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Upper bound for a single image lookup.
    pub task_timeout: Duration,

    /// URL substituted when a lookup fails, times out or finds nothing.
    pub placeholder_url: String,

    /// Search term used for recipes with a blank title.
    pub fallback_term: String,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            task_timeout: Duration::from_secs(8),
            placeholder_url: PLACEHOLDER_IMAGE_URL.to_string(),
            fallback_term: "recipe".to_string(),
        }
    }
}

impl BackfillConfig {
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn with_placeholder(mut self, url: impl Into<String>) -> Self {
        self.placeholder_url = url.into();
        self
    }
}
