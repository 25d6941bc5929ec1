use crate::error::{Result, SearchError};
use std::time::Duration;

/// Image-search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `https://pixabay.com/api/`; hits carry `webformatURL`.
    Pixabay,
    /// `https://api.unsplash.com/search/photos`; results carry `urls.regular`.
    Unsplash,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Pixabay => "pixabay",
            Provider::Unsplash => "unsplash",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::Pixabay => "https://pixabay.com/api/",
            Provider::Unsplash => "https://api.unsplash.com/search/photos",
        }
    }

    /// Name of the query parameter that carries the API key.
    pub(crate) fn key_param(&self) -> &'static str {
        match self {
            Provider::Pixabay => "key",
            Provider::Unsplash => "client_id",
        }
    }

    /// Name of the query parameter that carries the search term.
    pub(crate) fn term_param(&self) -> &'static str {
        match self {
            Provider::Pixabay => "q",
            Provider::Unsplash => "query",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the image-search client.
#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    /// Which provider to query
    pub provider: Provider,
    /// Provider API key (Pixabay `key` / Unsplash `client_id`)
    pub api_key: String,
    /// Search endpoint (defaults to the provider's public endpoint)
    pub endpoint: String,
    /// Request timeout (default: 10s)
    pub timeout: Duration,
}

impl ImageSearchConfig {
    /// Create a config for the given provider and API key.
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            endpoint: provider.default_endpoint().to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Pixabay config with the given key.
    pub fn pixabay(api_key: impl Into<String>) -> Self {
        Self::new(Provider::Pixabay, api_key)
    }

    /// Unsplash config with the given access key.
    pub fn unsplash(api_key: impl Into<String>) -> Self {
        Self::new(Provider::Unsplash, api_key)
    }

    /// Read the provider from the environment.
    ///
    /// `PIXABAY_API_KEY` wins when both keys are present, otherwise
    /// `UNSPLASH_ACCESS_KEY` is used.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("PIXABAY_API_KEY") {
            return Ok(Self::pixabay(key));
        }
        if let Some(key) = non_empty("UNSPLASH_ACCESS_KEY") {
            return Ok(Self::unsplash(key));
        }
        Err(SearchError::NotConfigured(
            "set PIXABAY_API_KEY or UNSPLASH_ACCESS_KEY".to_string(),
        ))
    }

    /// Set the search endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn pixabay_preferred_when_both_keys_present() {
        let config =
            ImageSearchConfig::from_lookup(env(&[("PIXABAY_API_KEY", "p"), ("UNSPLASH_ACCESS_KEY", "u")]))
                .unwrap();
        assert_eq!(config.provider, Provider::Pixabay);
        assert_eq!(config.api_key, "p");
    }

    #[test]
    fn unsplash_used_when_pixabay_missing_or_blank() {
        let config =
            ImageSearchConfig::from_lookup(env(&[("PIXABAY_API_KEY", "  "), ("UNSPLASH_ACCESS_KEY", "u")]))
                .unwrap();
        assert_eq!(config.provider, Provider::Unsplash);
        assert_eq!(config.endpoint, "https://api.unsplash.com/search/photos");
    }

    #[test]
    fn missing_keys_is_not_configured() {
        let err = ImageSearchConfig::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, SearchError::NotConfigured(_)));
    }

    #[test]
    fn builder_setters() {
        let config = ImageSearchConfig::pixabay("k")
            .endpoint("http://localhost:9000/api/")
            .timeout(Duration::from_secs(3));
        assert_eq!(config.endpoint, "http://localhost:9000/api/");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
