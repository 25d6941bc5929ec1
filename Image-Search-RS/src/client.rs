use crate::error::{Result, SearchError};
use crate::parser;
use crate::types::ImageSearchConfig;
use reqwest::Client;

/// Async client for a single image-search provider.
///
/// # Example
/// ```no_run
/// use image_search::{ImageSearchClient, ImageSearchConfig};
///
/// # async fn example() -> image_search::Result<()> {
/// let client = ImageSearchClient::new(ImageSearchConfig::pixabay("my-key"));
/// if let Some(url) = client.first_image("lentil soup").await? {
///     println!("{}", url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImageSearchClient {
    http: Client,
    config: ImageSearchConfig,
}

impl ImageSearchClient {
    pub fn new(config: ImageSearchConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Use a custom `reqwest::Client` (for connection pooling, proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &ImageSearchConfig {
        &self.config
    }

    /// Query-string pairs for a search term.
    pub(crate) fn query_params(&self, term: &str) -> Vec<(&'static str, String)> {
        let provider = self.config.provider;
        let mut params = vec![
            (provider.key_param(), self.config.api_key.clone()),
            (provider.term_param(), term.to_string()),
        ];
        match provider {
            crate::Provider::Pixabay => params.push(("image_type", "photo".to_string())),
            crate::Provider::Unsplash => params.push(("page", "1".to_string())),
        }
        params
    }

    /// Search for images matching `term`, returning every usable URL in hit order.
    pub async fn search(&self, term: &str) -> Result<Vec<String>> {
        let provider = self.config.provider;
        if self.config.api_key.trim().is_empty() {
            return Err(SearchError::NotConfigured(format!(
                "{} API key is empty",
                provider
            )));
        }

        tracing::debug!(provider = provider.name(), term, "searching images");

        let resp = self
            .http
            .get(&self.config.endpoint)
            .query(&self.query_params(term))
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| SearchError::Network {
                context: format!("Cannot reach {} at {}", provider, self.config.endpoint),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Http {
                provider: provider.name(),
                status,
                body,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(provider.name(), e.to_string()))?;

        parser::parse_image_urls(provider, &json).ok_or_else(|| {
            SearchError::InvalidResponse(provider.name(), "missing hit array".to_string())
        })
    }

    /// First image URL for `term`, or `None` when the provider found nothing.
    pub async fn first_image(&self, term: &str) -> Result<Option<String>> {
        Ok(self.search(term).await?.into_iter().next())
    }
}
