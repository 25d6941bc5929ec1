use thiserror::Error;

/// Errors returned by image-search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// No API key was configured for the selected provider.
    #[error("Image search not configured: {0}")]
    NotConfigured(String),

    /// The provider returned a non-success HTTP status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape the provider documents.
    #[error("Invalid response from {0}: {1}")]
    InvalidResponse(&'static str, String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SearchError>;
