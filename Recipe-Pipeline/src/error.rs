use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeError {
    /// A required key or setting is missing; nothing was attempted.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    #[error("LLM returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The completion text did not contain a parseable recipe array.
    #[error("Failed to parse LLM output: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document store error: {0}")]
    Store(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Image search failed: {0}")]
    ImageSearch(#[from] image_search::SearchError),

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("A generation request is already in flight")]
    AlreadyInFlight,

    #[error("Operation was cancelled")]
    Cancelled,
}

impl RecipeError {
    /// True for failures reaching the LLM endpoint (connection or non-2xx).
    pub fn is_network(&self) -> bool {
        matches!(self, RecipeError::Network { .. } | RecipeError::Http { .. })
    }

    /// True when the model answered but its output could not be parsed.
    pub fn is_parse(&self) -> bool {
        matches!(self, RecipeError::Parse(_) | RecipeError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, RecipeError>;
