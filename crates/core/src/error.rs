use thiserror::Error;

/// Error type for fetches against the hero backend.
///
/// Every variant is surfaced to the presentation layer as an explicit error
/// state; none of them are retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HeroError {
    /// The backend has no hero with this id or slug.
    #[error("Hero not found: {id_or_slug}")]
    NotFound { id_or_slug: String },

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl HeroError {
    pub fn not_found(id_or_slug: impl Into<String>) -> Self {
        HeroError::NotFound { id_or_slug: id_or_slug.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HeroError::NotFound { .. })
    }

    /// Whether the UI should offer a retry affordance.
    pub fn is_retryable(&self) -> bool {
        match self {
            HeroError::Network(_) => true,
            HeroError::Server { status, .. } => *status >= 500,
            HeroError::NotFound { .. } | HeroError::Decode(_) => false,
        }
    }
}

/// Convenience result type for fetch operations.
pub type HeroResult<T> = Result<T, HeroError>;
