//! Error types for extraction operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while extracting data from the GitHub API.
#[derive(Debug, Clone, Error)]
pub enum ExtractorError {
    /// The API rejected the credential (HTTP 401).
    #[error("Authentication failed: Bad credentials")]
    Authentication,

    /// A token is required but none was configured.
    #[error("A token must be provided to {action}")]
    MissingToken { action: String },

    /// An organisation-scoped operation was invoked without an org name.
    #[error("Organization name is required")]
    MissingOrgName,

    /// Resource absent, or the token lacks the scope to see it.
    #[error("Resource not found for URL: {url}")]
    NotFound { url: String },

    /// The API signalled quota exhaustion.
    #[error("Rate limit exceeded for {url}")]
    RateLimitExceeded {
        url: String,
        reset_at: Option<DateTime<Utc>>,
    },

    /// A single request exceeded the configured deadline.
    #[error("Request timed out after {seconds} seconds")]
    RequestTimeout { seconds: u64 },

    /// Any other non-success transport or HTTP outcome.
    #[error("Request error: {message}")]
    Request { message: String },

    /// A configured include/exclude pattern does not compile.
    #[error("Invalid name pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A response body did not match the expected record shape.
    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ExtractorError {
    /// Create a missing-token error for the given action.
    #[inline]
    pub fn missing_token(action: impl Into<String>) -> Self {
        Self::MissingToken {
            action: action.into(),
        }
    }

    /// Create a not found error.
    #[inline]
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Create a general request error.
    #[inline]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Whether this error invalidates the whole session.
    ///
    /// Fatal errors always abort the in-flight operation, even inside
    /// fan-out loops that otherwise attach failures to the item.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication | Self::RateLimitExceeded { .. })
    }

    /// Check if this error is a rate limit error.
    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }

    /// Stable name of the error kind, used in attached sub-errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication => "AuthenticationError",
            Self::MissingToken { .. } => "MissingTokenError",
            Self::MissingOrgName => "MissingOrgNameError",
            Self::NotFound { .. } => "NotFoundError",
            Self::RateLimitExceeded { .. } => "RateLimitExceededError",
            Self::RequestTimeout { .. } => "RequestTimeoutError",
            Self::Request { .. } => "RequestError",
            Self::InvalidPattern { .. } => "InvalidPatternError",
            Self::Decode { .. } => "DecodeError",
        }
    }
}

/// A non-fatal failure recorded against a single item instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubError {
    /// Error kind name, see [`ExtractorError::kind`].
    pub error_type: String,
    /// Human readable message.
    pub error: String,
}

impl From<&ExtractorError> for SubError {
    fn from(err: &ExtractorError) -> Self {
        Self {
            error_type: err.kind().to_string(),
            error: short_error_message(err),
        }
    }
}

/// Split an error into "propagate" or "attach".
///
/// Fatal errors come back as `Err`; everything else becomes a [`SubError`].
pub fn attach_or_propagate(err: ExtractorError) -> Result<SubError> {
    if err.is_fatal() {
        Err(err)
    } else {
        Ok(SubError::from(&err))
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;
