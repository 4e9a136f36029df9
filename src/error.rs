//! Error types for hero image generation.

use std::time::Duration;

/// Longest error body (in characters) kept in an error message.
const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// Why a response could not yield an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyResponseKind {
    /// The response carried no candidates.
    NoCandidates,
    /// The first candidate had no content parts.
    NoParts,
    /// No part carried inline data.
    NoInlineData,
    /// Inline data was present but every payload was zero bytes long.
    EmptyPayload,
}

impl std::fmt::Display for EmptyResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCandidates => write!(f, "no candidates in response"),
            Self::NoParts => write!(f, "no content parts in first candidate"),
            Self::NoInlineData => write!(f, "no inline data in any part"),
            Self::EmptyPayload => write!(f, "every inline data part is empty"),
        }
    }
}

/// Errors that can occur while generating hero images.
#[derive(Debug, thiserror::Error)]
pub enum HeroGenError {
    /// Missing credential or otherwise unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// API key rejected by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limit exceeded. Reported only, never retried.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Server hint from `Retry-After`, if any.
        retry_after: Option<Duration>,
    },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Response arrived but held no usable image.
    #[error("empty response: {0}")]
    EmptyResponse(EmptyResponseKind),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., creating the output directory or writing a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse grouping of errors used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Fatal startup problem; nothing was attempted.
    Configuration,
    /// The provider answered without an image.
    EmptyResponse,
    /// Anything raised by the request, decoding, or file write.
    TransportOrRemote,
}

impl HeroGenError {
    /// Returns the reporting category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::EmptyResponse(_) => ErrorCategory::EmptyResponse,
            _ => ErrorCategory::TransportOrRemote,
        }
    }
}

/// Trims an HTTP error body and caps its length for inclusion in messages.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_ERROR_MESSAGE_CHARS {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(MAX_ERROR_MESSAGE_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/// Reads a `Retry-After` header given in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Result type alias for hero generation operations.
pub type Result<T> = std::result::Result<T, HeroGenError>;
