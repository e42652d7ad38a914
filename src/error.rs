use std::result;

use crate::retry::RetryableError;
use thiserror::Error;

/// Error types for paper retrieval and export
///
/// The affiliation classifier, resolver and formatter never fail, so every
/// variant here originates at the retrieval or export boundary.
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing error with detailed message
    #[error("XML parsing error: {message}")]
    XmlParseError { message: String },

    /// Article not found
    #[error("Article not found: PMID {pmid}")]
    ArticleNotFound { pmid: String },

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// API rate limit exceeded
    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// CSV serialization failed
    #[error("CSV export failed: {0}")]
    CsvError(#[from] csv::Error),

    /// IO error for file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = result::Result<T, PubMedError>;

impl RetryableError for PubMedError {
    fn is_retryable(&self) -> bool {
        match self {
            PubMedError::RequestError(err) => {
                if err.is_timeout() || err.is_connect() {
                    return true;
                }

                if let Some(status) = err.status() {
                    return status.is_server_error() || status.as_u16() == 429;
                }

                // DNS and other network errors
                !err.is_builder() && !err.is_redirect() && !err.is_decode()
            }

            PubMedError::RateLimitExceeded => true,

            PubMedError::ApiError { status, message } => {
                (*status >= 500 && *status < 600) || *status == 429 || {
                    let lower_msg = message.to_lowercase();
                    lower_msg.contains("temporarily unavailable")
                        || lower_msg.contains("timeout")
                        || lower_msg.contains("connection")
                }
            }

            PubMedError::JsonError(_)
            | PubMedError::XmlParseError { .. }
            | PubMedError::ArticleNotFound { .. }
            | PubMedError::InvalidPmid { .. }
            | PubMedError::InvalidQuery(_)
            | PubMedError::CsvError(_)
            | PubMedError::IoError(_) => false,
        }
    }

    fn retry_reason(&self) -> &str {
        if self.is_retryable() {
            match self {
                PubMedError::RequestError(err) if err.is_timeout() => "Request timeout",
                PubMedError::RequestError(err) if err.is_connect() => "Connection error",
                PubMedError::RequestError(_) => "Network error",
                PubMedError::RateLimitExceeded => "Rate limit exceeded",
                PubMedError::ApiError { status, .. } => match status {
                    429 => "Rate limit exceeded",
                    500..=599 => "Server error",
                    _ => "Temporary API error",
                },
                _ => "Transient error",
            }
        } else {
            match self {
                PubMedError::JsonError(_) => "Invalid JSON response",
                PubMedError::XmlParseError { .. } => "Invalid XML response",
                PubMedError::ArticleNotFound { .. } => "Article does not exist",
                PubMedError::InvalidPmid { .. } => "Invalid input",
                PubMedError::InvalidQuery(_) => "Invalid query",
                PubMedError::CsvError(_) | PubMedError::IoError(_) => "Export error",
                _ => "Non-transient error",
            }
        }
    }
}
