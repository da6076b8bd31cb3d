//! Error types for annotation recording and submission.

use thiserror::Error;

/// Errors surfaced while recording or submitting an annotation
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// `create()` was called before the named timestamp was captured
    #[error("timestamp not captured: `{0}` is unset")]
    MissingTimestamp(&'static str),

    /// Transport-level failure from the underlying HTTP client
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API accepted the request but returned a non-success status
    #[error("API rejected {url} with status {status}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
