use thiserror::Error;

/// Message shown when a proxy or gateway answered in place of the backend.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the analysis server. Check your network connection.";

/// Message used when a failed JSON error payload carries neither `error` nor `message`.
pub const GENERIC_FAILURE_MESSAGE: &str = "The analysis failed.";

/// Failure of an analysis request, already classified for display.
///
/// The `Display` output is the single string shown to the visitor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Proxy/gateway page or stray HTML instead of a backend answer.
    #[error("{}", CONNECTIVITY_MESSAGE)]
    Connectivity,

    /// Error reported by the backend itself (JSON `error`/`message` field or raw text).
    #[error("{0}")]
    Application(String),

    /// Success status, but the body is not an analysis result.
    #[error("Invalid server response")]
    ResponseFormat,

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Server returned HTTP {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
