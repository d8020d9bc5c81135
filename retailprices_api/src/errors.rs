//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The endpoint or a next-page link could not be parsed as a URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The request never produced a response (connect failure, timeout, body read error).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// The API answered 2xx but the body was not a price page.
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
}
