//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding input validation failures.
#[derive(Debug)]
pub enum PricesError {
    /// An error from the underlying API client.
    Api(retailprices_api::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl PricesError {
    /// HTTP status of the failed request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(retailprices_api::Error::HttpStatus { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for PricesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for PricesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<retailprices_api::Error> for PricesError {
    fn from(e: retailprices_api::Error) -> Self {
        Self::Api(e)
    }
}
