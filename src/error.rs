//! Error types for conversion and upload operations

use std::fmt;

/// Errors that can occur while turning HTML bytes into a statement tree.
///
/// The tree renderer itself is infallible: malformed structure degrades to
/// absent sections and skipped resources rather than errors. Only the parse
/// front-end (encoding, empty input) reports failure through this type.
#[derive(Debug)]
pub enum ConversionError {
    /// HTML parsing failed
    ParseError(String),
    /// Character encoding error
    EncodingError(String),
    /// Invalid input data
    InvalidInput(String),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConversionError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            ConversionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {}

/// Errors surfaced by the Polygon API client.
///
/// `Api` carries the `comment` field of a non-OK response envelope; the other
/// variants are transport- or decoding-level failures around the call itself.
#[derive(Debug)]
pub enum PolygonError {
    /// HTTP transport failure (connect, TLS, non-2xx status)
    Transport(String),
    /// Response body was not the expected JSON envelope
    Json(String),
    /// The API answered with a non-OK status
    Api(String),
    /// Credentials file missing or malformed
    Config(String),
    /// Local I/O failure while preparing a request
    Io(std::io::Error),
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonError::Transport(msg) => write!(f, "Polygon transport error: {}", msg),
            PolygonError::Json(msg) => write!(f, "Polygon response is not valid JSON: {}", msg),
            PolygonError::Api(msg) => write!(f, "Polygon API error: {}", msg),
            PolygonError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PolygonError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for PolygonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolygonError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PolygonError {
    fn from(err: std::io::Error) -> Self {
        PolygonError::Io(err)
    }
}

impl From<reqwest::Error> for PolygonError {
    fn from(err: reqwest::Error) -> Self {
        PolygonError::Transport(err.to_string())
    }
}
