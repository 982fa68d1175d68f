// ABOUTME: HTTP transport error types with SNAFU pattern.
// ABOUTME: Separates connection failures, non-2xx statuses, and undecodable bodies.

use reqwest::{Method, StatusCode};
use snafu::Snafu;

/// Failure of a single JSON-over-HTTP call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HttpError {
    #[snafu(display("{method} {url} failed: {source}"))]
    Transport {
        method: Method,
        url: String,
        source: reqwest::Error,
    },

    #[snafu(display("{method} {url} returned HTTP {status}"))]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: serde_json::Value,
    },

    #[snafu(display("{method} {url} returned a body that is not JSON: {source}"))]
    Decode {
        method: Method,
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("invalid value for header {name}"))]
    InvalidHeader {
        name: &'static str,
        source: reqwest::header::InvalidHeaderValue,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    /// Connection, TLS, or timeout failure before a response was read.
    Transport,
    /// The server answered with a non-2xx status.
    Status,
    /// The response body was not valid JSON.
    Decode,
    /// A credential could not be encoded as a header.
    InvalidHeader,
}

impl HttpError {
    pub fn kind(&self) -> HttpErrorKind {
        match self {
            HttpError::Transport { .. } => HttpErrorKind::Transport,
            HttpError::Status { .. } => HttpErrorKind::Status,
            HttpError::Decode { .. } => HttpErrorKind::Decode,
            HttpError::InvalidHeader { .. } => HttpErrorKind::InvalidHeader,
        }
    }

    /// HTTP status code, if the server answered with a non-2xx status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body, if the server answered with a non-2xx status.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            HttpError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True when the per-call timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Transport { source, .. } if source.is_timeout())
    }
}
