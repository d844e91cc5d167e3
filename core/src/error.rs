//! Error types for the Wikimedia API client.
//!
//! # Design
//! Every public operation fails with a single `ApiError`. The variant says
//! which layer gave up: the caller's arguments, the transport (including any
//! non-2xx status), JSON decoding, or the top-level response shape. Each
//! variant names the `Operation` that failed, and the URL where a request
//! was built, so a failure can be diagnosed without replaying it.

use std::fmt;

use thiserror::Error;

/// The client operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Building a client, project or language value.
    Configure,
    FetchPage,
    PageLanguages,
    PageFiles,
    PageHistory,
    FetchRevision,
    Search,
    FetchFile,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Configure => "configure",
            Operation::FetchPage => "fetch page",
            Operation::PageLanguages => "get page languages",
            Operation::PageFiles => "fetch page files",
            Operation::PageHistory => "get page history",
            Operation::FetchRevision => "fetch revision",
            Operation::Search => "search",
            Operation::FetchFile => "fetch file",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by `WikiClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller passed contradictory or malformed arguments. No request
    /// was sent.
    #[error("{operation}: invalid argument: {message}")]
    InvalidArgument {
        operation: Operation,
        message: String,
    },

    /// The request did not complete with a 2xx status.
    #[error("{operation}: request to {url} failed: {source}")]
    Transport {
        operation: Operation,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The body was not JSON, or did not fit the expected type.
    #[error("{operation}: could not decode response from {url} (HTTP {status}): {source}")]
    Decode {
        operation: Operation,
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The body was valid JSON but lacked the expected top-level key.
    #[error("{operation}: malformed response from {url}: missing key {key:?}")]
    MalformedResponse {
        operation: Operation,
        url: String,
        key: &'static str,
    },
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::InvalidArgument { operation, .. }
            | ApiError::Transport { operation, .. }
            | ApiError::Decode { operation, .. }
            | ApiError::MalformedResponse { operation, .. } => *operation,
        }
    }

    /// The HTTP status of a failed request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport {
                source: TransportError::Status { status, .. },
                ..
            } => Some(*status),
            ApiError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures reported by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a status outside `200..300`.
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response: DNS, connect, TLS, timeout or
    /// a body read error.
    #[error(transparent)]
    Io(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn io(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TransportError::Io(err.into())
    }
}
