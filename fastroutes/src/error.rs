//! Error types for the fastroutes library.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while fetching and ranking routes.
#[derive(Error, Debug)]
pub enum RouteError {
    /// The request could not be sent or the reply could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service replied with a valid payload but a non-OK HTTP status.
    #[error("invalid HTTP response: {status}")]
    HttpStatus { status: StatusCode },

    /// The batch deadline elapsed before the in-flight request completed.
    #[error("route batch did not complete within {0:?}")]
    DeadlineElapsed(Duration),

    /// The service reported a non-success status code.
    #[error("invalid API response: {code} {message}")]
    Api { code: String, message: String },

    /// The reply did not contain exactly one route.
    #[error("invalid number of routes between source and destination: {count}")]
    RouteCount { count: usize },

    /// The reply body is not a well-formed service reply.
    #[error("failed to decode service reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse classification of a [`RouteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, connection, timeout, cancellation or HTTP status failures.
    Transport,
    /// The routing service rejected the query or replied with an unexpected shape.
    Api,
    /// The reply body could not be parsed.
    Decode,
}

impl RouteError {
    /// Returns the class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::Transport(_)
            | RouteError::HttpStatus { .. }
            | RouteError::DeadlineElapsed(_) => ErrorKind::Transport,
            RouteError::Api { .. } | RouteError::RouteCount { .. } => ErrorKind::Api,
            RouteError::Decode(_) => ErrorKind::Decode,
        }
    }
}

/// Result type alias using [`RouteError`].
pub type Result<T> = std::result::Result<T, RouteError>;
