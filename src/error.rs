//! Error types for the fetch, parse and resolve stages.
//!
//! Errors are recovered at the smallest unit that keeps the output correct:
//! an [`ItemParseError`] drops one item, a [`ParseError`] or an exhausted
//! [`FetchError`] drops one source, and nothing here aborts a run.

use std::fmt;
use thiserror::Error;

/// Failure of a single HTTP attempt, or of a whole fetch once retries are spent.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the per-request timeout.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// The connection could not be established or was dropped.
    #[error("connection error for {url}: {message}")]
    Connection { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read.
    #[error("failed reading body of {url}: {message}")]
    Body { url: String, message: String },

    /// Every attempt failed; carries the last underlying error.
    #[error("giving up on {url} after {attempts} attempt(s)")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Classify a reqwest error raised while sending a request.
    pub fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout { url: url.to_string() }
        } else if let Some(status) = e.status() {
            Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Connection {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }

    /// The underlying cause, unwrapping [`FetchError::Exhausted`].
    pub fn last_cause(&self) -> &FetchError {
        match self {
            Self::Exhausted { last, .. } => last.last_cause(),
            other => other,
        }
    }
}

/// Failure to parse a whole document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// CSS selector parsing failed
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// The strategy cannot handle this kind of document
    #[error("strategy {strategy} does not support {operation}")]
    Unsupported {
        strategy: &'static str,
        operation: &'static str,
    },
}

impl ParseError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }
}

/// Failure confined to one item of a source.
#[derive(Error, Debug)]
pub enum ItemParseError {
    /// The embedded sub-document has no article container.
    #[error("no '{container}' container in {url}")]
    MissingContainer { url: String, container: &'static str },

    /// The embedded sub-document could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The embedded sub-document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
