//! Error types for websift operations.

use thiserror::Error;

/// Errors that can occur while fetching or extracting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// The request was malformed before any I/O happened (bad URL, zero timeout).
    #[error("invalid request: {0}")]
    Request(String),

    /// Transport-level failure: DNS, connect, timeout, or body read.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status. Whether that is fatal
    /// is the caller's decision.
    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Input bytes were inconsistent with the declared format.
    #[error("parse error: {0}")]
    Parse(String),

    /// A selection path or transform template was malformed.
    #[error("template error: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
