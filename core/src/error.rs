//! Error types for the fetch engine.
//!
//! # Design
//! Every failure is terminal: nothing in the engine retries or recovers.
//! Each variant carries enough context for the binary to print a single
//! human-readable line before exiting with a non-zero status.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by URL parsing, response parsing, redirect resolution,
/// the transport, and the fetch loop.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL does not match `scheme://host[:port][/path]`.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// The URL parsed but names a scheme other than `http`.
    #[error("unsupported scheme '{scheme}' (only http is supported)")]
    UnsupportedScheme { scheme: String },

    /// DNS lookup, connect, timeout, or socket I/O failure.
    #[error("connection to {host}:{port} failed: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The received bytes fail the minimal structural checks.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// The redirect chain is longer than the configured maximum.
    #[error("too many redirects (maximum is {max})")]
    TooManyRedirects { max: u32 },

    /// A redirect status arrived without a `Location` header.
    #[error("redirect status {status} without a Location header")]
    MissingRedirectLocation { status: u16 },

    /// A host-relative redirect was received but the base URL has no
    /// `http://` authority to attach it to.
    #[error("cannot resolve redirect against base URL {url}")]
    InvalidBaseUrl { url: String },

    /// The server answered with a 4xx status.
    #[error("client error: {status} {message}")]
    ClientError { status: u16, message: String },

    /// The server answered with a 5xx status.
    #[error("server error: {status} {message}")]
    ServerError { status: u16, message: String },

    /// Any status that is neither 200, a followed redirect, 4xx nor 5xx.
    #[error("unexpected status: {status} {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The response body could not be written to the output file.
    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FetchError::MalformedResponse {
            reason: reason.into(),
        }
    }
}
