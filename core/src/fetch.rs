//! The redirect-following fetch loop.
//!
//! # Design
//! `Fetcher` drives one logical fetch: parse the URL, build the request,
//! hand it to the transport, parse the response, then classify the status.
//! A followed redirect advances a loop-local `RedirectState`; every other
//! outcome ends the loop. Errors are returned, never retried.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::redirect;
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::transport::{TcpTransport, Transport, DEFAULT_TIMEOUT};
use crate::url::ParsedUrl;

pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Statuses that are followed via their `Location` header.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// `timeout` is applied by the transport; `Fetcher::tcp` passes it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub max_redirects: u32,
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// How a status code steers the fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

pub fn classify(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Success,
        s if REDIRECT_STATUSES.contains(&s) => StatusClass::Redirect,
        400..=499 => StatusClass::ClientError,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::Unknown,
    }
}

/// The URL currently being fetched and how many redirects led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectState {
    pub current_url: String,
    pub hop_count: u32,
}

impl RedirectState {
    pub fn new(url: &str) -> Self {
        Self {
            current_url: url.to_string(),
            hop_count: 0,
        }
    }

    /// Move to `location`, failing if that would exceed `max_redirects`.
    pub fn advance(self, location: &str, max_redirects: u32) -> Result<Self, FetchError> {
        if self.hop_count + 1 > max_redirects {
            return Err(FetchError::TooManyRedirects { max: max_redirects });
        }
        let next = redirect::resolve(&self.current_url, location)?;
        Ok(Self {
            current_url: next,
            hop_count: self.hop_count + 1,
        })
    }
}

/// The final 200 response plus the chain of URLs that led to it.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub final_url: String,
    pub response: HttpResponse,
    pub redirects: Vec<String>,
}

/// Follows redirects over a `Transport` until a terminal status.
#[derive(Debug)]
pub struct Fetcher<T> {
    transport: T,
    config: FetchConfig,
}

impl Fetcher<TcpTransport> {
    /// A fetcher over plain TCP using `config.timeout` for every connection.
    pub fn tcp(config: FetchConfig) -> Self {
        Self::new(TcpTransport::new(config.timeout), config)
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn fetch(&mut self, url: &str) -> Result<FetchOutcome, FetchError> {
        let mut state = RedirectState::new(url);
        let mut redirects = Vec::new();

        loop {
            let response = self.fetch_once(&state.current_url)?;
            info!(url = %state.current_url, status = response.status, "HTTP status");

            match classify(response.status) {
                StatusClass::Success => {
                    return Ok(FetchOutcome {
                        final_url: state.current_url,
                        response,
                        redirects,
                    });
                }
                StatusClass::Redirect => {
                    let location = response
                        .header("Location")
                        .filter(|location| !location.is_empty())
                        .ok_or(FetchError::MissingRedirectLocation {
                            status: response.status,
                        })?;
                    info!(location, hop = state.hop_count + 1, "redirecting");
                    state = state.advance(location, self.config.max_redirects)?;
                    redirects.push(state.current_url.clone());
                }
                StatusClass::ClientError => {
                    warn!(status = response.status, "client error");
                    return Err(FetchError::ClientError {
                        status: response.status,
                        message: response.message,
                    });
                }
                StatusClass::ServerError => {
                    warn!(status = response.status, "server error");
                    return Err(FetchError::ServerError {
                        status: response.status,
                        message: response.message,
                    });
                }
                StatusClass::Unknown => {
                    warn!(status = response.status, "unexpected status");
                    return Err(FetchError::UnexpectedStatus {
                        status: response.status,
                        message: response.message,
                    });
                }
            }
        }
    }

    /// One hop: no redirect handling, no status interpretation.
    fn fetch_once(&mut self, url: &str) -> Result<HttpResponse, FetchError> {
        let parsed = ParsedUrl::parse(url)?;
        if parsed.scheme != "http" {
            return Err(FetchError::UnsupportedScheme {
                scheme: parsed.scheme,
            });
        }
        debug!(host = %parsed.host, port = parsed.port, path = %parsed.path, "fetching");

        let request = HttpRequest::get(&parsed.host, &parsed.path);
        let raw = self
            .transport
            .fetch(&parsed.host, parsed.port, request.as_bytes())?;
        HttpResponse::parse(&raw)
    }
}

/// Overwrite `path` with `body`. Not atomic: a failed write can leave a
/// partial file behind.
pub fn write_body(path: &Path, body: &[u8]) -> Result<(), FetchError> {
    fs::write(path, body).map_err(|source| FetchError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
