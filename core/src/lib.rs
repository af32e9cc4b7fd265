//! Minimal HTTP/1.1 fetch engine.
//!
//! # Overview
//! Fetches a single resource over plain TCP and follows redirects. The
//! protocol pieces are pure functions over strings and bytes; only
//! `TcpTransport` touches the network.
//!
//! # Design
//! - `ParsedUrl::parse` splits `http://host[:port][/path]`.
//! - `HttpRequest::get` renders a byte-exact GET with `Connection: close`,
//!   which lets the transport read until EOF instead of framing the body.
//! - `HttpResponse::parse` splits status line, headers and raw body.
//! - `redirect::resolve` turns a `Location` value into the next URL.
//! - `Fetcher` runs the redirect loop over any `Transport`, so tests can
//!   script responses without sockets.

pub mod error;
pub mod fetch;
pub mod redirect;
pub mod request;
pub mod response;
pub mod transport;
pub mod url;

pub use error::FetchError;
pub use fetch::{
    classify, write_body, FetchConfig, FetchOutcome, Fetcher, RedirectState, StatusClass,
    DEFAULT_MAX_REDIRECTS,
};
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use transport::{TcpTransport, Transport, DEFAULT_TIMEOUT};
pub use url::ParsedUrl;
