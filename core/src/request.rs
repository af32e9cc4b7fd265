//! Wire-format GET requests.
//!
//! # Design
//! Every request carries `Connection: close`, so the server ends the
//! connection after a single response. The transport relies on that to treat
//! end-of-stream as end-of-response, which is why no `Content-Length` or
//! chunked framing exists anywhere in this crate.

pub const USER_AGENT: &str = "SimpleHTTPClient/1.0";

/// A fully rendered HTTP/1.1 GET request: request line, headers, blank line.
///
/// Header order is fixed (`Host`, `Connection`, `User-Agent`) so the bytes
/// are reproducible for a given host and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    bytes: Vec<u8>,
}

impl HttpRequest {
    pub fn get(host: &str, path: &str) -> Self {
        let headers = [
            format!("Host: {host}"),
            "Connection: close".to_string(),
            format!("User-Agent: {USER_AGENT}"),
        ];
        let text = format!("GET {path} HTTP/1.1\r\n{}\r\n\r\n", headers.join("\r\n"));
        Self {
            bytes: text.into_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
