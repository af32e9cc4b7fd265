//! Parsing of raw, connection-close framed HTTP responses.
//!
//! # Design
//! The header block ends at the first `\r\n\r\n`. Header bytes are decoded
//! as Latin-1 (one byte, one `char`) so no byte sequence can fail to decode.
//! The body is kept as raw bytes and never interpreted.

use std::collections::HashMap;

use tracing::debug;

use crate::error::FetchError;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// A parsed HTTP response.
///
/// Header names keep the case they were received with. When a name repeats,
/// the last value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub message: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Parse the complete bytes received from the server.
    pub fn parse(raw: &[u8]) -> Result<Self, FetchError> {
        let split = find(raw, HEADER_TERMINATOR)
            .ok_or_else(|| FetchError::malformed("no end of headers found"))?;
        let head = latin1(&raw[..split]);
        let body = raw[split + HEADER_TERMINATOR.len()..].to_vec();

        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap_or_default();
        let (status, message) = parse_status_line(status_line)?;

        let mut headers = HashMap::new();
        for line in lines {
            if let Some((name, value)) = line.split_once(": ") {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        debug!(status, ?headers, body_len = body.len(), "parsed response");

        Ok(Self {
            status,
            message,
            headers,
            body,
        })
    }

    /// Case-sensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Split `HTTP/1.1 301 Moved Permanently` into code and free-form message.
fn parse_status_line(line: &str) -> Result<(u16, String), FetchError> {
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next();
    let code = parts
        .next()
        .ok_or_else(|| FetchError::malformed(format!("invalid status line '{line}'")))?;
    let status = code
        .parse::<u16>()
        .map_err(|_| FetchError::malformed(format!("invalid status code '{code}'")))?;
    let message = parts.next().unwrap_or_default().to_string();
    Ok((status, message))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
