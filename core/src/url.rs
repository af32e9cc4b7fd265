//! Minimal absolute-URL parser.
//!
//! Recognizes `scheme://host[:port][/path...]` with a single regex match.
//! No normalization happens: dot segments and percent escapes are passed
//! through untouched. Scheme policy lives in the fetch loop, which rejects
//! anything other than `http`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::FetchError;

pub const DEFAULT_PORT: u16 = 80;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://([^/:]+)(?::(\d+))?(/.*)?$")
        .expect("URL regex is valid") // Static pattern, safe to panic
});

/// The parts of an absolute URL needed to issue a request.
///
/// `path` is never empty and always starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ParsedUrl {
    /// Parse `url`, defaulting the port to 80 and the path to `/`.
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let invalid = || FetchError::InvalidUrl {
            url: url.to_string(),
        };
        let caps = URL_PATTERN.captures(url).ok_or_else(invalid)?;

        let port = match caps.get(3) {
            Some(m) => m.as_str().parse::<u16>().map_err(|_| invalid())?,
            None => DEFAULT_PORT,
        };
        let path = match caps.get(4) {
            Some(m) => m.as_str().to_string(),
            None => "/".to_string(),
        };

        Ok(Self {
            scheme: caps[1].to_string(),
            host: caps[2].to_string(),
            port,
            path,
        })
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if self.port != DEFAULT_PORT {
            write!(f, ":{}", self.port)?;
        }
        f.write_str(&self.path)
    }
}
