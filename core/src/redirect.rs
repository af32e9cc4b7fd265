//! Resolution of `Location` header values against the URL that produced them.
//!
//! Three shapes are handled: absolute `http://` targets, host-relative
//! targets starting with `/`, and everything else, which is appended to the
//! base URL after stripping its trailing slashes. There is no dot-segment
//! resolution and the last path segment of the base is never dropped, so
//! `http://a.com/x` + `y` gives `http://a.com/x/y`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FetchError;

static AUTHORITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(http://[^/]+)").expect("authority regex is valid") // Static pattern, safe to panic
});

/// Compute the next absolute URL to fetch.
pub fn resolve(base_url: &str, location: &str) -> Result<String, FetchError> {
    if location.starts_with("http://") {
        return Ok(location.to_string());
    }

    if location.starts_with('/') {
        let authority = AUTHORITY_PATTERN
            .captures(base_url)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| FetchError::InvalidBaseUrl {
                url: base_url.to_string(),
            })?;
        return Ok(format!("{}{location}", authority.as_str()));
    }

    Ok(format!("{}/{location}", base_url.trim_end_matches('/')))
}
