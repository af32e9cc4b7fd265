//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use fetch_core::DEFAULT_MAX_REDIRECTS;

/// Fetch a single resource over plain HTTP/1.1 and save the body to a file.
///
/// Redirects (301, 302, 303, 307, 308) are followed up to a fixed limit.
/// Any other non-200 status, a malformed response, or a connection failure
/// ends the run with exit code 1.
#[derive(Parser, Debug)]
#[command(name = "httpfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Absolute http:// URL to fetch
    pub url: String,

    /// File to write the response body to (overwritten)
    pub output: PathBuf,

    /// Maximum number of redirects to follow (0-100)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_REDIRECTS, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub max_redirects: u32,

    /// Connect and read timeout in seconds (1-600)
    #[arg(short = 't', long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
