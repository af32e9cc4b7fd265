//! CLI entry point for httpfetch.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fetch_core::{write_body, FetchConfig, Fetcher};
use tracing::{debug, info};

mod cli;

use cli::Args;

fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs).
    // Usage errors exit with 1 like every other failure.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(&args) {
        Ok(bytes) => {
            if !args.quiet {
                println!("Saved {bytes} bytes to {}", args.output.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Fetch `args.url`, then write the body. Returns the number of bytes saved.
fn run(args: &Args) -> Result<usize> {
    let config = FetchConfig::default()
        .with_max_redirects(args.max_redirects)
        .with_timeout(Duration::from_secs(args.timeout));
    let mut fetcher = Fetcher::tcp(config);

    let outcome = fetcher
        .fetch(&args.url)
        .with_context(|| format!("fetching {}", args.url))?;
    info!(
        final_url = %outcome.final_url,
        redirects = outcome.redirects.len(),
        "fetch complete"
    );

    let body = &outcome.response.body;
    write_body(&args.output, body)?;
    Ok(body.len())
}
