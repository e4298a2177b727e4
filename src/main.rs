//! CLI entry point for pinfetch.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pinfetch_core::{MediaResolver, ResolverConfig, SessionConfig, SizeLimit};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

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

    let limit = SizeLimit::from_megabytes(args.max_size_mb)
        .context("--max-size-mb must be greater than zero")?;

    let session = SessionConfig::default()
        .with_request_timeout(Duration::from_secs(args.timeout_secs))
        .with_connect_timeout(Duration::from_secs(args.connect_timeout_secs))
        .with_proxies(args.proxies.iter().cloned());

    let mut config = ResolverConfig::default().with_session(session);
    if let Some(dir) = &args.output_dir {
        config = config.with_output_dir(dir);
    }
    info!(output_dir = %config.output_dir.display(), %limit, "pinfetch starting");

    let mut resolver = MediaResolver::new(config);
    let outcome = match args.deadline_secs {
        Some(secs) => {
            resolver
                .resolve_within(&args.url, limit, Duration::from_secs(secs))
                .await
        }
        None => resolver.resolve(&args.url, limit).await,
    };

    match outcome {
        Ok(media) if args.json => {
            println!("{}", serde_json::to_string(&media)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(media) => {
            println!("{}", media.path.display());
            println!("{}", media.message());
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("{error}");
            Ok(ExitCode::FAILURE)
        }
    }
}
