//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Fetch the video or image behind a Pinterest pin.
///
/// Pinfetch resolves a pin URL, discovers its media, and saves the first
/// candidate that fits under the size limit.
#[derive(Parser, Debug)]
#[command(name = "pinfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Pin URL (pinterest.com, a country variant, or pin.it)
    pub url: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory to save media into (default: system temp dir)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum media size in megabytes (1-2048)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..=2048))]
    pub max_size_mb: u64,

    /// Per-request timeout in seconds (1-600)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout_secs: u64,

    /// Connect timeout in seconds (1-120)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=120))]
    pub connect_timeout_secs: u64,

    /// Upstream proxy URL; repeat to give a pool to pick from
    #[arg(long = "proxy", value_name = "URL")]
    pub proxies: Vec<String>,

    /// Give up on the whole resolution after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub deadline_secs: Option<u64>,

    /// Print the result as one JSON object instead of path and message lines
    #[arg(long)]
    pub json: bool,
}
