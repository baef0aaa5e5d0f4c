//! # CLI Interface
//!
//! Command-line arguments for `waves-block-complexity`, defined with `clap`
//! derive. Every flag can also come from the environment.

use std::time::Duration;

use clap::Parser;

use waves_complexity::config::{DEFAULT_CONCURRENCY, DEFAULT_NODE};

use crate::logging::LogFormat;

/// Sum the script complexity spent by every transaction of a Waves block.
///
/// Prints one line per transaction that spent complexity, then the block
/// total. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "waves-block-complexity",
    about = "Report the total complexity spent by a Waves block",
    version
)]
pub struct ComplexityCli {
    /// Node host or URL. A bare host gets `http://`.
    #[arg(long, env = "WAVES_NODE", default_value = DEFAULT_NODE)]
    pub node: String,

    /// Base58 id (or signature) of the block to scan.
    #[arg(long, env = "WAVES_BLOCK")]
    pub block: String,

    /// Per-request network timeout, e.g. `15s` or `1m 30s`.
    #[arg(long, env = "WAVES_TIMEOUT", default_value = "15s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Maximum number of complexity lookups in flight. `1` is sequential.
    #[arg(
        long,
        env = "WAVES_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = parse_concurrency
    )]
    pub concurrency: usize,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
