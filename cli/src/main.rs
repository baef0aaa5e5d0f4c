// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Waves Block Complexity
//!
//! Entry point for the `waves-block-complexity` binary. Parses arguments,
//! initializes logging, scans one block and prints its complexity report.
//!
//! Exit status is `0` on success, `130` when interrupted by SIGINT or
//! SIGTERM, and `1` for any other failure.

mod cli;
mod logging;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;

use waves_complexity::client::{ClientConfig, ClientError, NodeClient};
use waves_complexity::config::{EXIT_CANCELLED, EXIT_FAILURE};
use waves_complexity::context::{self, CancelContext};
use waves_complexity::{endpoint, report, scan};

use cli::ComplexityCli;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ComplexityCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, args.log_format);

    let (handle, ctx) = context::channel();
    let signals = tokio::spawn(async move {
        shutdown_signal().await;
        tracing::warn!("interrupt received, cancelling in-flight requests");
        handle.cancel();
    });

    let outcome = run(&args, &ctx).await;
    signals.abort();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            if code == EXIT_CANCELLED {
                tracing::warn!("{err:#}");
            } else {
                tracing::error!("{err:#}");
            }
            ExitCode::from(code)
        }
    }
}

/// Resolves the node, scans the block and writes the report to stdout.
async fn run(args: &ComplexityCli, ctx: &CancelContext) -> Result<()> {
    let base_url = endpoint::resolve(&args.node)
        .with_context(|| format!("invalid node URL '{}'", args.node))?;

    tracing::info!(
        node = %base_url,
        block = %args.block,
        timeout = ?args.timeout,
        concurrency = args.concurrency,
        "starting block complexity scan"
    );

    let node = NodeClient::new(ClientConfig::new(base_url, args.timeout))
        .context("failed to create node client")?;

    let scanned = scan::scan_block(ctx, &node, &args.block, args.concurrency).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_report(&mut out, &scanned.result).context("failed to write report")?;
    out.flush().context("failed to write report")?;
    Ok(())
}

/// Maps a failed run to the process exit status.
fn exit_code(err: &anyhow::Error) -> u8 {
    let cancelled = err
        .chain()
        .any(|cause| cause.downcast_ref::<ClientError>().is_some_and(ClientError::is_cancelled));
    if cancelled {
        EXIT_CANCELLED
    } else {
        EXIT_FAILURE
    }
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported. A handler that cannot be
/// installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
