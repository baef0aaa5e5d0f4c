// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Waves Block Complexity: Core Library
//!
//! Fetches one block from a node's REST API, derives the identifier of each
//! of its transactions, asks the node how much complexity each of them
//! spent, and sums the answers.
//!
//! ## Architecture
//!
//! - **endpoint**: Normalizes `--node` input into a base URL.
//! - **client**: `NodeApi` trait and its `reqwest` implementation.
//! - **context**: Cancellation shared by every network call of a run.
//! - **block** / **transaction**: What the node returns, decoded.
//! - **derive**: Transaction identifiers from content and scheme byte.
//! - **aggregate**: Bounded, order-preserving, fail-fast lookups.
//! - **scan**: The whole pipeline for one block.
//! - **report**: Text output.
//! - **crypto**: Digest type and BLAKE2b-256.
//! - **config**: Constants and defaults.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use waves_complexity::client::{ClientConfig, NodeClient};
//! use waves_complexity::context::CancelContext;
//! use waves_complexity::{endpoint, report, scan};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let base = endpoint::resolve("nodes.wavesnodes.com")?;
//! let node = NodeClient::new(ClientConfig::new(base, Duration::from_secs(15)))?;
//! let ctx = CancelContext::background();
//! let scanned = scan::scan_block(&ctx, &node, "<base58 block id>", 8).await?;
//! report::write_report(&mut std::io::stdout(), &scanned.result)?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod block;
pub mod client;
pub mod complexity;
pub mod config;
pub mod context;
pub mod crypto;
pub mod derive;
pub mod endpoint;
pub mod report;
pub mod scan;
pub mod transaction;

pub use aggregate::{aggregate, AggregateError};
pub use block::{Address, Block, BlockId};
pub use client::{ClientConfig, ClientError, NodeApi, NodeClient};
pub use complexity::{AggregateResult, ComplexityRecord};
pub use context::{CancelContext, CancelHandle};
pub use crypto::Digest;
pub use derive::{derive_ids, DerivationError};
pub use endpoint::{resolve, EndpointError};
pub use scan::{scan_block, BlockComplexity, ScanError};
pub use transaction::{Transaction, TransactionError};
