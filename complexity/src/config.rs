//! # Constants & Defaults
//!
//! Every magic number the complexity scanner relies on lives here: node
//! defaults, API paths, identifier sizes and the well-known network scheme
//! bytes. Runtime configuration (the node URL, the block, the timeout)
//! arrives through the CLI and is passed explicitly into the client.

// ---------------------------------------------------------------------------
// Node Defaults
// ---------------------------------------------------------------------------

/// Public mainnet node used when no `--node` is given.
pub const DEFAULT_NODE: &str = "nodes.wavesnodes.com";

/// Scheme applied to node addresses that do not specify one.
pub const DEFAULT_URL_SCHEME: &str = "http";

/// URL schemes a node endpoint may use.
pub const SUPPORTED_URL_SCHEMES: [&str; 2] = ["http", "https"];

/// Maximum number of complexity lookups in flight at once.
/// A value of 1 gives strictly sequential lookups.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("waves-complexity/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Process Exit Codes
// ---------------------------------------------------------------------------

/// Any failure other than cancellation.
pub const EXIT_FAILURE: u8 = 1;

/// Interrupted by SIGINT or SIGTERM (128 + SIGINT).
pub const EXIT_CANCELLED: u8 = 130;

// ---------------------------------------------------------------------------
// Node API Paths
// ---------------------------------------------------------------------------

/// `GET {base}/blocks/signature/{blockID}`
pub const BLOCK_BY_ID_PATH: &str = "blocks/signature";

/// `GET {base}/transactions/info/{txID}`
pub const TRANSACTION_INFO_PATH: &str = "transactions/info";

// ---------------------------------------------------------------------------
// Identifier Sizes
// ---------------------------------------------------------------------------

/// Transaction ids and v5 block ids are 32-byte BLAKE2b-256 digests.
pub const DIGEST_LENGTH: usize = 32;

/// Legacy blocks are identified by their 64-byte generator signature.
pub const BLOCK_SIGNATURE_LENGTH: usize = 64;

/// Raw address layout: version (1) | scheme (1) | key hash (20) | checksum (4).
pub const ADDRESS_LENGTH: usize = 26;

/// The only address version the network has ever issued.
pub const ADDRESS_VERSION: u8 = 1;

/// Offset of the scheme byte inside a raw address.
pub const ADDRESS_SCHEME_OFFSET: usize = 1;

// ---------------------------------------------------------------------------
// Network Scheme Bytes
// ---------------------------------------------------------------------------

pub const MAINNET_SCHEME: u8 = b'W';
pub const TESTNET_SCHEME: u8 = b'T';
pub const STAGENET_SCHEME: u8 = b'S';

/// Returns a friendly name for a scheme byte, mainly for logging.
/// Unknown schemes are rendered as the character plus its hex value.
pub fn network_name(scheme: u8) -> String {
    match scheme {
        MAINNET_SCHEME => "mainnet".to_string(),
        TESTNET_SCHEME => "testnet".to_string(),
        STAGENET_SCHEME => "stagenet".to_string(),
        other if other.is_ascii_graphic() => {
            format!("custom('{}', 0x{:02X})", other as char, other)
        }
        other => format!("custom(0x{:02X})", other),
    }
}
