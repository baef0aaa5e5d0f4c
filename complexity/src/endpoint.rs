//! # Node Endpoint Resolution
//!
//! Turns whatever the operator typed after `--node` into a base URL the
//! client can append API paths to. Accepted forms:
//!
//! ```text
//! nodes.wavesnodes.com            -> http://nodes.wavesnodes.com
//! localhost:6869                  -> http://localhost:6869
//! //10.0.0.5:6869                 -> http://10.0.0.5:6869
//! https://nodes-testnet.wavesnodes.com
//!                                 -> https://nodes-testnet.wavesnodes.com
//! ```
//!
//! Only `http` and `https` are allowed. Resolution is pure: no DNS, no I/O.

use std::borrow::Cow;

use thiserror::Error;
use url::{ParseError, Url};

use crate::config::{DEFAULT_URL_SCHEME, SUPPORTED_URL_SCHEMES};

/// Errors produced while resolving a node endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// The input could not be parsed as a URL at all.
    #[error("invalid node URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// The input parsed, but its scheme is neither `http` nor `https`.
    #[error("unsupported URL scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },
}

/// Resolve a host or URL string into a canonical base URL.
///
/// Inputs without a `//` separator are treated as bare hosts. Inputs without
/// a scheme get [`DEFAULT_URL_SCHEME`], but only when they start with `//`.
/// The result always names a host and never ends in `/`.
pub fn resolve(host_or_url: &str) -> Result<String, EndpointError> {
    let input = host_or_url.trim();
    let candidate: Cow<'_, str> = if input.contains("//") {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("//{input}"))
    };

    let invalid_because = |reason: String| EndpointError::InvalidUrl {
        input: host_or_url.to_string(),
        reason,
    };
    let invalid = |e: ParseError| invalid_because(e.to_string());

    let url = match Url::parse(&candidate) {
        Ok(url) => url,
        // Scheme-relative ("//host"): resolve against the default scheme.
        Err(ParseError::RelativeUrlWithoutBase) if candidate.starts_with("//") => {
            let base = Url::parse(&format!("{DEFAULT_URL_SCHEME}://localhost/")).map_err(invalid)?;
            base.join(&candidate).map_err(invalid)?
        }
        Err(e) => return Err(invalid(e)),
    };

    if !SUPPORTED_URL_SCHEMES.contains(&url.scheme()) {
        return Err(EndpointError::UnsupportedScheme {
            scheme: url.scheme().to_string(),
        });
    }
    if url.host().is_none() {
        return Err(invalid_because("missing host".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
