//! Error types for node API calls.

use std::fmt;

use thiserror::Error;

use crate::block::BlockIdError;

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Block,
    Transaction,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Transaction => write!(f, "transaction"),
        }
    }
}

/// Errors that can occur while talking to a node.
///
/// `Transport`, `HttpStatus` and `MalformedResponse` together form the
/// transport family: the node could not be reached or did not answer with
/// something usable. See [`ClientError::is_transport`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client itself could not be built (TLS backend, bad user agent).
    #[error("failed to build HTTP client")]
    Builder(#[source] reqwest::Error),

    /// The identifier supplied by the caller is not a valid id.
    #[error("malformed {kind} id '{id}'")]
    MalformedId {
        kind: ResourceKind,
        id: String,
        #[source]
        source: BlockIdError,
    },

    /// The node answered 404 for the requested resource.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: ResourceKind, id: String },

    /// Connection, timeout, or body-read failure.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with a non-2xx status other than 404.
    #[error("node returned HTTP {status} for {url}: {message}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        message: String,
    },

    /// The node answered 2xx, but the body is not what the API promises.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// The caller's context was cancelled before the call completed.
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::MalformedResponse { .. }
        )
    }

    /// Whether the underlying request failed by hitting the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
