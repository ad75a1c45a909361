//! Client error taxonomy.
//!
//! Errors are classified by who can act on them: sticky connection
//! errors (IO, protocol, closed) short-circuit every later call on the
//! same connection; pool errors are terminal (`PoolClosed`) or retryable
//! (`DeadlineExceeded`); server errors surface inside replies and never
//! tear down the connection.

use std::sync::Arc;

use redpool_resp::{ProtocolError, RespError, ServerError};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by connections and pools.
///
/// The enum is `Clone` so a degraded connection can keep returning its
/// sticky error; IO errors are held behind `Arc` for that reason.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The connection drops server responses and cannot read replies.
    #[error("write-only connection")]
    WriteOnly,

    /// The connection was closed, explicitly or after a failure.
    #[error("connection closed")]
    ConnClosed,

    /// The pool was closed; no further acquisitions are possible.
    #[error("pool closed")]
    PoolClosed,

    /// The acquire deadline passed before an idle connection appeared.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A blocking command ran out of server-side time.
    ///
    /// The server reports this as a RESP null, indistinguishable from
    /// other nulls; only the blocking helpers translate it.
    #[error("blocking command timed out")]
    Timeout,

    /// Malformed RESP framing from the server.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An error reply carried verbatim from the server.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Network or IO failure while reading or writing.
    #[error("io error: {0}")]
    Io(Arc<std::io::Error>),

    /// A reply did not match the shape the helper expected.
    #[error("unexpected response")]
    UnexpectedResponse,

    /// A configuration URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// True for server-side blocking-command timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl From<RespError> for Error {
    fn from(err: RespError) -> Self {
        match err {
            RespError::Io(err) => err.into(),
            RespError::Protocol(err) => err.into(),
        }
    }
}
