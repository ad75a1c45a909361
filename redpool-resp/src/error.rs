//! Error types for RESP2 encoding and parsing.

/// A RESP2 framing violation.
///
/// Raised on malformed size headers, unknown type tags, and non-decimal
/// bytes in integer positions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Unknown frame type tag.
    #[error("invalid frame type tag: {0:#04x}")]
    InvalidType(u8),

    /// Non-decimal byte in an integer position.
    #[error("invalid integer value")]
    InvalidInteger,

    /// Bulk string size header below -1.
    #[error("invalid bulk string size")]
    InvalidBulkSize,

    /// Array size header below -1.
    #[error("invalid array size")]
    InvalidArraySize,

    /// A line or payload was not terminated by CRLF.
    #[error("missing CRLF terminator")]
    BadLineEnding,
}

/// An error frame (`-ERR ...`) returned by the server.
///
/// Carried verbatim out of a reply; never tears down the connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("server error: {0}")]
pub struct ServerError(pub String);

impl ServerError {
    /// Returns the raw message sent by the server.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Failure while reading frames from a stream: either the transport broke
/// or the bytes violated the protocol.
#[derive(Debug, thiserror::Error)]
pub enum RespError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
