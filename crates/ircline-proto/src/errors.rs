//! Protocol error types.

use std::io;

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised by the wire protocol layer.
///
/// Inbound framing never fails on content: malformed text is decoded lossily
/// and unterminated data is held or discarded. The only inbound failure is
/// the underlying transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Transport I/O failure surfaced through the codec.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Outbound text contains a CR LF pair before its end.
    ///
    /// Sending it would split one user line into several protocol lines.
    #[error("outbound line contains a line delimiter at byte {position}")]
    EmbeddedDelimiter {
        /// Byte offset of the CR LF pair.
        position: usize,
    },
}
