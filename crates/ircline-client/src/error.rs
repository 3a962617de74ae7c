//! Client error types.

use std::io;

use ircline_proto::ProtocolError;
use thiserror::Error;

/// Errors that end a client session.
///
/// None of these are retried. Only [`ClientError::Connect`] happens before a
/// session exists; every other variant stops both the receive and the send
/// side.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The initial TCP connection could not be opened.
    #[error("connection to {addr} failed: {source}")]
    Connect {
        /// `host:port` that was dialed.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// Reading from the server failed mid-session.
    #[error("receive failed: {0}")]
    Receive(#[source] ProtocolError),

    /// Writing to the server failed mid-session.
    #[error("send failed: {0}")]
    Send(#[source] ProtocolError),

    /// Reading keyboard input failed.
    #[error("input error: {0}")]
    Input(#[source] io::Error),

    /// Writing to the terminal failed.
    #[error("output error: {0}")]
    Output(#[source] io::Error),

    /// The receive task panicked or was cancelled.
    #[error("receive task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ClientError {
    /// Whether the error happened before any session was established.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }
}
