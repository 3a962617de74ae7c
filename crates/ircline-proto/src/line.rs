//! Protocol line types.
//!
//! [`ProtocolLine`] is what the framer emits for inbound data; it holds raw
//! bytes because the wire carries no encoding guarantee. [`OutboundLine`] is
//! the normalized form of text about to be written to the server.

use std::{borrow::Cow, fmt};

use bytes::{BufMut, Bytes};

use crate::errors::{ProtocolError, Result};

/// Line terminator used in both directions.
pub const DELIMITER: &[u8; 2] = b"\r\n";

/// One complete inbound protocol line, without its CR LF terminator.
///
/// # Invariants
///
/// - Never contains the two-byte sequence CR LF. A lone CR or LF may appear;
///   only the pair is a delimiter.
/// - Immutable once emitted by [`crate::LineFramer`].
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ProtocolLine {
    bytes: Bytes,
}

impl ProtocolLine {
    pub(crate) fn from_bytes(bytes: Bytes) -> Self {
        debug_assert!(!bytes.windows(2).any(|w| w == DELIMITER));
        Self { bytes }
    }

    /// Raw line bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Line bytes as text.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD. This never fails:
    /// a peer sending malformed text must not be able to stop the client.
    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Number of bytes in the line.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the line is empty (two consecutive delimiters on the wire).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ProtocolLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProtocolLine").field(&self.to_text()).finish()
    }
}

impl From<&str> for ProtocolLine {
    /// Build a line from text. Any CR LF pair is rejected in debug builds.
    fn from(text: &str) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(text.as_bytes()))
    }
}

/// A line of user input ready to be sent.
///
/// Trailing CR and LF characters are stripped on construction, so input read
/// with either line-ending convention normalizes to the same wire bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLine {
    text: String,
}

impl OutboundLine {
    /// Normalize `text` into an outbound line.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EmbeddedDelimiter` if a CR LF pair remains after the
    ///   trailing line ending is stripped. A lone CR or LF is ordinary text.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let mut text = text.into();
        let trimmed_len = text.trim_end_matches(['\r', '\n']).len();
        text.truncate(trimmed_len);

        if let Some(position) = text.find("\r\n") {
            return Err(ProtocolError::EmbeddedDelimiter { position });
        }

        Ok(Self { text })
    }

    /// Line text without terminator.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether nothing is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Write the line and its CR LF terminator.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(self.text.as_bytes());
        dst.put_slice(DELIMITER);
    }
}
