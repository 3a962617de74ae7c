//! CRLF line framer.
//!
//! TCP delivers a byte stream, not messages. A single read can carry half a
//! line, several lines, or end between the CR and the LF of a delimiter. The
//! [`LineFramer`] accumulates bytes and hands out complete lines only.
//!
//! # Invariants
//!
//! - Completeness: every emitted line was terminated by CR LF on the wire, and
//!   lines come out in arrival order.
//! - Conservation: every ingested byte is either part of an emitted line, part
//!   of a consumed delimiter, or still pending. Nothing is dropped until
//!   [`LineFramer::finish`].
//! - Chunk independence: the emitted lines depend only on the concatenation
//!   of all ingested chunks, never on where the chunks were split.

use bytes::{Buf, BytesMut};

use crate::line::{DELIMITER, ProtocolLine};

/// Initial cursor capacity. Typical IRC lines are capped at 512 bytes.
const INITIAL_CAPACITY: usize = 4096;

/// Reassembles [`ProtocolLine`]s from arbitrarily fragmented input.
///
/// Owned by exactly one reader. The framer does not assume any text encoding
/// and never fails.
#[derive(Debug)]
pub struct LineFramer {
    /// Bytes received but not yet emitted as lines.
    cursor: BytesMut,
    /// Offset in `cursor` before which no delimiter can start.
    ///
    /// Avoids rescanning a long partial line on every small chunk.
    scanned: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self { cursor: BytesMut::with_capacity(INITIAL_CAPACITY), scanned: 0 }
    }

    /// Append a chunk and iterate over the lines that are now complete.
    ///
    /// The returned iterator is lazy. Lines it does not yield stay in the
    /// framer and come out of the next [`LineFramer::ingest`] or
    /// [`LineFramer::next_line`] call.
    pub fn ingest(&mut self, chunk: &[u8]) -> Lines<'_> {
        self.cursor.extend_from_slice(chunk);
        Lines { framer: self }
    }

    /// Append an owned buffer without copying when the cursor is empty.
    pub(crate) fn ingest_buf(&mut self, buf: BytesMut) {
        if self.cursor.is_empty() {
            self.cursor = buf;
        } else {
            self.cursor.extend_from_slice(&buf);
        }
    }

    /// Take the next complete line, if any.
    pub fn next_line(&mut self) -> Option<ProtocolLine> {
        let start = self.scanned;
        let Some(offset) = find_delimiter(self.cursor.get(start..)?) else {
            // A trailing CR may be completed by the next chunk's LF.
            self.scanned = self.cursor.len().saturating_sub(1);
            return None;
        };

        let end = start + offset;
        let line = self.cursor.split_to(end).freeze();
        self.cursor.advance(DELIMITER.len());
        self.scanned = 0;

        Some(ProtocolLine::from_bytes(line))
    }

    /// Bytes held while waiting for a delimiter.
    pub fn pending(&self) -> &[u8] {
        &self.cursor
    }

    /// Drop any unterminated remainder.
    ///
    /// Returns how many bytes were discarded. Used when the stream closes: an
    /// unterminated remainder is not a protocol line.
    pub fn discard_pending(&mut self) -> usize {
        let discarded = self.cursor.len();
        if discarded > 0 {
            tracing::debug!(bytes = discarded, "discarding unterminated data at end of stream");
        }
        self.cursor.clear();
        self.scanned = 0;
        discarded
    }

    /// Close the framer at end of stream.
    ///
    /// Complete lines that were never taken are discarded too; drain the
    /// framer with [`LineFramer::next_line`] first if they matter.
    pub fn finish(mut self) -> usize {
        self.discard_pending()
    }
}

/// Lazy iterator over complete lines held by a [`LineFramer`].
#[derive(Debug)]
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = ProtocolLine;

    fn next(&mut self) -> Option<Self::Item> {
        self.framer.next_line()
    }
}

/// Position of the first CR LF in `haystack`.
fn find_delimiter(haystack: &[u8]) -> Option<usize> {
    haystack.windows(DELIMITER.len()).position(|w| w == DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: impl Iterator<Item = ProtocolLine>) -> Vec<String> {
        lines.map(|l| l.to_text().into_owned()).collect()
    }

    #[test]
    fn single_complete_line() {
        let mut framer = LineFramer::new();
        assert_eq!(texts(framer.ingest(b"PING :x\r\n")), ["PING :x"]);
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn delimiter_split_across_chunks() {
        let mut framer = LineFramer::new();
        assert!(texts(framer.ingest(b"PASS abc\r")).is_empty());
        assert_eq!(framer.pending(), b"PASS abc\r");
        assert_eq!(texts(framer.ingest(b"\n")), ["PASS abc"]);
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn fragmented_pass_command() {
        let mut framer = LineFramer::new();
        let mut out = texts(framer.ingest(b"PAS"));
        out.extend(texts(framer.ingest(b"S a")));
        out.extend(texts(framer.ingest(b"bc\r\n")));
        assert_eq!(out, ["PASS abc"]);
    }

    #[test]
    fn no_delimiter_retains_everything() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.ingest(b"NICK alice").count(), 0);
        assert_eq!(framer.ingest(b" more").count(), 0);
        assert_eq!(framer.pending(), b"NICK alice more");
    }

    #[test]
    fn several_lines_in_one_chunk_with_tail() {
        let mut framer = LineFramer::new();
        assert_eq!(texts(framer.ingest(b"a\r\nb\r\nc")), ["a", "b"]);
        assert_eq!(framer.pending(), b"c");
    }

    #[test]
    fn empty_lines_are_emitted() {
        let mut framer = LineFramer::new();
        assert_eq!(texts(framer.ingest(b"\r\n\r\nx\r\n")), ["", "", "x"]);
    }

    #[test]
    fn lone_cr_and_lf_are_not_delimiters() {
        let mut framer = LineFramer::new();
        assert_eq!(texts(framer.ingest(b"a\nb\rc\r\n")), ["a\nb\rc"]);
    }

    #[test]
    fn cr_followed_by_cr_lf() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.ingest(b"x\r").count(), 0);
        assert_eq!(framer.ingest(b"\r").count(), 0);
        let lines: Vec<_> = framer.ingest(b"\n").collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_bytes(), b"x\r");
    }

    #[test]
    fn partially_consumed_iterator_resumes() {
        let mut framer = LineFramer::new();
        let first = framer.ingest(b"one\r\ntwo\r\nthree\r\n").next();
        assert_eq!(first.unwrap().to_text(), "one");

        assert_eq!(texts(framer.ingest(b"")), ["two", "three"]);
    }

    #[test]
    fn invalid_utf8_is_framed_by_bytes() {
        let mut framer = LineFramer::new();
        let lines: Vec<_> = framer.ingest(b"\xff\xfe\r\nok\r\n").collect();
        assert_eq!(lines[0].as_bytes(), b"\xff\xfe");
        assert_eq!(lines[0].to_text(), "\u{fffd}\u{fffd}");
        assert_eq!(lines[1].to_text(), "ok");
    }

    #[test]
    fn finish_discards_unterminated_remainder() {
        let mut framer = LineFramer::new();
        assert_eq!(texts(framer.ingest(b"done\r\npartial")), ["done"]);
        assert_eq!(framer.finish(), 7);
    }

    #[test]
    fn discard_resets_scan_position() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.ingest(b"abcdef").count(), 0);
        assert_eq!(framer.discard_pending(), 6);
        assert_eq!(texts(framer.ingest(b"x\r\n")), ["x"]);
    }
}
