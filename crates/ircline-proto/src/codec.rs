//! `tokio_util` codec over the line framer.
//!
//! Lets transports use `FramedRead` and `FramedWrite` while all boundary
//! handling stays in [`LineFramer`].

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    errors::ProtocolError,
    framer::LineFramer,
    line::{OutboundLine, ProtocolLine},
};

/// Codec for CRLF-terminated protocol lines.
#[derive(Debug, Default)]
pub struct LineCodec {
    framer: LineFramer,
}

impl LineCodec {
    /// Create a codec with an empty framer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineCodec {
    type Item = ProtocolLine;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !src.is_empty() {
            self.framer.ingest_buf(src.split());
        }
        Ok(self.framer.next_line())
    }

    /// Unterminated bytes at end of stream are discarded, not an error.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                self.framer.discard_pending();
                Ok(None)
            },
        }
    }
}

impl Encoder<OutboundLine> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: OutboundLine, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.as_str().len() + 2);
        item.encode(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_across_buffers() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #a :hi\r"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());

        buf.extend_from_slice(b"\nPING\r\n");
        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.to_text(), "PRIVMSG #a :hi");
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.to_text(), "PING");
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_eof_drops_remainder() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"last\r\ncut off"[..]);
        assert_eq!(codec.decode_eof(&mut buf).unwrap().unwrap().to_text(), "last");
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn encode_appends_delimiter() {
        let mut codec = LineCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(OutboundLine::new("JOIN #rust\n").unwrap(), &mut dst).unwrap();
        codec.encode(OutboundLine::new("/quit").unwrap(), &mut dst).unwrap();
        assert_eq!(&dst[..], b"JOIN #rust\r\n/quit\r\n");
    }
}
