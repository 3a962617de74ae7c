//! Fuzz target for line reassembly across arbitrary read boundaries
//!
//! # Strategy
//!
//! - Payload: random bytes with CR, LF and CRLF spliced in
//! - Chunking: the payload is cut at fuzzer-chosen offsets
//!
//! # Invariants
//!
//! - Chunked ingestion MUST yield the same lines as a single ingestion
//! - No yielded line contains CRLF
//! - Every ingested byte is either yielded, consumed as a delimiter, or
//!   reported as discarded by `finish`
//! - Classification never panics

#![no_main]

use arbitrary::Arbitrary;
use ircline_proto::{LineFramer, Message};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct Input {
    pieces: Vec<Piece>,
    cuts: Vec<u16>,
}

#[derive(Debug, Clone, Arbitrary)]
enum Piece {
    Text(Vec<u8>),
    Crlf,
    LoneCr,
    LoneLf,
}

fn collect(framer: &mut LineFramer, chunk: &[u8], out: &mut Vec<Vec<u8>>) {
    out.extend(framer.ingest(chunk).map(|line| line.as_bytes().to_vec()));
}

fuzz_target!(|input: Input| {
    let mut payload = Vec::new();
    for piece in &input.pieces {
        match piece {
            Piece::Text(bytes) => payload.extend_from_slice(bytes),
            Piece::Crlf => payload.extend_from_slice(b"\r\n"),
            Piece::LoneCr => payload.push(b'\r'),
            Piece::LoneLf => payload.push(b'\n'),
        }
    }

    let mut whole = LineFramer::new();
    let mut expected = Vec::new();
    collect(&mut whole, &payload, &mut expected);
    let whole_discarded = whole.finish();

    let mut offsets: Vec<usize> =
        input.cuts.iter().map(|&c| usize::from(c) % (payload.len() + 1)).collect();
    offsets.push(payload.len());
    offsets.sort_unstable();

    let mut chunked = LineFramer::new();
    let mut actual = Vec::new();
    let mut start = 0;
    for end in offsets {
        collect(&mut chunked, &payload[start..end], &mut actual);
        start = end;
    }
    let chunked_discarded = chunked.finish();

    assert_eq!(actual, expected);
    assert_eq!(chunked_discarded, whole_discarded);

    let delimiters = expected.len() * 2;
    let yielded: usize = expected.iter().map(Vec::len).sum();
    assert_eq!(yielded + delimiters + whole_discarded, payload.len());

    for line in &expected {
        assert!(!line.windows(2).any(|w| w == b"\r\n"));
        let _ = Message::parse(&String::from_utf8_lossy(line));
    }
});
