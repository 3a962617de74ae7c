//! Wire protocol for ircline
//!
//! Sans-IO building blocks for a line-oriented, IRC-like chat protocol:
//!
//! - [`LineFramer`]: reassembles CRLF-terminated [`ProtocolLine`]s from a byte
//!   stream that may be split at arbitrary points.
//! - [`LineCodec`]: adapts the framer to `tokio_util::codec` for framed
//!   transports, and encodes [`OutboundLine`]s.
//! - [`Message`]: classifies a complete line into chat messages, user actions,
//!   numeric replies or raw passthrough.
//!
//! Nothing in this crate performs I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod errors;
pub mod framer;
pub mod line;
pub mod message;

pub use codec::LineCodec;
pub use errors::{ProtocolError, Result};
pub use framer::{LineFramer, Lines};
pub use line::{OutboundLine, ProtocolLine};
pub use message::{ActionKind, ChatMessage, Message, NumericReply, UserAction};
