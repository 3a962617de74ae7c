//! Terminal client for ircline
//!
//! Thin I/O shell around [`ircline_proto`]: a TCP transport, a renderer that
//! colors classified messages, and a runtime that runs the receive and input
//! activities until either one stops the session.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod runtime;
pub mod transport;

pub use config::{ClientConfig, ColorMode};
pub use error::ClientError;
pub use render::{NickColors, Renderer};
pub use runtime::{Runtime, Shutdown};
