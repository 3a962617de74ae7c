//! TCP transport.
//!
//! Opens the connection and splits it into independently owned read and write
//! halves, each wrapped in the line codec. The receive task owns the read half
//! (and with it the framer); the input loop owns the write half.

use ircline_proto::LineCodec;
use tokio::net::{
    TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::{config::ClientConfig, error::ClientError};

/// Framed reader of protocol lines.
pub type LineReader<R> = FramedRead<R, LineCodec>;

/// Framed writer of outbound lines.
pub type LineWriter<W> = FramedWrite<W, LineCodec>;

/// An open connection to the server.
#[derive(Debug)]
pub struct Connection {
    /// Inbound lines.
    pub reader: LineReader<OwnedReadHalf>,
    /// Outbound lines.
    pub writer: LineWriter<OwnedWriteHalf>,
}

/// Connect to the configured server.
///
/// A single attempt; failures are returned, never retried.
pub async fn connect(config: &ClientConfig) -> Result<Connection, ClientError> {
    let addr = config.server_addr();
    let connect_error = |source| ClientError::Connect { addr: addr.clone(), source };

    let stream = TcpStream::connect((config.host.as_str(), config.port))
        .await
        .map_err(connect_error)?;
    let peer = stream.peer_addr().map_err(connect_error)?;

    tracing::info!(%peer, "connected to {addr}");

    Ok(split(stream))
}

/// Wrap both halves of `stream` in the line codec.
pub fn split(stream: TcpStream) -> Connection {
    let (read, write) = stream.into_split();
    Connection {
        reader: FramedRead::new(read, LineCodec::new()),
        writer: FramedWrite::new(write, LineCodec::new()),
    }
}
