//! Async runtime
//!
//! Runs one chat session as two activities:
//!
//! - The receive task reads lines from the server, classifies and renders
//!   them, and writes them to the terminal.
//! - The input loop reads keyboard lines and forwards them to the server.
//!
//! They share nothing except the two halves of the connection and a
//! [`CancellationToken`] used as the stop signal. Either side may cancel it;
//! both check it between iterations. Nothing is retried.

use std::{
    future::Future,
    io::{self, Write},
};

use futures::{SinkExt, StreamExt};
use ircline_proto::{LineCodec, Message};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio_util::{
    codec::{FramedRead, FramedWrite},
    sync::CancellationToken,
};

use crate::{
    config::ClientConfig,
    error::ClientError,
    input::{self, INPUT_BANNER, InputAction},
    render::Renderer,
    transport,
};

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The server closed the connection.
    RemoteClosed,
    /// The user typed `/quit`.
    LocalQuit,
    /// The user pressed Ctrl-C.
    Interrupted,
    /// Keyboard input reached end of file.
    InputClosed,
    /// The other activity requested the stop.
    Stopped,
}

impl Shutdown {
    /// Notice shown to the user, if the reason warrants one.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            Self::RemoteClosed => Some("[Server closed connection]"),
            Self::Interrupted => Some("[Disconnecting...]"),
            Self::LocalQuit | Self::InputClosed | Self::Stopped => None,
        }
    }
}

/// Terminal chat client runtime.
pub struct Runtime {
    config: ClientConfig,
}

impl Runtime {
    /// Create a runtime for `config`.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Connect and run the session until it ends.
    ///
    /// Uses the process stdin, stdout and Ctrl-C handler.
    pub async fn run(self) -> Result<Shutdown, ClientError> {
        let connection = transport::connect(&self.config).await?;

        let mut stdout = io::stdout();
        writeln!(stdout, "Connected to {}", self.config.server_addr())
            .and_then(|()| writeln!(stdout, "\n{INPUT_BANNER}\n---"))
            .map_err(ClientError::Output)?;

        let renderer = Renderer::new(self.config.color.enabled());
        let keyboard = BufReader::new(tokio::io::stdin());

        run_session(connection.reader, connection.writer, keyboard, stdout, renderer, interrupted())
            .await
    }
}

/// Run one session over arbitrary I/O.
///
/// The receive task is spawned; the input loop runs on the caller's task
/// alongside `interrupt`. End of input half-closes the connection and keeps
/// receiving until the server closes or `interrupt` fires.
///
/// Returns the reason of whichever side ended the session first.
pub async fn run_session<R, W, I, O, F>(
    reader: FramedRead<R, LineCodec>,
    writer: FramedWrite<W, LineCodec>,
    keyboard: I,
    output: O,
    renderer: Renderer,
    interrupt: F,
) -> Result<Shutdown, ClientError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: Write + Send + 'static,
    F: Future<Output = ()>,
{
    let stop = CancellationToken::new();
    let receiver = tokio::spawn(receive_loop(reader, renderer, output, stop.clone()));

    tokio::pin!(interrupt);

    let local = tokio::select! {
        result = send_loop(keyboard, writer, stop.clone()) => result,
        () = &mut interrupt => Ok(Shutdown::Interrupted),
    };

    let local = match local {
        Ok(Shutdown::InputClosed) => {
            tracing::debug!("input closed, waiting for the server to finish");
            tokio::select! {
                () = stop.cancelled() => Ok(Shutdown::Stopped),
                () = &mut interrupt => Ok(Shutdown::Interrupted),
            }
        },
        other => other,
    };

    stop.cancel();
    let remote = receiver.await?;

    match local? {
        Shutdown::Stopped => remote,
        reason => Ok(reason),
    }
}

/// Pump server lines to `output` until the stream ends or `stop` is
/// cancelled.
///
/// Empty protocol lines are skipped. Cancels `stop` on exit.
pub async fn receive_loop<R, O>(
    mut reader: FramedRead<R, LineCodec>,
    mut renderer: Renderer,
    mut output: O,
    stop: CancellationToken,
) -> Result<Shutdown, ClientError>
where
    R: AsyncRead + Unpin,
    O: Write,
{
    let result = loop {
        let next = tokio::select! {
            () = stop.cancelled() => break Ok(Shutdown::Stopped),
            next = reader.next() => next,
        };

        match next {
            Some(Ok(line)) if line.is_empty() => {
                tracing::trace!("skipping empty line");
            },
            Some(Ok(line)) => {
                let message = Message::classify(&line);
                tracing::trace!(?message, "received");
                if let Err(e) = writeln!(output, "{}", renderer.render(&message)) {
                    break Err(ClientError::Output(e));
                }
            },
            Some(Err(e)) => {
                tracing::warn!("receive failed: {e}");
                break Err(ClientError::Receive(e));
            },
            None => {
                tracing::info!("server closed connection");
                break Ok(Shutdown::RemoteClosed);
            },
        }
    };

    stop.cancel();
    result
}

/// Forward keyboard lines to the server until `/quit`, end of input, an error,
/// or `stop` is cancelled.
///
/// Cancels `stop` on every exit except end of input.
pub async fn send_loop<I, W>(
    keyboard: I,
    mut writer: FramedWrite<W, LineCodec>,
    stop: CancellationToken,
) -> Result<Shutdown, ClientError>
where
    I: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = keyboard.lines();

    let result = loop {
        let next = tokio::select! {
            () = stop.cancelled() => break Ok(Shutdown::Stopped),
            next = lines.next_line() => next,
        };

        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(Shutdown::InputClosed),
            Err(e) => break Err(ClientError::Input(e)),
        };

        match input::parse(&line) {
            Ok(InputAction::Skip) => {},
            Ok(InputAction::Send(outbound)) => {
                if let Err(e) = writer.send(outbound).await {
                    tracing::warn!("send failed: {e}");
                    break Err(ClientError::Send(e));
                }
            },
            Ok(InputAction::Quit(outbound)) => {
                tracing::debug!("quit requested");
                break writer
                    .send(outbound)
                    .await
                    .map(|()| Shutdown::LocalQuit)
                    .map_err(ClientError::Send);
            },
            Err(e) => tracing::warn!("dropping input line: {e}"),
        }
    };

    stop.cancel();
    result
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl-C handler unavailable: {e}");
        std::future::pending::<()>().await;
    }
}

/// Write the closing notices for a finished session.
pub fn report(result: &Result<Shutdown, ClientError>, out: &mut impl Write) -> io::Result<()> {
    match result {
        Ok(reason) => {
            if let Some(notice) = reason.notice() {
                writeln!(out, "{notice}")?;
            }
        },
        Err(ClientError::Connect { source, .. }) => {
            return writeln!(out, "Connection failed: {source}");
        },
        Err(ClientError::Receive(e)) => writeln!(out, "[Receive error: {e}]")?,
        Err(ClientError::Task(e)) => writeln!(out, "[Receive error: {e}]")?,
        Err(ClientError::Send(e)) => writeln!(out, "[Send error: {e}]")?,
        Err(ClientError::Input(e)) => writeln!(out, "[Input error: {e}]")?,
        Err(ClientError::Output(e)) => writeln!(out, "[Output error: {e}]")?,
    }
    writeln!(out, "[Disconnected]")
}
