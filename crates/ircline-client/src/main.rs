//! ircline entry point.
//!
//! # Usage
//!
//! ```bash
//! # Connect to localhost:7850
//! ircline
//!
//! # Connect elsewhere, without colors
//! ircline irc.example.net 6667 --color never
//! ```

use std::{io, process::ExitCode, time::Duration};

use clap::Parser;
use ircline_client::{
    ClientConfig, ColorMode, Runtime,
    config::{DEFAULT_HOST, DEFAULT_PORT},
    runtime,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Blocked stdin reads cannot be cancelled; do not wait for them at exit.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

/// Terminal chat client for CRLF line protocols
#[derive(Parser, Debug)]
#[command(name = "ircline")]
#[command(about = "Terminal client for an IRC-like line protocol")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,

    /// When to color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Chat output owns stdout
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let config = ClientConfig { host: args.host, port: args.port, color: args.color };

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        },
    };

    let result = rt.block_on(Runtime::new(config).run());
    rt.shutdown_timeout(SHUTDOWN_GRACE);

    if let Err(e) = runtime::report(&result, &mut io::stdout()) {
        tracing::error!("failed to write to terminal: {e}");
    }

    match result {
        Err(e) if e.is_connect() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
