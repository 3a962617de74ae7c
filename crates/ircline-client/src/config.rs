//! Client configuration.
//!
//! Built from command-line arguments in `main`; the runtime only sees this
//! plain struct.

use std::io;

use clap::ValueEnum;
use crossterm::tty::IsTty;

/// Host used when none is given.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 7850;

/// When to emit terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Colors when stdout is a terminal.
    #[default]
    Auto,
    /// Always emit escape sequences.
    Always,
    /// Plain text only.
    Never,
}

impl ColorMode {
    /// Whether colors are enabled for the current stdout.
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_tty(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Connection and display settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Terminal color policy.
    pub color: ColorMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT, color: ColorMode::Auto }
    }
}

impl ClientConfig {
    /// `host:port` for display.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
