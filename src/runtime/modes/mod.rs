//! Mode routing
//!
//! This module provides unified entry points for the execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (one-shot lookup and config commands)
//!
//! The mode selection is based on the parsed subcommand and feature flags.

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export mode functions for convenience
#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;

use crate::cli::Commands;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

/// Detect which mode to run based on the parsed subcommand
///
/// # Mode Detection Logic
/// 1. No command or `serve` and server feature enabled -> Server mode
/// 2. Any other command and CLI feature enabled -> CLI mode
/// 3. Otherwise -> Unknown
#[allow(unreachable_code)]
pub fn detect_mode(command: Option<&Commands>) -> Mode {
    match command {
        None | Some(Commands::Serve) => {
            #[cfg(feature = "server")]
            return Mode::Server;
        }
        Some(_) => {
            #[cfg(feature = "cli")]
            return Mode::Cli;
        }
    }

    Mode::Unknown
}
