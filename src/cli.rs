//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for geoip-enricher using clap's derive macros.

use clap::{Parser, Subcommand};

/// geoip-enricher - GeoIP enrichment for inbound HTTP requests
#[derive(Parser)]
#[command(name = "geoip-enricher")]
#[command(version)]
#[command(about = "Attach GeoIP location fields to inbound requests", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Resolve and look up a single address
    ///
    /// Usage: lookup <ADDR> [--forwarded-for <VALUE>] [--trust-forwarded]
    /// - ADDR is treated as the connection address and may carry a port
    /// - The forwarded value is only used together with --trust-forwarded
    Lookup {
        /// Connection address, e.g. 81.2.69.142 or [2001:db8::1]:443
        addr: String,

        /// Raw X-Forwarded-For header value
        #[arg(long)]
        forwarded_for: Option<String>,

        /// Trust the leftmost forwarded entry (overrides configuration)
        #[arg(long)]
        trust_forwarded: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
