//! geoip-enricher - GeoIP enrichment for inbound HTTP requests
//!
//! This library resolves the client address of a request, looks it up in a
//! GeoIP store and emits a fixed set of canonical location fields as HTTP
//! headers, template placeholders or JSON.
//!
//! # Features
//! - **server**: HTTP middleware and server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `services::geoip`: Address resolution, lookup, fallback and formatting
//! - `api`: actix-web middleware and routes
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup
//! - `utils`: Address classification and CIDR helpers

#[cfg(feature = "server")]
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
