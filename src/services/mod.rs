//! Service layer for business logic
//!
//! This module provides the enrichment pipeline shared between
//! the HTTP middleware and the CLI.

pub mod geoip;

pub use geoip::{GeoEnricher, GeoFields, GeoStore};
