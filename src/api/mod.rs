//! HTTP layer: enrichment middleware and the routes served in server mode

pub mod middleware;
pub mod services;
