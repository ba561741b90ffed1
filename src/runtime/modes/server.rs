//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! Every request passes through the GeoIP middleware before reaching a route.

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::GeoIpMiddleware;
use crate::api::services::{PlaceholderPrefix, geoip_routes, health_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// This function:
/// 1. Opens the GeoIP store and builds the enricher
/// 2. Configures and starts the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    let enricher = lifetime::startup::prepare_enricher(&config.geoip).map_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
        e
    })?;

    // Validate middleware configuration once, before spawning workers
    let geoip_middleware = GeoIpMiddleware::new(enricher.clone(), &config.geoip)
        .context("Invalid GeoIP header configuration")?;
    let placeholder_prefix = PlaceholderPrefix(config.geoip.placeholder_prefix.clone());

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(geoip_middleware.clone())
            .app_data(web::Data::new(enricher.clone()))
            .app_data(web::Data::new(placeholder_prefix.clone()))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .service(health_routes())
            .service(geoip_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server terminated with an error")?;

    Ok(())
}
