pub mod geoip;

pub use geoip::{GeoIpService, PlaceholderPrefix, geoip_routes, health_routes};
