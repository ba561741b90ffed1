pub mod geoip;

pub use geoip::{GeoIpMiddleware, HeaderSink, HeaderTable};
