//! 富化流水线集成测试
//!
//! 覆盖命中、loopback / 私有地址 fallback、转发头信任与存储故障降级。

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

use geoip_enricher::errors::{GeoIpError, Result};
use geoip_enricher::services::geoip::{
    GeoEnricher, GeoStore, PlaceholderSink, PrefixTableStore, RawGeoRecord, format_record, keys,
};

const TABLE: &str = r#"
[[entries]]
network = "212.50.99.0/24"
country_iso_code = "CY"
country_name = "Cyprus"
country_is_eu = true
country_geoname_id = 146669
city_name = "Limassol"
city_geoname_id = 146384
latitude = 34.6841
longitude = 33.0379
time_zone = "Asia/Nicosia"

[[entries]]
network = "203.0.113.0/24"
country_iso_code = "AR"
country_name = "Argentina"
country_geoname_id = 3865483
city_name = "Buenos Aires"
city_geoname_id = 3435910
latitude = -34.6037
longitude = -58.3816
time_zone = "America/Argentina/Buenos_Aires"
"#;

fn enricher(trust: bool) -> GeoEnricher {
    let store = PrefixTableStore::from_toml_str(TABLE).expect("valid table");
    GeoEnricher::new(Arc::new(store), trust)
}

fn as_map(enricher: &GeoEnricher, remote: &str, forwarded: Option<&str>) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    enricher
        .enrich_into(remote, forwarded, &mut map)
        .expect("address should resolve");
    map
}

// =============================================================================
// 命中
// =============================================================================

#[test]
fn test_public_address_hit_formats_every_field() {
    let fields = enricher(false).enrich("212.50.99.10:51234", None).unwrap();

    let expected = [
        ("country_code", "CY"),
        ("country_name", "Cyprus"),
        ("country_eu", "true"),
        ("country_geoname_id", "146669"),
        ("city_name", "Limassol"),
        ("city_geoname_id", "146384"),
        ("latitude", "34.684100"),
        ("longitude", "33.037900"),
        ("geohash", "swpmrf13wbgg"),
        ("time_zone", "Asia/Nicosia"),
    ];
    let actual: Vec<(&str, &str)> = fields.iter().collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_negative_coordinates_keep_sign() {
    let fields = enricher(false).enrich("203.0.113.7", None).unwrap();
    assert_eq!(fields.get(keys::LATITUDE), Some("-34.603700"));
    assert_eq!(fields.get(keys::LONGITUDE), Some("-58.381600"));
    assert_eq!(fields.get(keys::COUNTRY_EU), Some("false"));
}

#[test]
fn test_format_is_deterministic() {
    let record = RawGeoRecord {
        country_iso_code: "CY".to_string(),
        latitude: 34.6841,
        longitude: 33.0379,
        ..Default::default()
    };
    assert_eq!(format_record(&record), format_record(&record.clone()));
}

// =============================================================================
// Fallback
// =============================================================================

#[test]
fn test_loopback_fallback() {
    let map = as_map(&enricher(false), "127.0.0.1:8080", None);

    assert_eq!(map["country_code"], "**");
    assert_eq!(map["country_name"], "Loopback");
    assert_eq!(map["city_name"], "Loopback");
    assert_eq!(map["country_geoname_id"], "0");
    assert_eq!(map["city_geoname_id"], "0");
    assert_eq!(map["latitude"], "0.000000");
    assert_eq!(map["longitude"], "0.000000");
    assert_eq!(map["geohash"], "s00000000000");
    assert_eq!(map["time_zone"], "");
    assert_eq!(map["country_eu"], "false");
    assert_eq!(map.len(), keys::ALL.len());
}

#[test]
fn test_private_fallback() {
    let map = as_map(&enricher(false), "192.168.0.1", None);

    assert_eq!(map["country_code"], "!!");
    assert_eq!(map["country_name"], "No Country");
    assert_eq!(map["city_name"], "No City");
    assert_eq!(map["country_geoname_id"], "0");
    assert_eq!(map["city_geoname_id"], "0");
    assert_eq!(map["latitude"], "0.000000");
    assert_eq!(map["longitude"], "0.000000");
    assert_eq!(map["geohash"], "s00000000000");
    assert_eq!(map["time_zone"], "");
}

#[test]
fn test_ipv6_loopback_fallback() {
    let fields = enricher(false).enrich("[::1]:443", None).unwrap();
    assert_eq!(fields.get(keys::COUNTRY_CODE), Some("**"));
}

#[test]
fn test_public_miss_uses_unknown_fallback() {
    let fields = enricher(false).enrich("8.8.8.8", None).unwrap();
    assert_eq!(fields.get(keys::COUNTRY_CODE), Some("!!"));
    assert_eq!(fields.get(keys::CITY_NAME), Some("No City"));
}

struct FailingStore;

impl GeoStore for FailingStore {
    fn lookup(&self, _ip: IpAddr) -> Result<Option<RawGeoRecord>> {
        Err(GeoIpError::database_lookup("corrupt search tree"))
    }

    fn name(&self) -> &'static str {
        "Failing"
    }
}

#[test]
fn test_store_failure_degrades_to_fallback() {
    let enricher = GeoEnricher::new(Arc::new(FailingStore), false);

    let fields = enricher.enrich("127.0.0.1", None).unwrap();
    assert_eq!(fields.get(keys::COUNTRY_CODE), Some("**"));

    let fields = enricher.enrich("212.50.99.10", None).unwrap();
    assert_eq!(fields.get(keys::COUNTRY_CODE), Some("!!"));
}

// =============================================================================
// 转发头
// =============================================================================

#[test]
fn test_trusted_forwarded_header_uses_first_entry() {
    let fields = enricher(true)
        .enrich("10.0.0.2:40000", Some("203.0.113.5, 10.0.0.1"))
        .unwrap();
    assert_eq!(fields.get(keys::COUNTRY_CODE), Some("AR"));
}

#[test]
fn test_untrusted_forwarded_header_is_ignored() {
    let fields = enricher(false)
        .enrich("127.0.0.1:40000", Some("203.0.113.5, 10.0.0.1"))
        .unwrap();
    assert_eq!(fields.get(keys::COUNTRY_CODE), Some("**"));
}

#[test]
fn test_unparseable_address_fails() {
    let err = enricher(false).enrich("not-an-ip", None).unwrap_err();
    assert!(err.is_address_parse());
    assert_eq!(err.code(), "E001");
}

#[test]
fn test_unparseable_address_writes_nothing() {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    assert!(enricher(false).enrich_into("garbage", None, &mut map).is_err());
    assert!(map.is_empty());
}

// =============================================================================
// 输出端
// =============================================================================

#[test]
fn test_placeholder_sink_renders_template() {
    let mut sink = PlaceholderSink::new("geoip_");
    enricher(false)
        .enrich_into("212.50.99.1", None, &mut sink)
        .unwrap();

    assert_eq!(sink.get("geoip_country_code"), Some("CY"));
    assert_eq!(
        sink.render("{geoip_city_name}/{geoip_time_zone} {unknown}"),
        "Limassol/Asia/Nicosia {unknown}"
    );
}

#[test]
fn test_concurrent_enrichment_is_independent() {
    let enricher = enricher(false);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let enricher = enricher.clone();
            std::thread::spawn(move || {
                let (addr, expected) = if i % 2 == 0 {
                    ("212.50.99.10", "CY")
                } else {
                    ("127.0.0.1", "**")
                };
                for _ in 0..200 {
                    let fields = enricher.enrich(addr, None).unwrap();
                    assert_eq!(fields.get(keys::COUNTRY_CODE), Some(expected));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
