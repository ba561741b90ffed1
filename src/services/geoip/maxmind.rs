//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 GeoLite2-City.mmdb 文件进行查询，文件在启动时整体读入内存。

use std::net::IpAddr;
use std::path::Path;

use maxminddb::{Reader, geoip2};
use tracing::{info, trace};

use super::provider::GeoStore;
use super::types::RawGeoRecord;
use crate::errors::{GeoIpError, Result};

/// 将 City 记录映射为原始地理记录
///
/// 名称取英文版本；任何缺失字段都退化为类型默认值。
fn city_to_record(city: &geoip2::City<'_>) -> RawGeoRecord {
    RawGeoRecord {
        country_iso_code: city.country.iso_code.unwrap_or_default().to_string(),
        country_name: city.country.names.english.unwrap_or_default().to_string(),
        country_is_eu: city.country.is_in_european_union.unwrap_or_default(),
        country_geoname_id: city.country.geoname_id.map(u64::from).unwrap_or_default(),
        city_name: city.city.names.english.unwrap_or_default().to_string(),
        city_geoname_id: city.city.geoname_id.map(u64::from).unwrap_or_default(),
        latitude: city.location.latitude.unwrap_or_default(),
        longitude: city.location.longitude.unwrap_or_default(),
        time_zone: city.location.time_zone.unwrap_or_default().to_string(),
    }
}

/// MaxMind 地址库
pub struct MaxMindStore {
    reader: Reader<Vec<u8>>,
}

impl MaxMindStore {
    /// 从文件路径打开数据库
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|e| {
            GeoIpError::database_open(format!("Can't open database {}: {}", path.display(), e))
        })?;

        info!(
            "GeoIP: Opened MaxMind database at {} (build {})",
            path.display(),
            reader.metadata.build_epoch
        );
        Ok(Self { reader })
    }
}

impl GeoStore for MaxMindStore {
    fn lookup(&self, ip: IpAddr) -> Result<Option<RawGeoRecord>> {
        let result = self.reader.lookup(ip)?;
        if !result.has_data() {
            return Ok(None);
        }

        let city: Option<geoip2::City> = result.decode()?;
        trace!("MaxMind lookup for {}: {:?}", ip, city);
        Ok(city.as_ref().map(city_to_record))
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 小型 City 测试库，生成方式见 tests/fixtures/build_city_fixture.py
    const FIXTURE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/GeoIP2-City-Test.mmdb"
    );

    fn fixture() -> MaxMindStore {
        MaxMindStore::open(FIXTURE).expect("fixture database should open")
    }

    #[test]
    fn test_open_missing_database() {
        let err = MaxMindStore::open("/nonexistent/GeoLite2-City.mmdb")
            .err()
            .expect("opening a missing file must fail");
        assert!(matches!(err, GeoIpError::DatabaseOpen(_)));
        assert!(err.message().contains("GeoLite2-City.mmdb"));
    }

    #[test]
    fn test_open_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.mmdb");
        std::fs::write(&path, b"definitely not a maxmind database").unwrap();
        assert!(MaxMindStore::open(&path).is_err());
    }

    #[test]
    fn test_city_to_record_uses_english_names() {
        let mut city = geoip2::City::default();
        city.country.iso_code = Some("CY");
        city.country.is_in_european_union = Some(true);
        city.country.geoname_id = Some(146669);
        city.country.names.english = Some("Cyprus");
        city.country.names.german = Some("Zypern");
        city.city.geoname_id = Some(146384);
        city.city.names.english = Some("Limassol");
        city.location.latitude = Some(34.6841);
        city.location.longitude = Some(33.0379);
        city.location.time_zone = Some("Asia/Nicosia");

        let record = city_to_record(&city);
        assert_eq!(record.country_iso_code, "CY");
        assert_eq!(record.country_name, "Cyprus");
        assert_eq!(record.city_name, "Limassol");
        assert_eq!(record.country_geoname_id, 146669);
        assert_eq!(record.city_geoname_id, 146384);
        assert_eq!(record.time_zone, "Asia/Nicosia");
        assert!(record.country_is_eu);
    }

    #[test]
    fn test_city_to_record_without_data() {
        let record = city_to_record(&geoip2::City::default());
        assert_eq!(record, RawGeoRecord::default());
    }

    #[test]
    fn test_city_to_record_ignores_other_locales() {
        let mut city = geoip2::City::default();
        city.city.names.german = Some("München");
        assert_eq!(city_to_record(&city).city_name, "");
    }

    #[test]
    fn test_fixture_lookup_full_record() {
        let record = fixture()
            .lookup("81.2.69.142".parse().unwrap())
            .unwrap()
            .expect("81.2.69.0/24 is in the fixture");

        assert_eq!(
            record,
            RawGeoRecord {
                country_iso_code: "GB".to_string(),
                country_name: "United Kingdom".to_string(),
                country_is_eu: false,
                country_geoname_id: 2635167,
                city_name: "London".to_string(),
                city_geoname_id: 2643743,
                latitude: 51.5142,
                longitude: -0.0931,
                time_zone: "Europe/London".to_string(),
            }
        );
    }

    #[test]
    fn test_fixture_lookup_eu_and_locales() {
        let record = fixture()
            .lookup("212.50.99.10".parse().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(record.country_iso_code, "CY");
        assert_eq!(record.country_name, "Cyprus");
        assert_eq!(record.city_name, "Limassol");
        assert!(record.country_is_eu);
    }

    #[test]
    fn test_fixture_lookup_country_only_record() {
        let record = fixture()
            .lookup("89.160.20.1".parse().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(record.country_iso_code, "SE");
        assert_eq!(record.country_name, "Sweden");
        assert!(record.country_is_eu);
        assert_eq!(record.city_name, "");
        assert_eq!(record.city_geoname_id, 0);
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.time_zone, "");
    }

    #[test]
    fn test_fixture_lookup_ipv6() {
        let record = fixture()
            .lookup("2001:218::1".parse().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(record.country_iso_code, "JP");
        assert_eq!(record.time_zone, "Asia/Tokyo");
        assert_eq!(record.longitude, 139.7514);
    }

    #[test]
    fn test_fixture_lookup_miss() {
        let store = fixture();
        assert_eq!(store.lookup("8.8.8.8".parse().unwrap()).unwrap(), None);
        assert_eq!(store.lookup("2001:db8::1".parse().unwrap()).unwrap(), None);
    }

    #[test]
    fn test_fixture_store_name() {
        assert_eq!(fixture().name(), "MaxMind");
    }
}
