//! GeoIP 数据结构
//!
//! - `RawGeoRecord`：单次查询得到的原始记录（或合成的 fallback 记录）
//! - `ClientAddress`：解析后的客户端地址及其类别
//! - `GeoFields`：对外输出的规范字段表

use std::fmt;
use std::net::IpAddr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::utils::ip::{AddressClass, classify};

/// 输出字段键（顺序即输出顺序）
pub mod keys {
    pub const COUNTRY_CODE: &str = "country_code";
    pub const COUNTRY_NAME: &str = "country_name";
    pub const COUNTRY_EU: &str = "country_eu";
    pub const COUNTRY_GEONAME_ID: &str = "country_geoname_id";
    pub const CITY_NAME: &str = "city_name";
    pub const CITY_GEONAME_ID: &str = "city_geoname_id";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const GEOHASH: &str = "geohash";
    pub const TIME_ZONE: &str = "time_zone";

    pub const ALL: [&str; 10] = [
        COUNTRY_CODE,
        COUNTRY_NAME,
        COUNTRY_EU,
        COUNTRY_GEONAME_ID,
        CITY_NAME,
        CITY_GEONAME_ID,
        LATITUDE,
        LONGITUDE,
        GEOHASH,
        TIME_ZONE,
    ];
}

/// 原始地理位置记录
///
/// 每次查询新建，归属于产生它的请求，不跨请求共享。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGeoRecord {
    /// ISO 3166-1 alpha-2 国家代码，缺失时为空
    pub country_iso_code: String,
    /// 国家英文名
    pub country_name: String,
    pub country_is_eu: bool,
    /// 0 表示缺失
    pub country_geoname_id: u64,
    pub city_name: String,
    pub city_geoname_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA 时区名
    pub time_zone: String,
}

/// 客户端地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientAddress {
    ip: IpAddr,
    class: AddressClass,
}

impl ClientAddress {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            class: classify(&ip),
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn class(&self) -> AddressClass {
        self.class
    }

    pub fn is_loopback(&self) -> bool {
        self.class == AddressClass::Loopback
    }
}

impl From<IpAddr> for ClientAddress {
    fn from(ip: IpAddr) -> Self {
        Self::new(ip)
    }
}

impl fmt::Display for ClientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip)
    }
}

/// 规范字段表
///
/// 每个请求一份，按 `keys::ALL` 顺序存放。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoFields {
    entries: Vec<(&'static str, String)>,
}

impl GeoFields {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, key: &'static str, value: String) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for GeoFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_address_classification() {
        let addr = ClientAddress::new("127.0.0.1".parse().unwrap());
        assert!(addr.is_loopback());
        assert_eq!(addr.to_string(), "127.0.0.1");

        let addr = ClientAddress::from("192.168.0.1".parse::<IpAddr>().unwrap());
        assert_eq!(addr.class(), AddressClass::Private);
    }

    #[test]
    fn test_geo_fields_lookup_and_order() {
        let mut fields = GeoFields::with_capacity(2);
        fields.push(keys::COUNTRY_CODE, "CY".to_string());
        fields.push(keys::TIME_ZONE, "Asia/Nicosia".to_string());

        assert_eq!(fields.get("country_code"), Some("CY"));
        assert_eq!(fields.get("city_name"), None);
        let order: Vec<_> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["country_code", "time_zone"]);
    }

    #[test]
    fn test_geo_fields_serialize_as_object() {
        let mut fields = GeoFields::default();
        fields.push(keys::COUNTRY_CODE, "**".to_string());
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"country_code":"**"}"#);
    }

    #[test]
    fn test_record_deserialize_partial() {
        let record: RawGeoRecord = toml::from_str(
            r#"
            country_iso_code = "CY"
            latitude = 34.6841
            "#,
        )
        .unwrap();
        assert_eq!(record.country_iso_code, "CY");
        assert_eq!(record.city_name, "");
        assert_eq!(record.country_geoname_id, 0);
    }
}
