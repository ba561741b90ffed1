//! 字段输出端
//!
//! 核心只产出 `GeoFields`，由调用方提供的 `FieldSink` 决定如何发布：
//! - `PlaceholderSink`：`geoip_country_code` 形式的占位符
//! - `HeaderNames` + HTTP 中间件中的 `HeaderSink`：请求头

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::keys;

/// 字段输出能力
pub trait FieldSink {
    fn set(&mut self, key: &str, value: &str);
}

impl FieldSink for BTreeMap<String, String> {
    fn set(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

/// 默认占位符前缀
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "geoip_";

/// 占位符输出端
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSink {
    prefix: String,
    values: BTreeMap<String, String>,
}

impl PlaceholderSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.values
    }

    /// 替换模板中的 `{geoip_xxx}` 占位符，未知占位符保持原样
    ///
    /// 单趟从左到右扫描，替换进来的值不会再被展开。
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start + 1..];
            let hit = tail
                .find('}')
                .and_then(|end| self.get(&tail[..end]).map(|value| (end, value)));
            match hit {
                Some((end, value)) => {
                    out.push_str(value);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = tail;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

impl FieldSink for PlaceholderSink {
    fn set(&mut self, key: &str, value: &str) {
        self.values
            .insert(format!("{}{}", self.prefix, key), value.to_string());
    }
}

/// 字段 → 请求头名称映射
///
/// 配置为空字符串的字段不发布。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderNames {
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_country_name")]
    pub country_name: String,
    #[serde(default = "default_country_eu")]
    pub country_eu: String,
    #[serde(default = "default_country_geoname_id")]
    pub country_geoname_id: String,
    #[serde(default = "default_city_name")]
    pub city_name: String,
    #[serde(default = "default_city_geoname_id")]
    pub city_geoname_id: String,
    #[serde(default = "default_latitude")]
    pub latitude: String,
    #[serde(default = "default_longitude")]
    pub longitude: String,
    #[serde(default = "default_geohash")]
    pub geohash: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl HeaderNames {
    /// 查找字段对应的请求头名称
    pub fn header_for(&self, key: &str) -> Option<&str> {
        let name = match key {
            keys::COUNTRY_CODE => &self.country_code,
            keys::COUNTRY_NAME => &self.country_name,
            keys::COUNTRY_EU => &self.country_eu,
            keys::COUNTRY_GEONAME_ID => &self.country_geoname_id,
            keys::CITY_NAME => &self.city_name,
            keys::CITY_GEONAME_ID => &self.city_geoname_id,
            keys::LATITUDE => &self.latitude,
            keys::LONGITUDE => &self.longitude,
            keys::GEOHASH => &self.geohash,
            keys::TIME_ZONE => &self.time_zone,
            _ => return None,
        };
        (!name.is_empty()).then_some(name.as_str())
    }
}

// ============================================================
// Default header names
// ============================================================

fn default_country_code() -> String {
    "X-Geoip-Country-Code".to_string()
}

fn default_country_name() -> String {
    "X-Geoip-Country-Name".to_string()
}

fn default_country_eu() -> String {
    "X-Geoip-Country-Eu".to_string()
}

fn default_country_geoname_id() -> String {
    "X-Geoip-Country-Geoname-Id".to_string()
}

fn default_city_name() -> String {
    "X-Geoip-City-Name".to_string()
}

fn default_city_geoname_id() -> String {
    "X-Geoip-City-Geoname-Id".to_string()
}

fn default_latitude() -> String {
    "X-Geoip-Location-Lat".to_string()
}

fn default_longitude() -> String {
    "X-Geoip-Location-Lon".to_string()
}

fn default_geohash() -> String {
    "X-Geoip-Geohash".to_string()
}

fn default_time_zone() -> String {
    "X-Geoip-Location-Tz".to_string()
}

impl Default for HeaderNames {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            country_name: default_country_name(),
            country_eu: default_country_eu(),
            country_geoname_id: default_country_geoname_id(),
            city_name: default_city_name(),
            city_geoname_id: default_city_geoname_id(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            geohash: default_geohash(),
            time_zone: default_time_zone(),
        }
    }
}
