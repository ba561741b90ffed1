//! 记录 → 规范字段表
//!
//! 转换规则：
//! - bool → `"true"` / `"false"`
//! - 无符号整数 → 十进制，`0` 输出 `"0"`
//! - 浮点 → 定点 6 位小数，无指数，仅负数带符号
//! - 字符串原样输出
//! - geohash：12 位，原点为 `s00000000000`

use super::geohash;
use super::types::{GeoFields, RawGeoRecord, keys};

/// 格式化记录，纯函数
pub fn format_record(record: &RawGeoRecord) -> GeoFields {
    let mut fields = GeoFields::with_capacity(keys::ALL.len());

    fields.push(keys::COUNTRY_CODE, record.country_iso_code.clone());
    fields.push(keys::COUNTRY_NAME, record.country_name.clone());
    fields.push(keys::COUNTRY_EU, format_bool(record.country_is_eu));
    fields.push(keys::COUNTRY_GEONAME_ID, record.country_geoname_id.to_string());
    fields.push(keys::CITY_NAME, record.city_name.clone());
    fields.push(keys::CITY_GEONAME_ID, record.city_geoname_id.to_string());
    fields.push(keys::LATITUDE, format_coordinate(record.latitude));
    fields.push(keys::LONGITUDE, format_coordinate(record.longitude));
    fields.push(
        keys::GEOHASH,
        geohash::encode(record.latitude, record.longitude),
    );
    fields.push(keys::TIME_ZONE, record.time_zone.clone());

    fields
}

fn format_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// 定点 6 位小数
///
/// 非有限值按 0 处理；四舍五入后为零的负数不带符号。
pub fn format_coordinate(value: f64) -> String {
    if !value.is_finite() {
        return "0.000000".to_string();
    }

    let formatted = format!("{:.6}", value);
    match formatted.strip_prefix('-') {
        Some(abs) if abs.bytes().all(|b| b == b'0' || b == b'.') => abs.to_string(),
        _ => formatted,
    }
}
