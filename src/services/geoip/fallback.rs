//! 未命中时的合成记录
//!
//! | 地址类别 | country_code | country_name | city_name |
//! |---|---|---|---|
//! | loopback | `**` | `Loopback` | `Loopback` |
//! | 其他 | `!!` | `No Country` | `No City` |
//!
//! 数值字段为 0，时区为空，`country_is_eu` 为 false。

use super::types::{ClientAddress, RawGeoRecord};
use crate::utils::ip::AddressClass;

pub const LOOPBACK_COUNTRY_CODE: &str = "**";
pub const LOOPBACK_NAME: &str = "Loopback";

pub const UNKNOWN_COUNTRY_CODE: &str = "!!";
pub const UNKNOWN_COUNTRY_NAME: &str = "No Country";
pub const UNKNOWN_CITY_NAME: &str = "No City";

/// 为未命中的地址生成合成记录
pub fn fallback_record(addr: &ClientAddress) -> RawGeoRecord {
    let (code, country, city) = match addr.class() {
        AddressClass::Loopback => (LOOPBACK_COUNTRY_CODE, LOOPBACK_NAME, LOOPBACK_NAME),
        AddressClass::Private | AddressClass::Public | AddressClass::Invalid => (
            UNKNOWN_COUNTRY_CODE,
            UNKNOWN_COUNTRY_NAME,
            UNKNOWN_CITY_NAME,
        ),
    };

    RawGeoRecord {
        country_iso_code: code.to_string(),
        country_name: country.to_string(),
        city_name: city.to_string(),
        ..Default::default()
    }
}
