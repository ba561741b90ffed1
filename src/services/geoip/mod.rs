//! GeoIP 服务模块
//!
//! 根据请求的来源地址生成地理位置字段：
//! - 客户端地址解析（连接地址 / X-Forwarded-For）
//! - 地址库查询（MaxMind GeoLite2 本地数据库 / 内存前缀表）
//! - 未命中时的合成记录
//! - 规范字段格式化与输出

mod enricher;
mod fallback;
mod format;
pub mod geohash;
mod maxmind;
mod prefix_table;
mod provider;
mod resolver;
mod sink;
mod types;

pub use enricher::GeoEnricher;
pub use fallback::fallback_record;
pub use format::{format_coordinate, format_record};
pub use maxmind::MaxMindStore;
pub use prefix_table::PrefixTableStore;
pub use provider::{GeoLookupEngine, GeoStore};
pub use resolver::resolve_client_address;
pub use sink::{DEFAULT_PLACEHOLDER_PREFIX, FieldSink, HeaderNames, PlaceholderSink};
pub use types::{ClientAddress, GeoFields, RawGeoRecord, keys};
