//! 内存前缀表实现
//!
//! 从 TOML 加载 `CIDR → 记录` 表，按最长前缀匹配查询。
//! 用于静态覆盖、测试和未配置 MaxMind 数据库时的兜底。
//!
//! ```toml
//! [[entries]]
//! network = "212.50.99.0/24"
//! country_iso_code = "CY"
//! country_name = "Cyprus"
//! city_name = "Limassol"
//! latitude = 34.6841
//! longitude = 33.0379
//! time_zone = "Asia/Nicosia"
//! ```

use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::provider::GeoStore;
use super::types::RawGeoRecord;
use crate::errors::{GeoIpError, Result};
use crate::utils::ip::Cidr;

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    entries: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    network: String,
    #[serde(flatten)]
    record: RawGeoRecord,
}

/// 前缀表地址库
#[derive(Debug, Default)]
pub struct PrefixTableStore {
    /// 按前缀长度降序排列，首个匹配即最长前缀
    entries: Vec<(Cidr, RawGeoRecord)>,
}

impl PrefixTableStore {
    pub fn new(mut entries: Vec<(Cidr, RawGeoRecord)>) -> Self {
        entries.sort_by(|a, b| b.0.prefix_len.cmp(&a.0.prefix_len));
        Self { entries }
    }

    /// 空表：所有地址都未命中
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)?;

        let mut entries = Vec::with_capacity(file.entries.len());
        for entry in file.entries {
            let cidr = Cidr::parse(&entry.network).ok_or_else(|| {
                GeoIpError::config(format!("Invalid network in prefix table: {}", entry.network))
            })?;
            entries.push((cidr, entry.record));
        }

        Ok(Self::new(entries))
    }

    /// 从 TOML 文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeoIpError::database_open(format!(
                "Can't read prefix table {}: {}",
                path.display(),
                e
            ))
        })?;

        let store = Self::from_toml_str(&content)?;
        info!(
            "GeoIP: Loaded prefix table from {} ({} entries)",
            path.display(),
            store.len()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GeoStore for PrefixTableStore {
    fn lookup(&self, ip: IpAddr) -> Result<Option<RawGeoRecord>> {
        // ::ffff:a.b.c.d 与 IPv4 网段匹配
        let ip = ip.to_canonical();
        Ok(self
            .entries
            .iter()
            .find(|(cidr, _)| cidr.contains(&ip))
            .map(|(_, record)| record.clone()))
    }

    fn name(&self) -> &'static str {
        "PrefixTable"
    }
}
