//! GeoIP 存储抽象层
//!
//! `GeoStore` 是外部只读地址库的能力接口：
//! - `Ok(Some(record))`：命中
//! - `Ok(None)`：未命中
//! - `Err(_)`：I/O 或解码错误
//!
//! `GeoLookupEngine` 包装存储，把错误记录日志后降级为未命中。

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{trace, warn};

use super::types::{ClientAddress, RawGeoRecord};
use crate::errors::Result;

/// 地址库查询 trait
pub trait GeoStore: Send + Sync {
    /// 按最长前缀匹配查询地址
    fn lookup(&self, ip: IpAddr) -> Result<Option<RawGeoRecord>>;

    /// 获取存储名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 查询引擎
///
/// 不缓存、不修改存储，每次查询返回新的记录。
#[derive(Clone)]
pub struct GeoLookupEngine {
    store: Arc<dyn GeoStore>,
}

impl GeoLookupEngine {
    pub fn new(store: Arc<dyn GeoStore>) -> Self {
        Self { store }
    }

    /// 查询地址，存储错误降级为未命中
    pub fn lookup(&self, addr: &ClientAddress) -> Option<RawGeoRecord> {
        match self.store.lookup(addr.ip()) {
            Ok(Some(record)) => {
                trace!("{} lookup for {}: hit", self.store.name(), addr);
                Some(record)
            }
            Ok(None) => {
                trace!("{} lookup for {}: miss", self.store.name(), addr);
                None
            }
            Err(e) => {
                warn!("{} lookup for {} failed: {}", self.store.name(), addr, e);
                None
            }
        }
    }

    /// 获取当前存储名称
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }
}
