//! 富化流水线
//!
//! 地址解析 → 查询 → 未命中时合成记录 → 格式化 → 输出端
//!
//! `GeoEnricher` 只持有只读的存储和信任开关，
//! 每次调用都新建记录和字段表，可在任意多个 worker 间共享。

use std::sync::Arc;

use tracing::trace;

use super::fallback::fallback_record;
use super::format::format_record;
use super::provider::{GeoLookupEngine, GeoStore};
use super::resolver::resolve_client_address;
use super::sink::FieldSink;
use super::types::{ClientAddress, GeoFields};
use crate::errors::Result;

#[derive(Clone)]
pub struct GeoEnricher {
    engine: GeoLookupEngine,
    trust_forwarded_header: bool,
}

impl GeoEnricher {
    pub fn new(store: Arc<dyn GeoStore>, trust_forwarded_header: bool) -> Self {
        Self {
            engine: GeoLookupEngine::new(store),
            trust_forwarded_header,
        }
    }

    /// 解析请求元数据并生成字段表
    ///
    /// 仅在地址无法解析时返回错误，存储错误已降级为 fallback。
    pub fn enrich(&self, remote_addr: &str, forwarded_for: Option<&str>) -> Result<GeoFields> {
        let addr =
            resolve_client_address(remote_addr, forwarded_for, self.trust_forwarded_header)?;
        Ok(self.lookup_client(&addr))
    }

    /// 同 `enrich`，并把每个字段写入输出端
    pub fn enrich_into(
        &self,
        remote_addr: &str,
        forwarded_for: Option<&str>,
        sink: &mut dyn FieldSink,
    ) -> Result<GeoFields> {
        let fields = self.enrich(remote_addr, forwarded_for)?;
        for (key, value) in fields.iter() {
            sink.set(key, value);
        }
        Ok(fields)
    }

    fn lookup_client(&self, addr: &ClientAddress) -> GeoFields {
        let record = self.engine.lookup(addr).unwrap_or_else(|| {
            trace!("No GeoIP record for {} ({}), using fallback", addr, addr.class());
            fallback_record(addr)
        });
        format_record(&record)
    }

    pub fn trusts_forwarded_header(&self) -> bool {
        self.trust_forwarded_header
    }

    pub fn store_name(&self) -> &'static str {
        self.engine.store_name()
    }
}
