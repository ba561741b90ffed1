use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::GeoIpConfig;
use crate::services::geoip::{GeoEnricher, GeoStore, MaxMindStore, PrefixTableStore};

/// 根据配置打开地址库
///
/// 1. 配置了 database_path → MaxMindStore
/// 2. 配置了 prefix_table_path → PrefixTableStore
/// 3. 都未配置 → 空前缀表（所有地址走 fallback）
///
/// 配置了但无法打开属于启动失败，不会静默降级。
pub fn open_store(config: &GeoIpConfig) -> Result<Arc<dyn GeoStore>> {
    if let Some(ref path) = config.database_path {
        let store = MaxMindStore::open(path)
            .with_context(|| format!("Failed to open MaxMind database at {}", path))?;
        return Ok(Arc::new(store));
    }

    if let Some(ref path) = config.prefix_table_path {
        let store = PrefixTableStore::load(path)
            .with_context(|| format!("Failed to load prefix table at {}", path))?;
        return Ok(Arc::new(store));
    }

    warn!(
        "GeoIP: No database configured (geoip.database_path / geoip.prefix_table_path), \
         every address will resolve to a fallback record"
    );
    Ok(Arc::new(PrefixTableStore::empty()))
}

/// 准备富化流水线
pub fn prepare_enricher(config: &GeoIpConfig) -> Result<GeoEnricher> {
    let start_time = Instant::now();
    debug!("Preparing GeoIP enricher...");

    let store = open_store(config)?;

    if config.trust_forwarded_header {
        warn!(
            "GeoIP: Trusting the leftmost {} entry. \
             Clients can spoof their location unless a trusted proxy overwrites this header.",
            config.forwarded_header
        );
    }

    let enricher = GeoEnricher::new(store, config.trust_forwarded_header);
    info!(
        "GeoIP: Initialized with {} store in {:?}",
        enricher.store_name(),
        start_time.elapsed()
    );
    Ok(enricher)
}
