//! GeoIP enrichment middleware
//!
//! 为每个请求解析客户端地址并查询地理位置：
//! - 字段写入请求头（覆盖客户端自带的同名头，防止伪造）
//! - `GeoFields` 存入 request extensions，handler 可直接读取
//!
//! 地址无法解析时请求原样放行，富化始终是尽力而为。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::GeoIpConfig;
use crate::errors::{GeoIpError, Result};
use crate::services::geoip::{FieldSink, GeoEnricher, HeaderNames, keys};

/// 字段键 → 已解析的请求头名称
#[derive(Debug, Clone)]
pub struct HeaderTable {
    entries: Vec<(&'static str, HeaderName)>,
}

impl HeaderTable {
    pub fn from_names(names: &HeaderNames) -> Result<Self> {
        let mut entries = Vec::with_capacity(keys::ALL.len());
        for key in keys::ALL {
            if let Some(name) = names.header_for(key) {
                let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    GeoIpError::config(format!("Invalid header name '{}': {}", name, e))
                })?;
                entries.push((key, header));
            }
        }
        Ok(Self { entries })
    }

    fn header_for(&self, key: &str) -> Option<&HeaderName> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, h)| h)
    }

    fn names(&self) -> impl Iterator<Item = &HeaderName> {
        self.entries.iter().map(|(_, h)| h)
    }
}

/// 把字段写入 HTTP 头的输出端
pub struct HeaderSink<'a> {
    headers: &'a mut HeaderMap,
    table: &'a HeaderTable,
}

impl<'a> HeaderSink<'a> {
    pub fn new(headers: &'a mut HeaderMap, table: &'a HeaderTable) -> Self {
        Self { headers, table }
    }

    /// 移除所有已配置的 GeoIP 头
    pub fn clear(&mut self) {
        for name in self.table.names() {
            self.headers.remove(name);
        }
    }
}

impl FieldSink for HeaderSink<'_> {
    fn set(&mut self, key: &str, value: &str) {
        let Some(name) = self.table.header_for(key) else {
            return;
        };
        match HeaderValue::from_bytes(value.as_bytes()) {
            Ok(value) => {
                self.headers.insert(name.clone(), value);
            }
            Err(_) => {
                warn!("Skipping GeoIP header {}: invalid value {:?}", name, value);
            }
        }
    }
}

/// GeoIP 中间件工厂
#[derive(Clone)]
pub struct GeoIpMiddleware {
    enricher: GeoEnricher,
    forwarded_header: HeaderName,
    table: Arc<HeaderTable>,
}

impl GeoIpMiddleware {
    pub fn new(enricher: GeoEnricher, config: &GeoIpConfig) -> Result<Self> {
        let forwarded_header = HeaderName::from_bytes(config.forwarded_header.as_bytes())
            .map_err(|e| {
                GeoIpError::config(format!(
                    "Invalid forwarded header '{}': {}",
                    config.forwarded_header, e
                ))
            })?;

        Ok(Self {
            enricher,
            forwarded_header,
            table: Arc::new(HeaderTable::from_names(&config.headers)?),
        })
    }
}

impl<S, B> Transform<S, ServiceRequest> for GeoIpMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = GeoIpMiddlewareService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GeoIpMiddlewareService {
            service: Rc::new(service),
            enricher: self.enricher.clone(),
            forwarded_header: self.forwarded_header.clone(),
            table: self.table.clone(),
        }))
    }
}

pub struct GeoIpMiddlewareService<S> {
    service: Rc<S>,
    enricher: GeoEnricher,
    forwarded_header: HeaderName,
    table: Arc<HeaderTable>,
}

impl<S> GeoIpMiddlewareService<S> {
    fn enrich(&self, req: &mut ServiceRequest) {
        let remote_addr = req
            .peer_addr()
            .map(|addr| addr.to_string())
            .or_else(|| req.connection_info().peer_addr().map(str::to_string))
            .unwrap_or_default();
        // 非 ASCII 字节不能让请求退回 peer 地址，交给解析器判定为非法
        let forwarded_for = req
            .headers()
            .get(&self.forwarded_header)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        let mut sink = HeaderSink::new(req.headers_mut(), &self.table);
        sink.clear();

        match self
            .enricher
            .enrich_into(&remote_addr, forwarded_for.as_deref(), &mut sink)
        {
            Ok(fields) => {
                req.extensions_mut().insert(fields);
            }
            Err(e) => {
                debug!(
                    "Skipping GeoIP enrichment (remote={:?}, forwarded={:?}): {}",
                    remote_addr, forwarded_for, e
                );
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for GeoIpMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        self.enrich(&mut req);

        let srv = self.service.clone();
        Box::pin(async move { srv.call(req).await })
    }
}
