use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::services::geoip::{FieldSink, GeoEnricher, GeoFields, PlaceholderSink};

/// 占位符前缀（由 server 模式注入 app_data）
#[derive(Clone, Debug)]
pub struct PlaceholderPrefix(pub String);

#[derive(Deserialize)]
pub struct PlaceholderQuery {
    /// 可选模板，存在时返回渲染后的纯文本
    template: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    trust_forwarded_header: bool,
}

pub struct GeoIpService;

impl GeoIpService {
    /// 返回当前请求的 GeoIP 字段，未富化时返回 `{}`
    pub async fn fields(req: HttpRequest) -> impl Responder {
        let fields = req
            .extensions()
            .get::<GeoFields>()
            .cloned()
            .unwrap_or_default();
        trace!("Serving {} GeoIP fields", fields.len());

        HttpResponse::Ok().json(fields)
    }

    /// 返回 `geoip_xxx` 形式的占位符表；带 `template` 参数时返回渲染结果
    pub async fn placeholders(
        req: HttpRequest,
        prefix: web::Data<PlaceholderPrefix>,
        query: web::Query<PlaceholderQuery>,
    ) -> impl Responder {
        let mut sink = PlaceholderSink::new(prefix.0.clone());
        if let Some(fields) = req.extensions().get::<GeoFields>() {
            for (key, value) in fields.iter() {
                sink.set(key, value);
            }
        }

        match &query.template {
            Some(template) => HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(sink.render(template)),
            None => HttpResponse::Ok().json(sink.into_inner()),
        }
    }

    pub async fn health(enricher: web::Data<GeoEnricher>) -> impl Responder {
        HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            store: enricher.store_name(),
            trust_forwarded_header: enricher.trusts_forwarded_header(),
        })
    }
}

/// GeoIP 路由
pub fn geoip_routes() -> actix_web::Scope {
    web::scope("/geoip")
        .route("", web::get().to(GeoIpService::fields))
        .route("", web::head().to(GeoIpService::fields))
        .route("/placeholders", web::get().to(GeoIpService::placeholders))
}

/// 健康检查路由
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(GeoIpService::health))
        .route("", web::head().to(GeoIpService::health))
}
