//! 客户端地址解析
//!
//! 策略（按优先级）：
//! 1. 未信任转发头，或转发头为空 → 使用连接地址 `remote_addr`
//! 2. 信任转发头 → 取 `X-Forwarded-For` 按 `", "` 分割后的第一项（最左侧，最不可信）
//! 3. 使用 `remote_addr` 时剥离可选的 `:port`，没有端口时整串作为地址
//! 4. 解析为 IPv4 / IPv6 字面量，失败返回 `AddressParse`

use std::net::IpAddr;

use tracing::trace;

use super::types::ClientAddress;
use crate::errors::{GeoIpError, Result};
use crate::utils::ip::strip_port;

/// 转发头中多个地址的分隔符
const FORWARDED_SEPARATOR: &str = ", ";

/// 从请求元数据中解析出要定位的地址
pub fn resolve_client_address(
    remote_addr: &str,
    forwarded_for: Option<&str>,
    trust_forwarded_header: bool,
) -> Result<ClientAddress> {
    let candidate = match forwarded_for {
        Some(fwd) if trust_forwarded_header && !fwd.is_empty() => {
            let first = fwd.split(FORWARDED_SEPARATOR).next().unwrap_or(fwd);
            trace!("Using forwarded-for address {:?} (from {:?})", first, fwd);
            first
        }
        _ => strip_port(remote_addr),
    };

    let ip: IpAddr = candidate.parse().map_err(|_| {
        GeoIpError::address_parse(format!("unable to parse address: {:?}", candidate))
    })?;

    Ok(ClientAddress::new(ip))
}
