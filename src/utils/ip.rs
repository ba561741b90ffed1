//! IP 地址处理工具
//!
//! 提供地址分类与前缀匹配功能：
//! - 地址类别判定（loopback / private / public / invalid）
//! - CIDR 解析与匹配
//! - `host[:port]` 拆分

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use strum::{AsRefStr, Display};

/// 地址类别，完全由地址位决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AddressClass {
    Loopback,
    Private,
    Public,
    Invalid,
}

/// 判定地址类别
pub fn classify(ip: &IpAddr) -> AddressClass {
    match ip {
        IpAddr::V4(v4) => classify_v4(v4),
        IpAddr::V6(v6) => {
            // IPv4-mapped (::ffff:a.b.c.d) 按其 IPv4 形式分类
            if let Some(v4) = v6.to_ipv4_mapped() {
                return classify_v4(&v4);
            }
            classify_v6(v6)
        }
    }
}

fn classify_v4(ip: &Ipv4Addr) -> AddressClass {
    if ip.is_unspecified() {
        return AddressClass::Invalid;
    }
    if ip.is_loopback() {
        return AddressClass::Loopback;
    }

    let [a, b, c, _] = ip.octets();
    let unroutable = ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        || a == 0
        || (a == 100 && (b & 0xc0) == 64) // 100.64.0.0/10 (CGNAT)
        || (a == 192 && b == 0 && c == 0) // 192.0.0.0/24
        || (a == 198 && (b & 0xfe) == 18) // 198.18.0.0/15
        || a >= 240; // 240.0.0.0/4

    if unroutable {
        AddressClass::Private
    } else {
        AddressClass::Public
    }
}

fn classify_v6(ip: &Ipv6Addr) -> AddressClass {
    if ip.is_unspecified() {
        return AddressClass::Invalid;
    }
    if ip.is_loopback() {
        return AddressClass::Loopback;
    }

    let seg0 = ip.segments()[0];
    let unroutable = (seg0 & 0xfe00) == 0xfc00 // fc00::/7 (ULA)
        || (seg0 & 0xffc0) == 0xfe80 // fe80::/10 (link-local)
        || (seg0 & 0xff00) == 0xff00 // ff00::/8 (multicast)
        || (seg0 == 0x2001 && ip.segments()[1] == 0x0db8); // 2001:db8::/32 (documentation)

    if unroutable {
        AddressClass::Private
    } else {
        AddressClass::Public
    }
}

/// 解析后的 CIDR 前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    pub network: IpAddr,
    pub prefix_len: u8,
}

impl Cidr {
    /// 解析 `192.168.1.0/24` 或单个地址（视为 /32 或 /128）
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (network, prefix_len) = match s.split_once('/') {
            Some((network, prefix_len)) => {
                let network: IpAddr = network.parse().ok()?;
                let prefix_len: u8 = prefix_len.parse().ok()?;
                (network, prefix_len)
            }
            None => {
                let network: IpAddr = s.parse().ok()?;
                let full = if network.is_ipv4() { 32 } else { 128 };
                (network, full)
            }
        };

        let max = if network.is_ipv4() { 32 } else { 128 };
        if prefix_len > max {
            return None;
        }

        Some(Self {
            network,
            prefix_len,
        })
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (ip, self.network) {
            (IpAddr::V4(ip), IpAddr::V4(net)) => {
                let mask = u32::MAX
                    .checked_shl(32 - self.prefix_len as u32)
                    .unwrap_or(0);
                let ip_bits = u32::from_be_bytes(ip.octets());
                let net_bits = u32::from_be_bytes(net.octets());
                (ip_bits & mask) == (net_bits & mask)
            }
            (IpAddr::V6(ip), IpAddr::V6(net)) => {
                let mask = u128::MAX
                    .checked_shl(128 - self.prefix_len as u32)
                    .unwrap_or(0);
                let ip_bits = u128::from_be_bytes(ip.octets());
                let net_bits = u128::from_be_bytes(net.octets());
                (ip_bits & mask) == (net_bits & mask)
            }
            _ => false, // IPv4 vs IPv6 不匹配
        }
    }
}

/// 从 `host[:port]` 中剥离端口
///
/// - `1.2.3.4:80` → `1.2.3.4`
/// - `[::1]:8080` → `::1`
/// - 无端口分隔符（`1.2.3.4`、`::1`、`not-an-ip`）→ 原样返回
pub fn strip_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        if let Some((host, _)) = rest.split_once(']') {
            return host;
        }
        return addr;
    }

    match addr.rsplit_once(':') {
        // 多个冒号且无方括号：裸 IPv6
        Some((host, _)) if !host.contains(':') => host,
        _ => addr,
    }
}
