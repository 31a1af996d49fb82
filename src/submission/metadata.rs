use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use ipnet::IpNet;

/// Request facts recorded alongside an inquiry, for logs and the email footer.
#[derive(Debug, Clone)]
pub struct SubmissionMeta {
    pub ip: IpAddr,
    pub user_agent: String,
    pub referer: String,
    pub received_at: DateTime<Utc>,
}

pub fn extract(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> SubmissionMeta {
    SubmissionMeta {
        ip: client_ip(headers, peer_addr, trusted_proxies),
        user_agent: header_str(headers, "user-agent"),
        referer: header_str(headers, "referer"),
        received_at: Utc::now(),
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Client address. `X-Forwarded-For` is honored only when the direct peer is
/// a trusted proxy; the first untrusted hop wins.
pub fn client_ip(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> IpAddr {
    let peer = peer_addr.unwrap_or(IpAddr::from([127, 0, 0, 1]));

    if !trusted_proxies.iter().any(|net| net.contains(&peer)) {
        return peer;
    }

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| {
            xff.split(',')
                .filter_map(|s| s.trim().parse::<IpAddr>().ok())
                .find(|ip| !trusted_proxies.iter().any(|net| net.contains(ip)))
        })
        .unwrap_or(peer)
}
