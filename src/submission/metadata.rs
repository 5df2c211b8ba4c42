use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Resolve the submitting client's address.
///
/// `X-Forwarded-For` is honoured only when the direct peer is a trusted proxy;
/// the leftmost entry that is not itself a trusted proxy wins.
pub fn client_ip(headers: &HeaderMap, peer_addr: Option<IpAddr>, trusted_proxies: &[IpNet]) -> IpAddr {
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
