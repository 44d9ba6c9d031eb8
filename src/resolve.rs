use crate::ping_error::PingError;
use std::net::{IpAddr, Ipv4Addr};

/// Resolves `hostname` (or a dotted-quad literal) to its first IPv4 address.
pub fn lookup_host_v4(hostname: &str) -> Result<Ipv4Addr, PingError> {
    let ips: Vec<IpAddr> = dns_lookup::lookup_host(hostname)
        .map_err(|e| PingError::with_source(format!("could not resolve hostname {hostname}"), e))?;
    ips.into_iter()
        .find_map(|ip| match ip {
            IpAddr::V4(ipv4) => Some(ipv4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| PingError::new(format!("could not resolve hostname {hostname} to IPv4")))
}
