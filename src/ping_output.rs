use crate::icmp::v4::{SequenceNumber, Ttl};
use std::fmt;
use std::net::IpAddr;

/// A matched Echo Reply, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct PingOutput {
    pub package_size: usize,
    pub ip_addr: IpAddr,
    pub ttl: Ttl,
    pub sequence_number: SequenceNumber,
    pub rtt_ms: f64,
}

impl fmt::Display for PingOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes from {}: icmp_seq={} ttl={} time={:.2} ms",
            self.package_size, self.ip_addr, self.sequence_number, self.ttl, self.rtt_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn fmt() {
        let output = PingOutput {
            package_size: 64,
            ip_addr: IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)),
            ttl: Ttl(56),
            sequence_number: SequenceNumber::from(4),
            rtt_ms: 11.2571,
        };
        assert_eq!("64 bytes from 93.184.216.34: icmp_seq=4 ttl=56 time=11.26 ms", output.to_string());
    }
}
