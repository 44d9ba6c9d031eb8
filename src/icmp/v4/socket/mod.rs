use std::{io, net::IpAddr, time::Duration};

pub(crate) mod raw_socket;

/// A raw ICMPv4 channel.
pub trait TSocket: Send + Sync {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize>;

    /// Receives one complete IPv4 datagram, IP header included.
    ///
    /// Fails with `WouldBlock` or `TimedOut` when nothing arrives within the read timeout.
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)>;

    /// Bounds the next blocking `recv_from` calls. `timeout` must not be zero.
    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()>;
}
