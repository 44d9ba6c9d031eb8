use super::TSocket;
use socket2::{Domain, Protocol, Type};
use std::{io, net::IpAddr, time::Duration};

/// `SOCK_RAW` ICMPv4 socket. Requires root or `CAP_NET_RAW`.
pub struct RawSocket {
    socket: socket2::Socket,
}

impl RawSocket {
    /// Opens the socket; `read_timeout` bounds each blocking `recv_from`.
    pub fn new(read_timeout: Duration) -> Result<RawSocket, io::Error> {
        tracing::trace!("creating raw ICMPv4 socket");
        let socket = socket2::Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        socket.set_read_timeout(Some(read_timeout))?;
        Ok(RawSocket { socket })
    }
}

impl TSocket for RawSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)> {
        // Socket2 gives a safety guaranty which allows us to do an unsafe cast from `&mut [u8]`
        // to `&mut [std::mem::MaybeUninit<u8>]`: it never writes uninitialized bytes into the buffer.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        //
        // On a RAW socket we get the whole IP packet.
        let (n_bytes, socket_addr) = self
            .socket
            .recv_from(unsafe { &mut *(buf as *mut [u8] as *mut [std::mem::MaybeUninit<u8>]) })?;
        let ip = socket_addr
            .as_socket_ipv4()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "datagram from non-IPv4 peer"))?;
        Ok((n_bytes, IpAddr::V4(*ip.ip())))
    }

    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        self.socket.set_read_timeout(Some(timeout))
    }
}
