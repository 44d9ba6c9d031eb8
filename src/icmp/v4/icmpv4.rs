use super::{checksum, SequenceNumber, TSocket, Ttl};
use crate::ping_error::PingError;
use crate::timing::Timestamp;
use pnet_packet::icmp::{
    echo_reply::EchoReplyPacket, echo_request::MutableEchoRequestPacket, IcmpCode, IcmpPacket, IcmpTypes,
};
use pnet_packet::ipv4::Ipv4Packet;
use pnet_packet::Packet;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Size of an outgoing Echo Request: 8 byte ICMP header and 56 bytes of zeros.
pub const PACKET_SIZE: usize = 64;
pub const ICMP_HEADER_SIZE: usize = 8;
pub const PAYLOAD_SIZE: usize = PACKET_SIZE - ICMP_HEADER_SIZE;
pub const IPV4_HEADER_SIZE: usize = 20;

const RECV_BUFFER_SIZE: usize = 1024;

/// Identifier carried by every request of this process.
#[allow(clippy::cast_possible_truncation)]
pub fn process_identifier() -> u16 {
    std::process::id() as u16
}

/// An Echo Request as it went out on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EchoRequest {
    pub identifier: u16,
    pub sequence_number: SequenceNumber,
    pub send_time: Timestamp,
}

/// An ICMP message parsed from one inbound IPv4 datagram.
///
/// Raw sockets deliver every ICMP message addressed to the host, so this is not
/// necessarily an Echo Reply; see [`EchoReply::is_reply_to`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EchoReply {
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub identifier: u16,
    pub sequence_number: SequenceNumber,
    pub source: Ipv4Addr,
    pub ttl: Ttl,
    /// IPv4 header length in bytes.
    pub header_length: usize,
    /// Bytes following the IPv4 header.
    pub package_size: usize,
    pub receive_time: Timestamp,
}

impl EchoReply {
    /// Whether this is an Echo Reply answering a request sent with `identifier`.
    pub fn is_reply_to(&self, identifier: u16) -> bool {
        self.icmp_type == IcmpTypes::EchoReply.0 && self.identifier == identifier
    }
}

/// Builds an Echo Request frame of [`PACKET_SIZE`] bytes.
pub fn new_echo_request(identifier: u16, sequence_number: SequenceNumber) -> Option<[u8; PACKET_SIZE]> {
    let mut buf = [0u8; PACKET_SIZE];
    {
        let mut package = MutableEchoRequestPacket::new(&mut buf[..])?;
        package.set_icmp_type(IcmpTypes::EchoRequest);
        package.set_icmp_code(IcmpCode::new(0));
        package.set_identifier(identifier);
        package.set_sequence_number(sequence_number.into());
        package.set_checksum(0_u16);
        let sum = checksum(package.packet());
        package.set_checksum(sum);
    }
    Some(buf)
}

/// Parses a raw IPv4 datagram, locating the ICMP message through the header length field.
pub fn parse_echo_reply(datagram: &[u8], receive_time: Timestamp) -> Result<EchoReply, PingError> {
    let ipv4 = Ipv4Packet::new(datagram)
        .ok_or_else(|| PingError::new(format!("truncated IPv4 header ({} bytes)", datagram.len())))?;
    let header_length = usize::from(ipv4.get_header_length()) * 4;
    if header_length < IPV4_HEADER_SIZE {
        return Err(PingError::new(format!("invalid IPv4 header length {header_length}")));
    }
    let icmp_bytes = datagram.get(header_length..).unwrap_or_default();
    let icmp = IcmpPacket::new(icmp_bytes);
    let echo = EchoReplyPacket::new(icmp_bytes);
    let (Some(icmp), Some(echo)) = (icmp, echo) else {
        return Err(PingError::new(format!(
            "truncated ICMP header ({} bytes after a {header_length} byte IPv4 header)",
            icmp_bytes.len()
        )));
    };
    Ok(EchoReply {
        icmp_type: icmp.get_icmp_type().0,
        icmp_code: icmp.get_icmp_code().0,
        identifier: echo.get_identifier(),
        sequence_number: echo.get_sequence_number().into(),
        source: ipv4.get_source(),
        ttl: ipv4.get_ttl().into(),
        header_length,
        package_size: icmp_bytes.len(),
        receive_time,
    })
}

/// Echo Request/Reply exchange over one socket.
pub(crate) struct IcmpV4<S> {
    socket: S,
    identifier: u16,
}

impl<S> IcmpV4<S>
where
    S: TSocket,
{
    pub(crate) fn new(socket: S, identifier: u16) -> IcmpV4<S> {
        IcmpV4 { socket, identifier }
    }

    pub(crate) fn identifier(&self) -> u16 {
        self.identifier
    }

    pub(crate) fn send_to(&self, ipv4: Ipv4Addr, sequence_number: SequenceNumber) -> Result<EchoRequest, PingError> {
        let addr: socket2::SockAddr = SocketAddr::new(IpAddr::V4(ipv4), 0).into();
        let package = new_echo_request(self.identifier, sequence_number)
            .ok_or_else(|| PingError::new("could not create ICMP package"))?;

        let send_time = Timestamp::now();
        let n_bytes = self.socket.send_to(&package, &addr)?;
        if n_bytes != PACKET_SIZE {
            return Err(PingError::new(format!("sent {n_bytes} of {PACKET_SIZE} bytes")));
        }
        tracing::trace!("icmpv4 sent icmp_seq={} to {}", sequence_number, ipv4);
        Ok(EchoRequest { identifier: self.identifier, sequence_number, send_time })
    }

    pub(crate) fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        self.socket.set_read_timeout(timeout)
    }

    /// Reads at most one datagram.
    pub(crate) fn try_receive(&self) -> io::Result<Received> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        match self.socket.recv_from(&mut buf) {
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => Ok(Received::Nothing),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                Ok(Received::Malformed(PingError::with_source("unreadable datagram", e)))
            }
            Err(e) => Err(e),
            Ok((n_bytes, ip_addr)) => {
                let receive_time = Timestamp::now();
                tracing::trace!("icmpv4 received {} bytes from {}", n_bytes, ip_addr);
                Ok(match parse_echo_reply(&buf[..n_bytes], receive_time) {
                    Ok(reply) => Received::Reply(reply),
                    Err(e) => Received::Malformed(e),
                })
            }
        }
    }
}

/// Result of one read from the socket.
#[derive(Debug)]
pub(crate) enum Received {
    /// The read timeout expired.
    Nothing,
    Reply(EchoReply),
    /// A datagram arrived but could not be decoded.
    Malformed(PingError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icmp::v4::socket::tests::{
        echo_reply_datagram, echo_reply_message, icmp_datagram, ipv4_datagram, OnReceive, OnSend, SocketMock,
        MOCK_PEER, MOCK_TTL,
    };
    use pnet_packet::icmp::echo_request::EchoRequestPacket;

    const IDENTIFIER: u16 = 0xABCD;

    #[test]
    fn echo_request_layout() {
        let package = new_echo_request(IDENTIFIER, SequenceNumber::from(7)).unwrap();
        let request = EchoRequestPacket::new(&package).unwrap();

        assert_eq!(IcmpTypes::EchoRequest, request.get_icmp_type());
        assert_eq!(IcmpCode::new(0), request.get_icmp_code());
        assert_eq!(IDENTIFIER, request.get_identifier());
        assert_eq!(7, request.get_sequence_number());
        assert!(package[ICMP_HEADER_SIZE..].iter().all(|b| *b == 0));
        assert_eq!(PAYLOAD_SIZE, request.payload().len());
    }

    #[test]
    fn echo_request_checksum_verifies() {
        let package = new_echo_request(IDENTIFIER, SequenceNumber::from(300)).unwrap();
        let request = EchoRequestPacket::new(&package).unwrap();

        assert_ne!(0, request.get_checksum());
        assert_eq!(0, checksum(&package));
        assert_eq!(
            pnet_packet::icmp::checksum(&IcmpPacket::new(&package).unwrap()),
            request.get_checksum()
        );
    }

    #[test]
    fn parse_echo_reply_from_ipv4_datagram() {
        let receive_time = Timestamp::now();
        let reply = parse_echo_reply(&echo_reply_datagram(IDENTIFIER, 3), receive_time).unwrap();

        assert!(reply.is_reply_to(IDENTIFIER));
        assert_eq!(SequenceNumber::from(3), reply.sequence_number);
        assert_eq!(Ttl(MOCK_TTL), reply.ttl);
        assert_eq!(MOCK_PEER, reply.source);
        assert_eq!(IPV4_HEADER_SIZE, reply.header_length);
        assert_eq!(PACKET_SIZE, reply.package_size);
        assert_eq!(receive_time, reply.receive_time);
    }

    #[test]
    fn parse_honours_ipv4_options() {
        let datagram = ipv4_datagram(6, &echo_reply_message(IDENTIFIER, 9));
        let reply = parse_echo_reply(&datagram, Timestamp::now()).unwrap();

        assert_eq!(24, reply.header_length);
        assert!(reply.is_reply_to(IDENTIFIER));
        assert_eq!(SequenceNumber::from(9), reply.sequence_number);
    }

    #[test]
    fn reply_with_other_identifier_is_foreign() {
        let reply = parse_echo_reply(&echo_reply_datagram(IDENTIFIER + 1, 0), Timestamp::now()).unwrap();
        assert!(!reply.is_reply_to(IDENTIFIER));
    }

    #[test]
    fn other_icmp_types_are_foreign() {
        let reply = parse_echo_reply(&icmp_datagram(3, 1), Timestamp::now()).unwrap();
        assert_eq!((3, 1), (reply.icmp_type, reply.icmp_code));
        assert!(!reply.is_reply_to(reply.identifier));
    }

    #[test]
    fn truncated_datagrams_are_rejected() {
        let datagram = echo_reply_datagram(IDENTIFIER, 0);
        for len in [0, 1, IPV4_HEADER_SIZE - 1, IPV4_HEADER_SIZE, IPV4_HEADER_SIZE + ICMP_HEADER_SIZE - 1] {
            assert!(parse_echo_reply(&datagram[..len], Timestamp::now()).is_err(), "len {len}");
        }
        assert!(parse_echo_reply(&datagram[..IPV4_HEADER_SIZE + ICMP_HEADER_SIZE], Timestamp::now()).is_ok());
    }

    #[test]
    fn header_length_below_minimum_is_rejected() {
        let mut datagram = echo_reply_datagram(IDENTIFIER, 0);
        datagram[0] = 0x44;
        assert!(parse_echo_reply(&datagram, Timestamp::now()).is_err());
    }

    #[test]
    fn test_send_one_ping() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, vec![]);
        let icmpv4 = IcmpV4::new(socket_mock.clone(), IDENTIFIER);

        let addr = Ipv4Addr::new(127, 0, 0, 1);
        let request = icmpv4.send_to(addr, SequenceNumber::start_value()).unwrap();

        assert_eq!(IDENTIFIER, request.identifier);
        assert_eq!(SequenceNumber::start_value(), request.sequence_number);
        socket_mock
            .should_send_number_of_messages(1)
            .should_send_to_address(&IpAddr::V4(addr));
        assert_eq!(PACKET_SIZE, socket_mock.sent_packets()[0].len());
    }

    #[test]
    fn test_send_fails_when_socket_fails() {
        let socket_mock = SocketMock::new(OnSend::ReturnErr, vec![]);
        let icmpv4 = IcmpV4::new(socket_mock.clone(), IDENTIFIER);

        assert!(icmpv4.send_to(Ipv4Addr::LOCALHOST, SequenceNumber::start_value()).is_err());
        socket_mock.should_send_number_of_messages(0);
    }

    #[test]
    fn test_try_receive() {
        let socket_mock = SocketMock::new(
            OnSend::ReturnDefault,
            vec![
                OnReceive::Datagram(echo_reply_datagram(IDENTIFIER, 1)),
                OnReceive::WouldBlock,
                OnReceive::Datagram(vec![0x45, 0x00]),
                OnReceive::Fail(io::ErrorKind::ConnectionRefused),
            ],
        );
        let icmpv4 = IcmpV4::new(socket_mock.clone(), IDENTIFIER);

        let Received::Reply(reply) = icmpv4.try_receive().unwrap() else {
            panic!("expected a reply");
        };
        assert_eq!(SequenceNumber::from(1), reply.sequence_number);
        assert!(matches!(icmpv4.try_receive().unwrap(), Received::Nothing));
        let Received::Malformed(error) = icmpv4.try_receive().unwrap() else {
            panic!("expected a malformed datagram");
        };
        assert_eq!("truncated IPv4 header (2 bytes)", error.message);
        assert_eq!("PingError: truncated IPv4 header (2 bytes)", error.to_string());
        assert_eq!(io::ErrorKind::ConnectionRefused, icmpv4.try_receive().unwrap_err().kind());
        socket_mock.should_receive_number_of_messages(2);
    }

    #[test]
    fn test_try_receive_from_non_ipv4_peer() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, vec![OnReceive::Fail(io::ErrorKind::InvalidData)]);
        let icmpv4 = IcmpV4::new(socket_mock, IDENTIFIER);

        let Received::Malformed(error) = icmpv4.try_receive().unwrap() else {
            panic!("expected a malformed datagram");
        };
        assert_eq!("unreadable datagram", error.message);
        assert!(std::error::Error::source(&error).is_some());
    }
}
