mod checksum;
pub use checksum::checksum;

mod icmpv4;
pub(crate) use icmpv4::{IcmpV4, Received};
pub use icmpv4::{
    new_echo_request, parse_echo_reply, process_identifier, EchoReply, EchoRequest, ICMP_HEADER_SIZE,
    IPV4_HEADER_SIZE, PACKET_SIZE, PAYLOAD_SIZE,
};

mod sequence_number;
pub use sequence_number::SequenceNumber;

mod ttl;
pub use ttl::Ttl;

pub(crate) mod socket;
pub use socket::raw_socket::RawSocket;
pub use socket::TSocket;
