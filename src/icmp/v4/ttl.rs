/// Time-to-live field of the IPv4 header carrying a reply.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Ttl(pub u8);

impl From<u8> for Ttl {
    fn from(hops: u8) -> Self {
        Ttl(hops)
    }
}

impl std::fmt::Display for Ttl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
