type SequenceNumberInnerType = u16;

/// ICMP Echo sequence number; incremented once per send attempt of a session.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct SequenceNumber(SequenceNumberInnerType);

impl SequenceNumber {
    pub fn start_value() -> SequenceNumber {
        // The first request of a session carries icmp_seq=0.
        SequenceNumber(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        SequenceNumber(self.0.wrapping_add(1))
    }
}

impl From<SequenceNumber> for SequenceNumberInnerType {
    fn from(value: SequenceNumber) -> Self {
        value.0
    }
}

impl From<SequenceNumberInnerType> for SequenceNumber {
    fn from(value: SequenceNumberInnerType) -> Self {
        SequenceNumber(value)
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
