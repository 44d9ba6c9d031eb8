/// Computes the one's-complement internet checksum (RFC 1071) over `bytes`.
///
/// The buffer is summed as 16-bit words in network byte order. A trailing odd byte is
/// padded with a zero low byte. The checksum field of the message must be zero while
/// the checksum is computed; a message carrying a valid checksum sums to zero.
#[allow(clippy::cast_possible_truncation)]
pub fn checksum(bytes: &[u8]) -> u16 {
    let mut words = bytes.chunks_exact(2);
    let mut sum: u64 = words
        .by_ref()
        .map(|word| u64::from(u16::from_be_bytes([word[0], word[1]])))
        .sum();
    if let [last] = words.remainder() {
        sum += u64::from(*last) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !(sum as u16)
}
