//! Network layer
//!
//! This module contains the IPv4 datagram codec consumed by interfaces and
//! the router, plus the Internet checksum it relies on.

pub mod ipv4;

// Re-export commonly used items
pub use ipv4::{protocol, Ipv4Datagram, Ipv4Header};

/// Calculate Internet checksum
///
/// Algorithm: Sum data in 16-bit chunks, add carry bits to the sum,
/// and return the one's complement of the result.
/// Running it over a header that already carries its checksum yields 0.
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum = 0u32;

    for chunk in data.chunks_exact(2) {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
    }

    // Odd trailing byte is padded with zero
    if data.len() % 2 != 0 {
        if let Some(&last_byte) = data.last() {
            sum += (last_byte as u32) << 8;
        }
    }

    while (sum >> 16) > 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !sum as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_rfc1071_example() {
        // RFC 1071 section 3 sample: 0001 f203 f4f5 f6f7 sums to 0xddf2
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(checksum(&data), !0xddf2);
    }

    #[test]
    fn test_checksum_odd_length() {
        assert_eq!(checksum(&[0xab]), !0xab00);
    }
}
