//! Ethernet II framing
//!
//! Frames are kept as a parsed header plus an owned payload; the payload is
//! either a serialized IPv4 datagram or a serialized ARP message.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::ParseError;

/// Ethernet header length in bytes
pub const ETHERNET_HEADER_LEN: usize = 14;

/// A 48-bit Ethernet (hardware) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EthernetAddress(pub [u8; 6]);

impl EthernetAddress {
    pub const BROADCAST: EthernetAddress = EthernetAddress([0xFF; 6]);

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<[u8; 6]> for EthernetAddress {
    fn from(bytes: [u8; 6]) -> Self {
        EthernetAddress(bytes)
    }
}

impl fmt::Display for EthernetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Payload type carried by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    Ipv4,
    Arp,
    Unknown(u16),
}

impl From<u16> for EtherType {
    fn from(raw: u16) -> Self {
        match raw {
            0x0800 => EtherType::Ipv4,
            0x0806 => EtherType::Arp,
            other => EtherType::Unknown(other),
        }
    }
}

impl From<EtherType> for u16 {
    fn from(ty: EtherType) -> u16 {
        match ty {
            EtherType::Ipv4 => 0x0800,
            EtherType::Arp => 0x0806,
            EtherType::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: EthernetAddress,
    pub src: EthernetAddress,
    pub ethertype: EtherType,
}

/// An Ethernet frame as handed to and received from the transmission sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    pub header: EthernetHeader,
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    pub fn new(
        dst: EthernetAddress,
        src: EthernetAddress,
        ethertype: EtherType,
        payload: Vec<u8>,
    ) -> Self {
        EthernetFrame {
            header: EthernetHeader {
                dst,
                src,
                ethertype,
            },
            payload,
        }
    }

    /// Parse a frame from raw bytes (no preamble, no FCS).
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < ETHERNET_HEADER_LEN {
            return Err(ParseError::Truncated {
                needed: ETHERNET_HEADER_LEN,
                got: data.len(),
            });
        }

        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        dst.copy_from_slice(&data[0..6]);
        src.copy_from_slice(&data[6..12]);

        Ok(EthernetFrame::new(
            EthernetAddress(dst),
            EthernetAddress(src),
            EtherType::from(BigEndian::read_u16(&data[12..14])),
            data[ETHERNET_HEADER_LEN..].to_vec(),
        ))
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; ETHERNET_HEADER_LEN];
        bytes[0..6].copy_from_slice(&self.header.dst.0);
        bytes[6..12].copy_from_slice(&self.header.src.0);
        BigEndian::write_u16(&mut bytes[12..14], self.header.ethertype.into());
        bytes.extend_from_slice(&self.payload);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mac() {
        let mac = EthernetAddress([0x02, 0x00, 0x5e, 0x10, 0xab, 0x01]);
        assert_eq!(mac.to_string(), "02:00:5e:10:ab:01");
        assert_eq!(EthernetAddress::BROADCAST.to_string(), "ff:ff:ff:ff:ff:ff");
    }

    #[test]
    fn test_ethertype_mapping() {
        assert_eq!(EtherType::from(0x0800), EtherType::Ipv4);
        assert_eq!(EtherType::from(0x0806), EtherType::Arp);
        assert_eq!(EtherType::from(0x86DD), EtherType::Unknown(0x86DD));
        assert_eq!(u16::from(EtherType::Unknown(0x86DD)), 0x86DD);
    }

    #[test]
    fn test_frame_layout() {
        let frame = EthernetFrame::new(
            EthernetAddress::BROADCAST,
            EthernetAddress([2, 0, 0, 0, 0, 1]),
            EtherType::Arp,
            vec![0xAA, 0xBB],
        );
        let bytes = frame.serialize();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[12..14], &[0x08, 0x06]);
        assert_eq!(EthernetFrame::parse(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_short_frame_rejected() {
        assert_eq!(
            EthernetFrame::parse(&[0u8; 13]),
            Err(ParseError::Truncated {
                needed: 14,
                got: 13
            })
        );
    }
}
