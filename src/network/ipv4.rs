//! IPv4 protocol implementation
//!
//! This module provides the IPv4 datagram value type that travels through
//! interfaces and the router.
//!
//! Features:
//! - IPv4 header parsing and serialization
//! - Checksum calculation and validation
//! - Datagram construction with a consistent header
//!
//! Header options are carried opaquely so a forwarded datagram keeps them.

use std::net::Ipv4Addr;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{ParseError, PayloadTooLarge};
use crate::network::checksum;

pub const IPV4_HEADER_LEN: usize = 20;
const IPV4_VERSION: u8 = 4;
const DEFAULT_IHL: u8 = 5; // 5 * 4 = 20 bytes (standard header length)
pub const DEFAULT_TTL: u8 = 64;
/// Largest payload an option-less header can describe
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize - IPV4_HEADER_LEN;

/// IPv4 protocol constants
pub mod protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}

/// IPv4 packet header structure
///
/// Represents the IPv4 header as defined in RFC 791
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8, // Internet Header Length, in 32-bit words
    pub tos: u8, // Type of Service
    pub total_len: u16,
    pub id: u16,
    pub flags_frag_offset: u16, // Flags and Fragment Offset
    pub ttl: u8,                // Time to Live
    pub protocol: u8,           // Next Protocol
    pub checksum: u16,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    /// Raw option bytes, `header_len() - 20` long
    pub options: Vec<u8>,
}

impl Ipv4Header {
    /// Create a header for a payload of `payload_len` bytes.
    ///
    /// The checksum is filled in. Fails if `payload_len` exceeds
    /// [`MAX_PAYLOAD_LEN`].
    pub fn new(
        protocol: u8,
        ttl: u8,
        src_addr: Ipv4Addr,
        dst_addr: Ipv4Addr,
        payload_len: usize,
    ) -> Result<Self, PayloadTooLarge> {
        let total_len = IPV4_HEADER_LEN
            .checked_add(payload_len)
            .and_then(|len| u16::try_from(len).ok())
            .ok_or(PayloadTooLarge {
                len: payload_len,
                max: MAX_PAYLOAD_LEN,
            })?;
        let mut header = Ipv4Header {
            version: IPV4_VERSION,
            ihl: DEFAULT_IHL,
            tos: 0,
            total_len,
            id: 0,
            flags_frag_offset: 0,
            ttl,
            protocol,
            checksum: 0,
            src_addr,
            dst_addr,
            options: Vec::new(),
        };
        header.update_checksum();
        Ok(header)
    }

    /// Parse an IPv4 header from the front of `data`.
    ///
    /// Checks version, header length, total length against the buffer, and
    /// the header checksum.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < IPV4_HEADER_LEN {
            return Err(ParseError::Truncated {
                needed: IPV4_HEADER_LEN,
                got: data.len(),
            });
        }

        let version = data[0] >> 4;
        if version != IPV4_VERSION {
            return Err(ParseError::UnsupportedVersion(version));
        }

        let ihl = data[0] & 0x0F;
        if ihl < DEFAULT_IHL {
            return Err(ParseError::BadHeaderLength(ihl));
        }
        let header_len = ihl as usize * 4;
        if data.len() < header_len {
            return Err(ParseError::Truncated {
                needed: header_len,
                got: data.len(),
            });
        }

        let total_len = BigEndian::read_u16(&data[2..4]);
        if (total_len as usize) < header_len || (total_len as usize) > data.len() {
            return Err(ParseError::BadTotalLength {
                total_len,
                available: data.len(),
            });
        }

        let expected = BigEndian::read_u16(&data[10..12]);
        if checksum(&data[..header_len]) != 0 {
            let mut zeroed = data[..header_len].to_vec();
            zeroed[10] = 0;
            zeroed[11] = 0;
            return Err(ParseError::ChecksumMismatch {
                expected,
                computed: checksum(&zeroed),
            });
        }

        Ok(Ipv4Header {
            version,
            ihl,
            tos: data[1],
            total_len,
            id: BigEndian::read_u16(&data[4..6]),
            flags_frag_offset: BigEndian::read_u16(&data[6..8]),
            ttl: data[8],
            protocol: data[9],
            checksum: expected,
            src_addr: Ipv4Addr::from(BigEndian::read_u32(&data[12..16])),
            dst_addr: Ipv4Addr::from(BigEndian::read_u32(&data[16..20])),
            options: data[IPV4_HEADER_LEN..header_len].to_vec(),
        })
    }

    /// Serialize the header, options included, as it goes on the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; IPV4_HEADER_LEN + self.options.len()];
        bytes[0] = (self.version << 4) | self.ihl;
        bytes[1] = self.tos;
        BigEndian::write_u16(&mut bytes[2..4], self.total_len);
        BigEndian::write_u16(&mut bytes[4..6], self.id);
        BigEndian::write_u16(&mut bytes[6..8], self.flags_frag_offset);
        bytes[8] = self.ttl;
        bytes[9] = self.protocol;
        BigEndian::write_u16(&mut bytes[10..12], self.checksum);
        BigEndian::write_u32(&mut bytes[12..16], u32::from(self.src_addr));
        BigEndian::write_u32(&mut bytes[16..20], u32::from(self.dst_addr));
        bytes[IPV4_HEADER_LEN..].copy_from_slice(&self.options);
        bytes
    }

    /// Checksum of this header with the checksum field treated as zero.
    pub fn compute_checksum(&self) -> u16 {
        let mut bytes = self.serialize();
        bytes[10] = 0;
        bytes[11] = 0;
        checksum(&bytes)
    }

    /// Update checksum after modifying header fields
    pub fn update_checksum(&mut self) {
        self.checksum = self.compute_checksum();
    }

    /// Get the header length in bytes
    pub fn header_len(&self) -> usize {
        (self.ihl as usize) * 4
    }

    /// Get payload length (total length - header length)
    pub fn payload_len(&self) -> usize {
        (self.total_len as usize).saturating_sub(self.header_len())
    }
}

/// An IPv4 datagram: header plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Datagram {
    pub header: Ipv4Header,
    pub payload: Vec<u8>,
}

impl Ipv4Datagram {
    /// Build a datagram whose header lengths and checksum match `payload`.
    pub fn new(
        src_addr: Ipv4Addr,
        dst_addr: Ipv4Addr,
        protocol: u8,
        ttl: u8,
        payload: Vec<u8>,
    ) -> Result<Self, PayloadTooLarge> {
        let header = Ipv4Header::new(protocol, ttl, src_addr, dst_addr, payload.len())?;
        Ok(Ipv4Datagram { header, payload })
    }

    /// Parse a datagram. Bytes beyond `total_len` (link-layer padding) are ignored.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let header = Ipv4Header::parse(data)?;
        let payload = data[header.header_len()..header.total_len as usize].to_vec();
        Ok(Ipv4Datagram { header, payload })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = self.header.serialize();
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn destination(&self) -> Ipv4Addr {
        self.header.dst_addr
    }

    pub fn source(&self) -> Ipv4Addr {
        self.header.src_addr
    }
}
