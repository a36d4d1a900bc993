//! ARP (Address Resolution Protocol) messages
//!
//! Only the Ethernet/IPv4 flavour is supported:
//!
//! ```text
//! +-------+-------+-------+-------+-------+-------+-------+-------+
//! |         Hardware Type         |         Protocol Type         |
//! +-------+-------+-------+-------+-------+-------+-------+-------+
//! |  HLen |  PLen |           Operation (1=Req, 2=Reply)          |
//! +-------+-------+-------+-------+-------+-------+-------+-------+
//! |       Sender Hardware Address (6) | Sender Protocol Addr (4)  |
//! +-------+-------+-------+-------+-------+-------+-------+-------+
//! |       Target Hardware Address (6) | Target Protocol Addr (4)  |
//! +-------+-------+-------+-------+-------+-------+-------+-------+
//! ```

use std::net::Ipv4Addr;

use byteorder::{BigEndian, ByteOrder};

use crate::error::ParseError;
use crate::link::ethernet::EthernetAddress;

/// ARP packet size for Ethernet/IPv4
pub const ARP_MESSAGE_LEN: usize = 28;

const HTYPE_ETHERNET: u16 = 1;
const PTYPE_IPV4: u16 = 0x0800;
const HLEN_ETHERNET: u8 = 6;
const PLEN_IPV4: u8 = 4;

/// ARP opcode (RFC 826 `ar$op`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOperation {
    /// who-has
    Request,
    /// is-at
    Reply,
}

impl ArpOperation {
    pub fn from_raw(op: u16) -> Option<Self> {
        match op {
            1 => Some(ArpOperation::Request),
            2 => Some(ArpOperation::Reply),
            _ => None,
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            ArpOperation::Request => 1,
            ArpOperation::Reply => 2,
        }
    }
}

/// An Ethernet/IPv4 ARP request or reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMessage {
    pub operation: ArpOperation,
    pub sender_ethernet_address: EthernetAddress,
    pub sender_ip_address: Ipv4Addr,
    pub target_ethernet_address: EthernetAddress,
    pub target_ip_address: Ipv4Addr,
}

impl ArpMessage {
    /// Ask who has `target_ip`. The target hardware address is left zeroed.
    pub fn request(sender_mac: EthernetAddress, sender_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Self {
        ArpMessage {
            operation: ArpOperation::Request,
            sender_ethernet_address: sender_mac,
            sender_ip_address: sender_ip,
            target_ethernet_address: EthernetAddress::default(),
            target_ip_address: target_ip,
        }
    }

    /// Answer `request` on behalf of `(our_mac, our_ip)`.
    pub fn reply_to(request: &ArpMessage, our_mac: EthernetAddress, our_ip: Ipv4Addr) -> Self {
        ArpMessage {
            operation: ArpOperation::Reply,
            sender_ethernet_address: our_mac,
            sender_ip_address: our_ip,
            target_ethernet_address: request.sender_ethernet_address,
            target_ip_address: request.sender_ip_address,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < ARP_MESSAGE_LEN {
            return Err(ParseError::Truncated {
                needed: ARP_MESSAGE_LEN,
                got: data.len(),
            });
        }

        let hardware = BigEndian::read_u16(&data[0..2]);
        let protocol = BigEndian::read_u16(&data[2..4]);
        if hardware != HTYPE_ETHERNET
            || protocol != PTYPE_IPV4
            || data[4] != HLEN_ETHERNET
            || data[5] != PLEN_IPV4
        {
            return Err(ParseError::UnsupportedArp { hardware, protocol });
        }

        let raw_op = BigEndian::read_u16(&data[6..8]);
        let operation =
            ArpOperation::from_raw(raw_op).ok_or(ParseError::UnknownArpOperation(raw_op))?;

        let mut sender_mac = [0u8; 6];
        let mut target_mac = [0u8; 6];
        sender_mac.copy_from_slice(&data[8..14]);
        target_mac.copy_from_slice(&data[18..24]);

        Ok(ArpMessage {
            operation,
            sender_ethernet_address: EthernetAddress(sender_mac),
            sender_ip_address: Ipv4Addr::from(BigEndian::read_u32(&data[14..18])),
            target_ethernet_address: EthernetAddress(target_mac),
            target_ip_address: Ipv4Addr::from(BigEndian::read_u32(&data[24..28])),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; ARP_MESSAGE_LEN];
        BigEndian::write_u16(&mut bytes[0..2], HTYPE_ETHERNET);
        BigEndian::write_u16(&mut bytes[2..4], PTYPE_IPV4);
        bytes[4] = HLEN_ETHERNET;
        bytes[5] = PLEN_IPV4;
        BigEndian::write_u16(&mut bytes[6..8], self.operation.to_raw());
        bytes[8..14].copy_from_slice(&self.sender_ethernet_address.0);
        BigEndian::write_u32(&mut bytes[14..18], u32::from(self.sender_ip_address));
        bytes[18..24].copy_from_slice(&self.target_ethernet_address.0);
        BigEndian::write_u32(&mut bytes[24..28], u32::from(self.target_ip_address));
        bytes
    }
}
