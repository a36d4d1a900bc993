//! Link layer protocols
//!
//! This module contains the link layer value types exchanged by interfaces:
//! - Ethernet: addresses, headers and frames
//! - ARP: Address Resolution Protocol messages for Ethernet/IPv4

pub mod arp;
pub mod ethernet;

// Re-export commonly used items
pub use arp::{ArpMessage, ArpOperation};
pub use ethernet::{EtherType, EthernetAddress, EthernetFrame, EthernetHeader};
