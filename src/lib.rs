//! Data-plane primitives of a minimal TCP/IP stack
//!
//! This library provides:
//! - A flow-controlled byte stream with reader and writer views
//! - 32-bit wrapping sequence numbers
//! - An Ethernet network interface that resolves next hops with ARP
//! - A longest-prefix-match IPv4 router
//!
//! Nothing here touches a real wire: interfaces hand frames to an injected
//! [`FrameSink`] and are fed frames through [`NetworkInterface::recv_frame`].
//! Time only moves when the owner calls [`NetworkInterface::tick`].

pub mod config;
pub mod error;
pub mod iface;
pub mod link;
pub mod network;
pub mod router;
pub mod transport;

// Re-export commonly used types
pub use config::InterfaceConfig;
pub use error::{ConfigError, ParseError, PayloadTooLarge, RouterError};
pub use iface::{FrameQueue, FrameSink, NetworkInterface};
pub use link::{ArpMessage, ArpOperation, EtherType, EthernetAddress, EthernetFrame, EthernetHeader};
pub use network::{Ipv4Datagram, Ipv4Header};
pub use router::{Route, Router};
pub use transport::{ByteStream, Reader, Wrap32, Writer};
