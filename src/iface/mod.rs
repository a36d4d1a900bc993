//! Network interface abstraction layer
//!
//! This module provides the glue between IP and Ethernet:
//! - ARP resolution with an expiring cache
//! - Queueing of datagrams awaiting resolution
//! - Transmission sinks the interface hands its frames to

pub mod interface;
pub mod sink;

// Re-export commonly used items
pub use interface::NetworkInterface;
pub use sink::{FrameQueue, FrameSink};
