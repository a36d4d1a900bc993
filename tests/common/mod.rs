//! Shared helpers for integration tests: log setup and a simulated wire.

#![allow(dead_code)]

use std::net::Ipv4Addr;

use toy_netcore::{EthernetAddress, EthernetFrame, FrameQueue, NetworkInterface};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness. `RUST_LOG` selects the level.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn mac(n: u8) -> EthernetAddress {
    EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, n])
}

/// An interface plus the queue collecting what it transmits.
pub fn interface(name: &str, mac: EthernetAddress, ip: Ipv4Addr) -> (NetworkInterface, FrameQueue) {
    let out = FrameQueue::new();
    let iface = NetworkInterface::new(name, Box::new(out.clone()), mac, ip);
    (iface, out)
}

/// Carry every frame queued in `from` across the wire into `to`.
///
/// Frames are serialized and parsed again on the way, like a real link.
/// Returns the number of frames carried.
pub fn deliver(from: &FrameQueue, to: &mut NetworkInterface) -> usize {
    let frames = from.drain();
    for frame in &frames {
        let wire = frame.serialize();
        let received = EthernetFrame::parse(&wire).expect("frame survives the wire");
        to.recv_frame(&received);
    }
    frames.len()
}
