//! Ethernet network interface with ARP resolution
//!
//! This module connects the IP layer to the link layer:
//! - Outbound datagrams are framed for their next hop's Ethernet address
//! - Unknown next hops are resolved with ARP; datagrams wait until then
//! - Inbound frames become datagrams for the owner to poll, or feed the
//!   ARP cache
//!
//! The interface keeps its own millisecond clock, advanced only by
//! [`NetworkInterface::tick`].

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::net::Ipv4Addr;

use tracing::{debug, trace, warn};

use crate::config::InterfaceConfig;
use crate::iface::sink::FrameSink;
use crate::link::{ArpMessage, ArpOperation, EtherType, EthernetAddress, EthernetFrame};
use crate::network::Ipv4Datagram;

/// What the interface knows about one next-hop IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArpEntry {
    /// Learned mapping, valid while `now < expires_at`
    Resolved {
        mac: EthernetAddress,
        expires_at: u64,
    },
    /// Request in flight; gates retransmission
    Pending { requested_at: u64 },
}

/// Network interface bridging IPv4 datagrams and Ethernet frames.
pub struct NetworkInterface {
    name: String,
    sink: Box<dyn FrameSink>,
    ethernet_address: EthernetAddress,
    ip_address: Ipv4Addr,
    config: InterfaceConfig,
    /// Milliseconds since construction
    now_ms: u64,
    arp_cache: HashMap<Ipv4Addr, ArpEntry>,
    /// Datagrams waiting for their next hop to resolve, in send order
    pending: VecDeque<(Ipv4Datagram, Ipv4Addr)>,
    dropped_pending: u64,
    datagrams_received: VecDeque<Ipv4Datagram>,
}

impl NetworkInterface {
    /// Create an interface with the default ARP policy.
    pub fn new(
        name: impl Into<String>,
        sink: Box<dyn FrameSink>,
        ethernet_address: EthernetAddress,
        ip_address: Ipv4Addr,
    ) -> Self {
        Self::with_config(
            name,
            sink,
            ethernet_address,
            ip_address,
            InterfaceConfig::default(),
        )
    }

    pub fn with_config(
        name: impl Into<String>,
        sink: Box<dyn FrameSink>,
        ethernet_address: EthernetAddress,
        ip_address: Ipv4Addr,
        config: InterfaceConfig,
    ) -> Self {
        let name = name.into();
        debug!(
            interface = %name,
            mac = %ethernet_address,
            ip = %ip_address,
            "network interface created"
        );

        NetworkInterface {
            name,
            sink,
            ethernet_address,
            ip_address,
            config,
            now_ms: 0,
            arp_cache: HashMap::new(),
            pending: VecDeque::new(),
            dropped_pending: 0,
            datagrams_received: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ethernet_address(&self) -> EthernetAddress {
        self.ethernet_address
    }

    pub fn ip_address(&self) -> Ipv4Addr {
        self.ip_address
    }

    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    /// Current value of the interface clock (ms).
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Send a datagram towards `next_hop`.
    ///
    /// With a valid cached mapping the frame goes out immediately. Otherwise
    /// the datagram is queued, and an ARP request is broadcast unless one for
    /// the same address went out less than `arp_retry_ms` ago.
    pub fn send_datagram(&mut self, dgram: Ipv4Datagram, next_hop: Ipv4Addr) {
        match self.arp_cache.get(&next_hop).copied() {
            Some(ArpEntry::Resolved { mac, expires_at }) if expires_at > self.now_ms => {
                self.transmit_datagram(&dgram, mac);
                return;
            }
            Some(ArpEntry::Pending { requested_at })
                if self.now_ms - requested_at < self.config.arp_retry_ms =>
            {
                trace!(interface = %self.name, %next_hop, "ARP request already in flight");
            }
            _ => self.request_address(next_hop),
        }

        self.enqueue_pending(dgram, next_hop);
    }

    /// Handle a frame delivered by the link.
    ///
    /// Frames for other stations are ignored, as is anything that fails to
    /// parse.
    pub fn recv_frame(&mut self, frame: &EthernetFrame) {
        let dst = frame.header.dst;
        if dst != self.ethernet_address && !dst.is_broadcast() {
            return;
        }

        match frame.header.ethertype {
            EtherType::Ipv4 => match Ipv4Datagram::parse(&frame.payload) {
                Ok(dgram) => {
                    trace!(
                        interface = %self.name,
                        src = %dgram.source(),
                        dst = %dgram.destination(),
                        "datagram received"
                    );
                    self.datagrams_received.push_back(dgram);
                }
                Err(e) => trace!(interface = %self.name, error = %e, "dropping malformed datagram"),
            },
            EtherType::Arp => match ArpMessage::parse(&frame.payload) {
                Ok(msg) => self.handle_arp(&msg),
                Err(e) => trace!(interface = %self.name, error = %e, "dropping malformed ARP message"),
            },
            EtherType::Unknown(ty) => {
                trace!(interface = %self.name, ethertype = ty, "ignoring frame");
            }
        }
    }

    /// Advance the clock and forget expired mappings.
    ///
    /// Requests still in flight are kept; they only gate retransmission.
    pub fn tick(&mut self, ms_since_last_tick: u64) {
        self.now_ms = self.now_ms.saturating_add(ms_since_last_tick);

        let now = self.now_ms;
        let before = self.arp_cache.len();
        self.arp_cache.retain(|_, entry| {
            !matches!(entry, ArpEntry::Resolved { expires_at, .. } if *expires_at <= now)
        });
        let expired = before - self.arp_cache.len();
        if expired > 0 {
            debug!(interface = %self.name, expired, "ARP entries expired");
        }
    }

    /// Queue of datagrams received and not yet taken by the owner.
    pub fn datagrams_received(&mut self) -> &mut VecDeque<Ipv4Datagram> {
        &mut self.datagrams_received
    }

    pub fn pop_datagram(&mut self) -> Option<Ipv4Datagram> {
        self.datagrams_received.pop_front()
    }

    /// Cached Ethernet address for `ip`, if resolved and not expired.
    pub fn resolved_address(&self, ip: Ipv4Addr) -> Option<EthernetAddress> {
        match self.arp_cache.get(&ip) {
            Some(ArpEntry::Resolved { mac, expires_at }) if *expires_at > self.now_ms => Some(*mac),
            _ => None,
        }
    }

    /// Number of datagrams waiting for address resolution.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Datagrams evicted because the pending queue hit `max_pending`.
    pub fn dropped_pending(&self) -> u64 {
        self.dropped_pending
    }

    fn handle_arp(&mut self, msg: &ArpMessage) {
        let sender_ip = msg.sender_ip_address;
        let sender_mac = msg.sender_ethernet_address;
        // Address probes (RFC 5227) carry 0.0.0.0: answer them, learn nothing
        let learn = !sender_ip.is_unspecified();

        if learn {
            self.arp_cache.insert(
                sender_ip,
                ArpEntry::Resolved {
                    mac: sender_mac,
                    expires_at: self.now_ms.saturating_add(self.config.arp_entry_ttl_ms),
                },
            );
            trace!(interface = %self.name, ip = %sender_ip, mac = %sender_mac, "ARP mapping learned");
        }

        if msg.operation == ArpOperation::Request && msg.target_ip_address == self.ip_address {
            let reply = ArpMessage::reply_to(msg, self.ethernet_address, self.ip_address);
            debug!(interface = %self.name, to = %sender_ip, "sending ARP reply");
            self.transmit(sender_mac, EtherType::Arp, reply.serialize());
        }

        if !learn {
            return;
        }

        // One pass over what is queued now; entries for other hops go back
        // in their original order.
        for _ in 0..self.pending.len() {
            let Some((dgram, next_hop)) = self.pending.pop_front() else {
                break;
            };
            if next_hop == sender_ip {
                self.transmit_datagram(&dgram, sender_mac);
            } else {
                self.pending.push_back((dgram, next_hop));
            }
        }
    }

    fn request_address(&mut self, target_ip: Ipv4Addr) {
        debug!(interface = %self.name, target = %target_ip, "sending ARP request");
        let request = ArpMessage::request(self.ethernet_address, self.ip_address, target_ip);
        self.transmit(EthernetAddress::BROADCAST, EtherType::Arp, request.serialize());
        self.arp_cache.insert(
            target_ip,
            ArpEntry::Pending {
                requested_at: self.now_ms,
            },
        );
    }

    fn enqueue_pending(&mut self, dgram: Ipv4Datagram, next_hop: Ipv4Addr) {
        if let Some(max) = self.config.max_pending {
            if max == 0 {
                self.dropped_pending += 1;
                return;
            }
            while self.pending.len() >= max {
                self.pending.pop_front();
                self.dropped_pending += 1;
                warn!(
                    interface = %self.name,
                    dropped = self.dropped_pending,
                    "pending queue full, evicting oldest datagram"
                );
            }
        }
        self.pending.push_back((dgram, next_hop));
    }

    fn transmit_datagram(&mut self, dgram: &Ipv4Datagram, dst: EthernetAddress) {
        self.transmit(dst, EtherType::Ipv4, dgram.serialize());
    }

    fn transmit(&mut self, dst: EthernetAddress, ethertype: EtherType, payload: Vec<u8>) {
        let frame = EthernetFrame::new(dst, self.ethernet_address, ethertype, payload);
        trace!(interface = %self.name, %dst, ?ethertype, "transmitting frame");
        self.sink.transmit(frame);
    }
}

impl fmt::Debug for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkInterface")
            .field("name", &self.name)
            .field("ethernet_address", &self.ethernet_address)
            .field("ip_address", &self.ip_address)
            .field("now_ms", &self.now_ms)
            .field("arp_cache", &self.arp_cache)
            .field("pending", &self.pending.len())
            .field("datagrams_received", &self.datagrams_received.len())
            .finish_non_exhaustive()
    }
}
