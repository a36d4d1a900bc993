//! IPv4 router
//!
//! A [`Router`] owns a set of [`NetworkInterface`]s and forwards every
//! datagram they receive using longest-prefix-match on the destination:
//! - TTL is decremented and the header checksum recomputed
//! - Datagrams whose TTL would reach zero are dropped
//! - Datagrams matching no route are dropped (no implicit default route)
//!
//! The table holds one entry per `(prefix, prefix_length)`, so two matching
//! routes always differ in length and the choice is deterministic.

use std::fmt;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use prefix_trie::PrefixMap;
use tracing::{debug, trace};

use crate::error::RouterError;
use crate::iface::NetworkInterface;
use crate::network::Ipv4Datagram;

/// Forwarding action for a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Next router on the path; `None` when the network is directly attached
    /// and the datagram's own destination is the next hop.
    pub next_hop: Option<Ipv4Addr>,
    /// Index of the outgoing interface
    pub interface_index: usize,
}

/// Longest-prefix-match router over a set of owned interfaces.
pub struct Router {
    interfaces: Vec<NetworkInterface>,
    routes: PrefixMap<Ipv4Net, Route>,
}

impl Router {
    pub fn new() -> Self {
        Router {
            interfaces: Vec::new(),
            routes: PrefixMap::new(),
        }
    }

    /// Take ownership of an interface. Returns its index, stable for the
    /// router's lifetime.
    pub fn add_interface(&mut self, interface: NetworkInterface) -> usize {
        debug!(
            interface = interface.name(),
            index = self.interfaces.len(),
            "interface added to router"
        );
        self.interfaces.push(interface);
        self.interfaces.len() - 1
    }

    /// # Panics
    ///
    /// Panics if `index` was never returned by [`Router::add_interface`].
    pub fn interface(&self, index: usize) -> &NetworkInterface {
        &self.interfaces[index]
    }

    /// # Panics
    ///
    /// Panics if `index` was never returned by [`Router::add_interface`].
    pub fn interface_mut(&mut self, index: usize) -> &mut NetworkInterface {
        &mut self.interfaces[index]
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Add a forwarding rule, replacing any rule for the same prefix.
    ///
    /// Only the top `prefix_length` bits of `route_prefix` take part in
    /// matching; the rest are cleared before the route is stored.
    pub fn add_route(
        &mut self,
        route_prefix: Ipv4Addr,
        prefix_length: u8,
        next_hop: Option<Ipv4Addr>,
        interface_index: usize,
    ) -> Result<(), RouterError> {
        let prefix = Ipv4Net::new(route_prefix, prefix_length)
            .map_err(|_| RouterError::InvalidPrefixLength(prefix_length))?
            .trunc();
        if interface_index >= self.interfaces.len() {
            return Err(RouterError::UnknownInterface(interface_index));
        }

        match next_hop {
            Some(hop) => debug!(%prefix, next_hop = %hop, interface_index, "adding route"),
            None => debug!(%prefix, interface_index, "adding route (direct)"),
        }

        self.routes.insert(
            prefix,
            Route {
                next_hop,
                interface_index,
            },
        );
        Ok(())
    }

    /// Longest-prefix-match lookup for `dst`.
    pub fn lookup(&self, dst: Ipv4Addr) -> Option<&Route> {
        let host = Ipv4Net::new(dst, 32).ok()?;
        self.routes.get_lpm(&host).map(|(_, route)| route)
    }

    /// All routes as `(prefix, prefix_length, route)`.
    pub fn routes(&self) -> impl Iterator<Item = (Ipv4Addr, u8, &Route)> + '_ {
        self.routes
            .iter()
            .map(|(net, route)| (net.network(), net.prefix_len(), route))
    }

    /// Forward everything the interfaces have received.
    ///
    /// Each interface's queue is drained once; datagrams that arrive while
    /// routing wait for the next call.
    pub fn route(&mut self) {
        for index in 0..self.interfaces.len() {
            let batch: Vec<Ipv4Datagram> = self.interfaces[index]
                .datagrams_received()
                .drain(..)
                .collect();
            for dgram in batch {
                self.forward(dgram);
            }
        }
    }

    fn forward(&mut self, mut dgram: Ipv4Datagram) {
        let dst = dgram.destination();

        if dgram.header.ttl <= 1 {
            debug!(%dst, ttl = dgram.header.ttl, "TTL expired, dropping datagram");
            return;
        }
        dgram.header.ttl -= 1;
        dgram.header.update_checksum();

        let Some(route) = self.lookup(dst).copied() else {
            debug!(%dst, "no route, dropping datagram");
            return;
        };

        let next_hop = route.next_hop.unwrap_or(dst);
        trace!(%dst, %next_hop, interface_index = route.interface_index, "forwarding datagram");
        self.interfaces[route.interface_index].send_datagram(dgram, next_hop);
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("interfaces", &self.interfaces)
            .field("routes", &self.routes().collect::<Vec<_>>())
            .finish()
    }
}
