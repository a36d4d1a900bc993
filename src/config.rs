//! Interface policy configuration
//!
//! The ARP windows are fixed policy: every interface uses the defaults unless
//! its owner builds it with an explicit [`InterfaceConfig`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum time between two ARP requests for the same address.
pub const ARP_REQUEST_INTERVAL_MS: u64 = 5_000;

/// Lifetime of a learned IP to Ethernet mapping.
pub const ARP_ENTRY_TTL_MS: u64 = 30_000;

/// Per-interface ARP and queueing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    /// Retry gate for ARP requests to an unresolved address (ms)
    pub arp_retry_ms: u64,
    /// How long a resolved mapping stays valid (ms)
    pub arp_entry_ttl_ms: u64,
    /// Cap on datagrams awaiting resolution. `None` means unbounded; when set,
    /// the oldest queued datagram is evicted to make room.
    pub max_pending: Option<usize>,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        InterfaceConfig {
            arp_retry_ms: ARP_REQUEST_INTERVAL_MS,
            arp_entry_ttl_ms: ARP_ENTRY_TTL_MS,
            max_pending: None,
        }
    }
}

impl InterfaceConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: InterfaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject windows that would make the ARP state machine degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arp_retry_ms == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "arp_retry_ms",
            });
        }
        if self.arp_entry_ttl_ms == 0 {
            return Err(ConfigError::ZeroWindow {
                field: "arp_entry_ttl_ms",
            });
        }
        Ok(())
    }
}
