//! Error types
//!
//! Parse failures are never fatal inside the stack: interfaces drop whatever
//! fails to decode. They are still typed so callers and tests can tell why.

use thiserror::Error;

/// Failure to decode a frame, datagram or ARP message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("truncated input: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("unsupported IP version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid IPv4 header length field {0}")]
    BadHeaderLength(u8),

    #[error("IPv4 total length {total_len} inconsistent with {available} available bytes")]
    BadTotalLength { total_len: u16, available: usize },

    #[error("IPv4 header checksum mismatch: header says {expected:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { expected: u16, computed: u16 },

    #[error("unsupported ARP hardware/protocol pair ({hardware:#06x}, {protocol:#06x})")]
    UnsupportedArp { hardware: u16, protocol: u16 },

    #[error("unknown ARP operation {0}")]
    UnknownArpOperation(u16),
}

/// A payload that does not fit the 16-bit IPv4 total length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("IPv4 payload of {len} bytes exceeds the {max} byte maximum")]
pub struct PayloadTooLarge {
    pub len: usize,
    pub max: usize,
}

/// Misuse of the router's configuration API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("prefix length {0} exceeds 32")]
    InvalidPrefixLength(u8),

    #[error("no interface with index {0}")]
    UnknownInterface(usize),
}

/// Failure to load an [`InterfaceConfig`](crate::config::InterfaceConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be greater than zero")]
    ZeroWindow { field: &'static str },
}
