//! Transport layer building blocks
//!
//! This module contains the pieces a TCP implementation is built from:
//! - ByteStream: flow-controlled in-memory byte stream with reader/writer views
//! - Wrap32: 32-bit wrapping sequence numbers

pub mod byte_stream;
pub mod wrapping;

// Re-export commonly used items
pub use byte_stream::{ByteStream, Reader, Writer};
pub use wrapping::Wrap32;
