//! Self-describing binary framing: a small, typed vocabulary built on a
//! length-prefixed [`Message`] buffer. Every frame on the socket starts with
//! a 16-bit little-endian payload length, followed by a sequence of values
//! written in the order the protocol defines them; there is no separate
//! schema or type tag, so both peers must already agree on field order.
//!
//! Primitives ride on four codecs:
//! - fixed-width little-endian integers (`u8`/`u16`/`u32`/`u64`)
//! - length-prefixed sequences, with a 1- or 2-byte count depending on size
//! - NUL-terminated strings, with no length prefix
//! - signed [`bigint::BigInt`] values, as a sign byte plus a length-prefixed
//!   magnitude

pub mod encrypted;
pub mod error;
pub mod hash;
pub mod message;

pub use encrypted::EncryptedData;
pub use error::WireError;
pub use hash::{sha256, to_hex, DIGEST_SIZE};
pub use message::{Message, ParseOutcome, WireDecode, WireEncode, HEADER_SIZE};
