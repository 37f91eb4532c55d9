//! Common utilities for Karta.
//!
//! This crate provides the foundational pieces used across all Karta crates:
//!
//! - [`BinaryReader`] - Zero-copy big-endian reading from byte slices
//! - [`crc`] - CRC-32 (IEEE) hashing as used by PNG chunks

mod error;
mod reader;

pub mod crc;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Re-export zerocopy's big-endian integer types for on-disk headers
pub use zerocopy::byteorder::big_endian;

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
