//! CRC-32 hashing utilities.
//!
//! PNG protects every chunk with the IEEE 802.3 CRC-32 (polynomial
//! `0xEDB88320`, reflected), computed over the chunk type followed by the
//! chunk data. The length field is not covered.

use crc32fast::Hasher;

/// Compute the CRC-32 of a byte slice.
///
/// Uses hardware acceleration when available (PCLMULQDQ on x86, CRC on aarch64).
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Compute the CRC-32 of several slices as if they were one contiguous buffer.
pub fn hash_parts(parts: &[&[u8]]) -> u32 {
    let mut hasher = Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Compute the CRC of a PNG chunk from its type and data.
#[inline]
pub fn chunk_crc(chunk_type: &[u8], data: &[u8]) -> u32 {
    hash_parts(&[chunk_type, data])
}
