//! PNG chunk construction and splicing.

use std::fmt;

use karta_common::big_endian::U32;
use karta_common::crc;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Size of the terminating `IEND` chunk: length, type and CRC with no data.
pub const TRAILER_LEN: usize = 12;

/// Length and type fields that open every chunk.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ChunkHeader {
    /// Length of the chunk data in bytes.
    pub length: U32,
    /// Four-byte chunk type.
    pub chunk_type: [u8; 4],
}

impl ChunkHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 8;
}

/// A four-byte PNG chunk type.
///
/// Types read from a file are kept verbatim even if they are not ASCII, so a
/// scan never fails on an odd type. Types used to *build* a chunk go through
/// [`ChunkType::new`], which rejects anything but 4 ASCII bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType([u8; 4]);

impl ChunkType {
    /// Image header.
    pub const IHDR: Self = Self(*b"IHDR");
    /// Image data.
    pub const IDAT: Self = Self(*b"IDAT");
    /// Image trailer.
    pub const IEND: Self = Self(*b"IEND");
    /// Uncompressed Latin-1 text.
    pub const TEXT: Self = Self(*b"tEXt");

    /// Validate and wrap a chunk type.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 4] = bytes
            .try_into()
            .map_err(|_| Error::InvalidChunkType(bytes.to_vec()))?;
        if !raw.is_ascii() {
            return Err(Error::InvalidChunkType(bytes.to_vec()));
        }
        Ok(Self(raw))
    }

    /// Wrap a type read from a file without validation.
    pub(crate) const fn from_raw(raw: [u8; 4]) -> Self {
        Self(raw)
    }

    /// The raw type bytes.
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Critical chunks have an uppercase first letter.
    pub fn is_critical(&self) -> bool {
        self.0[0].is_ascii_uppercase()
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

impl TryFrom<&[u8]> for ChunkType {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes)
    }
}

impl TryFrom<&str> for ChunkType {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s.as_bytes())
    }
}

/// A chunk read from a PNG stream, borrowing its data from the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngChunk<'a> {
    /// Byte offset of the chunk's length field within the file.
    pub offset: usize,
    /// Declared data length.
    pub length: u32,
    /// Chunk type.
    pub chunk_type: ChunkType,
    /// Chunk data.
    pub data: &'a [u8],
    /// CRC stored in the file.
    pub crc: u32,
    /// Whether the stored CRC matches the one recomputed over type and data.
    pub integrity_ok: bool,
}

impl PngChunk<'_> {
    /// Total encoded size: header, data and CRC.
    pub fn total_len(&self) -> usize {
        ChunkHeader::SIZE + self.data.len() + 4
    }

    /// Whether this is the `IEND` terminator.
    pub fn is_terminator(&self) -> bool {
        self.chunk_type == ChunkType::IEND
    }
}

/// Serialize a chunk as `length || type || data || crc`.
///
/// The CRC is always computed fresh from `chunk_type` and `data`.
pub fn build_chunk(chunk_type: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let chunk_type = ChunkType::new(chunk_type)?;
    let length = u32::try_from(data.len()).map_err(|_| Error::ChunkTooLarge(data.len()))?;

    let header = ChunkHeader {
        length: U32::new(length),
        chunk_type: chunk_type.0,
    };
    let crc = crc::chunk_crc(&chunk_type.0, data);

    let mut out = Vec::with_capacity(ChunkHeader::SIZE + data.len() + 4);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.to_be_bytes());
    Ok(out)
}

/// Insert `chunk` immediately before the last [`TRAILER_LEN`] bytes of `png`.
///
/// The trailing 12 bytes are assumed to be the `IEND` chunk; callers validate
/// the buffer beforehand.
pub fn insert_before_trailer(png: &[u8], chunk: &[u8]) -> Result<Vec<u8>> {
    if png.len() < TRAILER_LEN {
        return Err(Error::TruncatedPng {
            offset: 0,
            needed: TRAILER_LEN,
            available: png.len(),
        });
    }

    let split = png.len() - TRAILER_LEN;
    let trailer = &png[split..];
    if trailer[4..8] != ChunkType::IEND.0 {
        tracing::warn!(
            trailer_type = %trailer[4..8].escape_ascii(),
            "last 12 bytes are not an IEND chunk; inserting anyway"
        );
    }

    let mut out = Vec::with_capacity(png.len() + chunk.len());
    out.extend_from_slice(&png[..split]);
    out.extend_from_slice(chunk);
    out.extend_from_slice(trailer);
    Ok(out)
}
