//! PNG chunk codec for Karta.
//!
//! A PNG file is an 8-byte signature followed by a stream of chunks. This
//! crate builds, scans and splices those chunks without touching pixel data,
//! and implements the Base64 `tEXt` payload convention used to smuggle
//! structured documents inside an image.
//!
//! # Chunk Format
//!
//! Every chunk has the same framing:
//! - 4 bytes: Data length (big-endian, excludes type and CRC)
//! - 4 bytes: Chunk type (ASCII, e.g. `IHDR`, `tEXt`, `IEND`)
//! - N bytes: Data
//! - 4 bytes: CRC-32 over type and data (big-endian)
//!
//! The stream ends with an `IEND` chunk, which has no data and is therefore
//! always exactly 12 bytes long.
//!
//! # Text Payloads
//!
//! Embedded documents are stored in `tEXt` chunks as
//! `keyword || 0x00 || base64(utf8(text))`.
//!
//! # Example
//!
//! ```no_run
//! use karta_png::{build_chunk, insert_before_trailer, scan_chunks, text, ChunkType};
//!
//! let png = std::fs::read("avatar.png")?;
//!
//! let payload = text::encode("comment", "hello")?;
//! let chunk = build_chunk(ChunkType::TEXT.as_bytes(), &payload)?;
//! let tagged = insert_before_trailer(&png, &chunk)?;
//!
//! for chunk in scan_chunks(&tagged) {
//!     let chunk = chunk?;
//!     println!("{} {} bytes (crc ok: {})", chunk.chunk_type, chunk.length, chunk.integrity_ok);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chunk;
mod error;
mod scan;
mod signature;

pub mod text;

pub use chunk::{build_chunk, insert_before_trailer, ChunkHeader, ChunkType, PngChunk, TRAILER_LEN};
pub use error::{Error, Result};
pub use scan::{list_chunks, scan_chunks, ChunkIter};
pub use signature::{
    expect_signature, has_signature_prefix, validate_signature, SignatureCheck, PNG_SIGNATURE,
};
pub use text::TextPayload;
