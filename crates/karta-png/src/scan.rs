//! Lazy chunk-stream scanning.

use std::iter::FusedIterator;

use karta_common::{crc, BinaryReader};

use crate::chunk::{ChunkHeader, ChunkType, PngChunk};
use crate::signature::PNG_SIGNATURE;
use crate::{Error, Result};

/// Iterator over the chunks of a PNG buffer.
///
/// Created by [`scan_chunks`]. Yields chunks in stream order and stops after
/// the `IEND` chunk, when the buffer is exhausted, or after the first error.
/// A chunk with a bad CRC is still yielded, with `integrity_ok` set to false.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    reader: BinaryReader<'a>,
    done: bool,
}

impl<'a> ChunkIter<'a> {
    fn read_chunk(&mut self) -> Result<PngChunk<'a>> {
        let offset = self.reader.position();

        let header: ChunkHeader = self
            .reader
            .read_struct()
            .map_err(|e| Error::truncated_at(offset, e))?;
        let length = header.length.get();

        let data = self
            .reader
            .read_bytes(length as usize)
            .map_err(|e| Error::truncated_at(offset, e))?;
        let stored_crc = self
            .reader
            .read_u32_be()
            .map_err(|e| Error::truncated_at(offset, e))?;

        let chunk_type = ChunkType::from_raw(header.chunk_type);
        let integrity_ok = crc::chunk_crc(&header.chunk_type, data) == stored_crc;

        tracing::trace!(offset, %chunk_type, length, integrity_ok, "scanned chunk");

        Ok(PngChunk {
            offset,
            length,
            chunk_type,
            data,
            crc: stored_crc,
            integrity_ok,
        })
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<PngChunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.reader.is_empty() {
            self.done = true;
            return None;
        }

        let item = self.read_chunk();
        match &item {
            Ok(chunk) if chunk.is_terminator() => self.done = true,
            Ok(_) => {}
            Err(_) => self.done = true,
        }
        Some(item)
    }
}

impl FusedIterator for ChunkIter<'_> {}

/// Scan the chunks of `png`, starting right after the 8-byte signature.
///
/// The signature itself is not checked; see [`validate_signature`].
///
/// [`validate_signature`]: crate::validate_signature
pub fn scan_chunks(png: &[u8]) -> ChunkIter<'_> {
    ChunkIter {
        reader: BinaryReader::new_at(png, PNG_SIGNATURE.len()),
        done: false,
    }
}

/// Collect every chunk of `png`, failing on the first truncated chunk.
pub fn list_chunks(png: &[u8]) -> Result<Vec<PngChunk<'_>>> {
    scan_chunks(png).collect()
}
