//! Error types for PNG chunk handling.

use thiserror::Error;

/// Errors that can occur when building, scanning or splicing PNG chunks.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] karta_common::Error),

    /// A chunk or the trailer runs past the end of the buffer.
    #[error("truncated PNG at offset {offset}: needed {needed} bytes but only {available} available")]
    TruncatedPng {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Chunk type is not exactly 4 ASCII bytes.
    #[error("invalid chunk type {0:?}: expected exactly 4 ASCII bytes")]
    InvalidChunkType(Vec<u8>),

    /// Chunk data does not fit in the 32-bit length field.
    #[error("chunk data too large: {0} bytes")]
    ChunkTooLarge(usize),

    /// Text keyword cannot be embedded.
    #[error("invalid text keyword {keyword:?}: {reason}")]
    InvalidKeyword {
        keyword: String,
        reason: &'static str,
    },

    /// Text chunk data has no null separator between keyword and payload.
    #[error("malformed text chunk: no null separator after keyword")]
    MalformedTextChunk,

    /// Payload is not valid Base64.
    #[error("invalid Base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Decoded payload is not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Build a [`Error::TruncatedPng`] from a reader error at `offset`.
    pub(crate) fn truncated_at(offset: usize, source: karta_common::Error) -> Self {
        match source {
            karta_common::Error::UnexpectedEof { needed, available } => Self::TruncatedPng {
                offset,
                needed,
                available,
            },
            other => Self::Common(other),
        }
    }
}

/// Result type for PNG chunk operations.
pub type Result<T> = std::result::Result<T, Error>;
