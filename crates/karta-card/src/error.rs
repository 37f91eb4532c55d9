//! Error types for character card encoding and decoding.

use thiserror::Error;

/// Errors that can occur when embedding or extracting a character card.
#[derive(Debug, Error)]
pub enum Error {
    /// Chunk-level error (truncation, bad keyword, bad payload encoding).
    #[error("{0}")]
    Png(#[from] karta_png::Error),

    /// Input to decode does not start with the PNG signature.
    #[error("not a PNG file: leading bytes {actual:02x?}")]
    InvalidPng { actual: Vec<u8> },

    /// Source image for encode does not start with the PNG signature.
    #[error("unsupported source image: leading bytes {actual:02x?} are not a PNG signature")]
    UnsupportedSourceImage { actual: Vec<u8> },

    /// No `tEXt` chunk with the card keyword was found.
    #[error("no character card data found in PNG")]
    NoCardData,

    /// The embedded payload is not a valid card document, either because
    /// its text layer does not decode or because the JSON is invalid.
    #[error("malformed card JSON: {0}")]
    MalformedCardJson(#[source] PayloadError),

    /// The card document could not be serialized.
    #[error("failed to serialize card: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl Error {
    /// Whether the input PNG ended in the middle of a chunk.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Png(karta_png::Error::TruncatedPng { .. }))
    }

    /// Leading bytes of `bytes` for error reporting.
    pub(crate) fn leading(bytes: &[u8]) -> Vec<u8> {
        bytes[..bytes.len().min(8)].to_vec()
    }
}

/// Why an embedded card payload could not be read.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Payload text is not valid Base64 or not valid UTF-8.
    #[error("{0}")]
    Text(#[source] karta_png::Error),

    /// Payload text is not a valid card document.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for card operations.
pub type Result<T> = std::result::Result<T, Error>;
