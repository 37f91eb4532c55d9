//! Card embedding and extraction.

use karta_png::{
    build_chunk, expect_signature, insert_before_trailer, scan_chunks, text, ChunkType,
    SignatureCheck,
};

use crate::blank::BLANK_PNG;
use crate::mapper::{from_v2, to_v2};
use crate::record::CharacterRecord;
use crate::v2::{CardDocumentV2, CARD_KEYWORD};
use crate::{Error, PayloadError, Result};

/// Options controlling a [`CardCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Keyword of the `tEXt` chunk holding the card.
    pub keyword: String,
    /// How the optional source image is checked when encoding.
    pub source_check: SignatureCheck,
    /// Ignore card chunks whose CRC does not match when decoding.
    ///
    /// Off by default: a CRC mismatch only flags the chunk, and the last
    /// card chunk in stream order is used regardless.
    pub skip_corrupt_chunks: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            keyword: CARD_KEYWORD.to_string(),
            source_check: SignatureCheck::Prefix,
            skip_corrupt_chunks: false,
        }
    }
}

impl CodecOptions {
    /// Set the chunk keyword.
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Set the source image signature check.
    pub fn source_check(mut self, check: SignatureCheck) -> Self {
        self.source_check = check;
        self
    }

    /// Set whether corrupt card chunks are skipped.
    pub fn skip_corrupt_chunks(mut self, skip: bool) -> Self {
        self.skip_corrupt_chunks = skip;
        self
    }
}

/// Embeds character cards into PNG images and extracts them again.
///
/// A codec holds only its options; every call works on its own buffers, so a
/// single codec can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct CardCodec {
    options: CodecOptions,
}

impl CardCodec {
    /// Create a codec with the given options.
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Get the codec options.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode `record` into a copy of `source`, or of a blank 1×1 PNG.
    pub fn encode_to_png(&self, record: &CharacterRecord, source: Option<&[u8]>) -> Result<Vec<u8>> {
        self.encode_document(&to_v2(record), source)
    }

    /// Encode an already-mapped card document.
    pub fn encode_document(&self, doc: &CardDocumentV2, source: Option<&[u8]>) -> Result<Vec<u8>> {
        let base = match source {
            Some(bytes) if !self.options.source_check.matches(bytes) => {
                return Err(Error::UnsupportedSourceImage {
                    actual: Error::leading(bytes),
                });
            }
            Some(bytes) => bytes,
            None => BLANK_PNG,
        };

        let json = doc.to_json()?;
        let payload = text::encode(&self.options.keyword, &json)?;
        let chunk = build_chunk(ChunkType::TEXT.as_bytes(), &payload)?;
        let output = insert_before_trailer(base, &chunk)?;

        tracing::debug!(
            name = %doc.name,
            base_len = base.len(),
            chunk_len = chunk.len(),
            output_len = output.len(),
            blank = source.is_none(),
            "encoded character card"
        );

        Ok(output)
    }

    /// Decode the card document embedded in `png`.
    pub fn decode_document_from_png(&self, png: &[u8]) -> Result<CardDocumentV2> {
        expect_signature(png).map_err(|_| Error::InvalidPng {
            actual: Error::leading(png),
        })?;

        let payload = self.find_card_payload(png)?;
        let json = text::decode_text(payload)
            .map_err(|e| Error::MalformedCardJson(PayloadError::Text(e)))?;
        let doc = CardDocumentV2::from_json(&json)?;

        tracing::debug!(name = %doc.name, json_len = json.len(), "decoded character card");
        Ok(doc)
    }

    /// Decode the card embedded in `png` into a partial record.
    pub fn decode_from_png(&self, png: &[u8]) -> Result<CharacterRecord> {
        self.decode_document_from_png(png).map(|doc| from_v2(&doc))
    }

    /// Encoded payload of the last valid card chunk in stream order.
    fn find_card_payload<'a>(&self, png: &'a [u8]) -> Result<&'a [u8]> {
        let keyword = self.options.keyword.as_bytes();
        let mut found = None;
        let mut candidates = 0usize;

        for chunk in scan_chunks(png) {
            let chunk = chunk?;
            if chunk.chunk_type != ChunkType::TEXT {
                continue;
            }

            let Ok((chunk_keyword, payload)) = text::split_keyword(chunk.data) else {
                tracing::warn!(offset = chunk.offset, "skipping tEXt chunk without keyword separator");
                continue;
            };
            if chunk_keyword != keyword {
                continue;
            }
            if !chunk.integrity_ok {
                if self.options.skip_corrupt_chunks {
                    tracing::warn!(offset = chunk.offset, "skipping card chunk with CRC mismatch");
                    continue;
                }
                tracing::warn!(offset = chunk.offset, "card chunk has CRC mismatch");
            }

            candidates += 1;
            found = Some(payload);
        }

        if candidates > 1 {
            tracing::debug!(candidates, "multiple card chunks found; using the last one");
        }

        found.ok_or(Error::NoCardData)
    }
}

/// Encode `record` with the default options.
pub fn encode_to_png(record: &CharacterRecord, source: Option<&[u8]>) -> Result<Vec<u8>> {
    CardCodec::default().encode_to_png(record, source)
}

/// Decode a record with the default options.
pub fn decode_from_png(png: &[u8]) -> Result<CharacterRecord> {
    CardCodec::default().decode_from_png(png)
}

/// Decode a raw card document with the default options.
pub fn decode_document_from_png(png: &[u8]) -> Result<CardDocumentV2> {
    CardCodec::default().decode_document_from_png(png)
}
