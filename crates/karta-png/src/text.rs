//! Base64 text payloads for `tEXt` chunks.
//!
//! The payload layout is `keyword || 0x00 || base64(utf8(text))`. The
//! keyword is plain ASCII; the Base64 step keeps arbitrary UTF-8 text inside
//! a chunk type that PNG defines as Latin-1.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use karta_common::memchr::memchr;

use crate::{Error, Result};

/// Separator between keyword and payload.
const SEPARATOR: u8 = 0;

/// Standard alphabet that accepts payloads with or without `=` padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded text payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    /// Keyword before the separator.
    pub keyword: String,
    /// Decoded text after the separator.
    pub text: String,
}

/// Encode `text` under `keyword`.
pub fn encode(keyword: &str, text: &str) -> Result<Vec<u8>> {
    validate_keyword(keyword)?;

    let encoded = STANDARD.encode(text.as_bytes());
    let mut out = Vec::with_capacity(keyword.len() + 1 + encoded.len());
    out.extend_from_slice(keyword.as_bytes());
    out.push(SEPARATOR);
    out.extend_from_slice(encoded.as_bytes());
    Ok(out)
}

/// Decode a payload into its keyword and text.
pub fn decode(bytes: &[u8]) -> Result<TextPayload> {
    let (keyword, payload) = split_keyword(bytes)?;
    Ok(TextPayload {
        keyword: String::from_utf8_lossy(keyword).into_owned(),
        text: decode_text(payload)?,
    })
}

/// Split a payload at the first null byte without decoding the text.
///
/// Used to filter chunks by keyword cheaply before paying for Base64.
pub fn split_keyword(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let pos = memchr(SEPARATOR, bytes).ok_or(Error::MalformedTextChunk)?;
    Ok((&bytes[..pos], &bytes[pos + 1..]))
}

/// Base64-decode and UTF-8-decode the part after the separator.
pub fn decode_text(payload: &[u8]) -> Result<String> {
    // Some writers terminate the payload with a newline
    let end = payload
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    let raw = LENIENT.decode(&payload[..end])?;
    Ok(String::from_utf8(raw)?)
}

fn validate_keyword(keyword: &str) -> Result<()> {
    let reason = if keyword.is_empty() {
        "keyword is empty"
    } else if keyword.as_bytes().contains(&SEPARATOR) {
        "keyword contains a null byte"
    } else if !keyword.is_ascii() {
        "keyword is not ASCII"
    } else {
        return Ok(());
    };

    Err(Error::InvalidKeyword {
        keyword: keyword.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let bytes = encode("chara", "hi").unwrap();
        assert_eq!(bytes, b"chara\0aGk=");
    }

    #[test]
    fn test_decode_utf8() {
        let bytes = encode("chara", "Zoë says \u{1F31F}").unwrap();
        let payload = decode(&bytes).unwrap();

        assert_eq!(payload.keyword, "chara");
        assert_eq!(payload.text, "Zoë says \u{1F31F}");
    }

    #[test]
    fn test_empty_text() {
        let bytes = encode("chara", "").unwrap();
        assert_eq!(bytes, b"chara\0");
        assert_eq!(decode(&bytes).unwrap().text, "");
    }

    #[test]
    fn test_invalid_keywords() {
        for keyword in ["", "cha\0ra", "charä"] {
            assert!(
                matches!(encode(keyword, "x"), Err(Error::InvalidKeyword { .. })),
                "{keyword:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            decode(b"charaaGk="),
            Err(Error::MalformedTextChunk)
        ));
        assert!(matches!(split_keyword(b""), Err(Error::MalformedTextChunk)));
    }

    #[test]
    fn test_splits_at_first_null() {
        let (keyword, rest) = split_keyword(b"a\0b\0c").unwrap();
        assert_eq!(keyword, b"a");
        assert_eq!(rest, b"b\0c");
    }

    #[test]
    fn test_lenient_padding_and_whitespace() {
        assert_eq!(decode_text(b"aGk").unwrap(), "hi");
        assert_eq!(decode_text(b"aGk=\n").unwrap(), "hi");
    }

    #[test]
    fn test_bad_payloads() {
        assert!(matches!(decode_text(b"!!!"), Err(Error::InvalidBase64(_))));
        // 0xFF 0xFE is not UTF-8
        assert!(matches!(decode_text(b"//4="), Err(Error::Utf8(_))));
    }
}
