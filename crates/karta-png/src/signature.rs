//! PNG signature checks.

use karta_common::BinaryReader;

use crate::Result;

/// The 8-byte magic number at the start of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Number of signature bytes checked by [`SignatureCheck::Prefix`].
const PREFIX_LEN: usize = 4;

/// Require the full 8-byte PNG signature at the start of `bytes`.
///
/// Fails with [`Error::Common`](crate::Error::Common) carrying `InvalidMagic`,
/// or `UnexpectedEof` when the buffer is shorter than the signature.
pub fn expect_signature(bytes: &[u8]) -> Result<()> {
    BinaryReader::new(bytes).expect_magic(&PNG_SIGNATURE)?;
    Ok(())
}

/// Check that `bytes` starts with the full 8-byte PNG signature.
pub fn validate_signature(bytes: &[u8]) -> bool {
    expect_signature(bytes).is_ok()
}

/// Check only the first 4 signature bytes (`\x89PNG`).
///
/// Older card tools accepted any buffer with this prefix, including files
/// whose line-ending bytes were mangled in transit.
pub fn has_signature_prefix(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE[..PREFIX_LEN])
}

/// How strictly a buffer's signature is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureCheck {
    /// Only `\x89PNG`.
    #[default]
    Prefix,
    /// All 8 bytes.
    Full,
}

impl SignatureCheck {
    /// Apply this check to `bytes`.
    pub fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Prefix => has_signature_prefix(bytes),
            Self::Full => validate_signature(bytes),
        }
    }
}
