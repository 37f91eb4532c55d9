//! Karta - character card codec for PNG images.
//!
//! This crate provides a unified interface to the Karta library ecosystem
//! for embedding character metadata in PNG files and reading it back.
//!
//! # Crates
//!
//! - [`karta_common`] - Common utilities (binary reading, CRC-32)
//! - [`karta_png`] - PNG chunk framing and Base64 `tEXt` payloads
//! - [`karta_card`] - Character records, V2 card schema and the card codec
//!
//! # Example
//!
//! ```no_run
//! use karta::prelude::*;
//!
//! let record = CharacterRecord {
//!     profile: Profile {
//!         name: "Nova".into(),
//!         description: "A star.".into(),
//!         tags: vec![],
//!     },
//!     personality: Some(Personality::Text("Curious.".into())),
//!     ..CharacterRecord::default()
//! };
//!
//! // No source image: the card is written into a blank 1x1 PNG
//! let png = encode_to_png(&record, None)?;
//! std::fs::write("nova.png", &png)?;
//!
//! let back = decode_from_png(&png)?;
//! assert_eq!(back.profile.name, "Nova");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use karta_card as card;
pub use karta_common as common;
pub use karta_png as png;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use karta_card::{
        decode_document_from_png, decode_from_png, encode_to_png, CardCodec, CardDocumentV2,
        CharacterRecord, CodecOptions, ExampleDialog, InitialMessage, Personality, Profile,
        Scenario, SignatureCheck,
    };
    pub use karta_common::{crc, BinaryReader};
    pub use karta_png::{scan_chunks, ChunkType, PngChunk};
}

// Re-export commonly used types at the crate root
pub use karta_card::{CardCodec, Error};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
