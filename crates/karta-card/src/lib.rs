//! V2 character cards embedded in PNG images.
//!
//! Persona tools exchange characters as ordinary PNG avatars carrying a
//! hidden `tEXt` chunk. This crate maps Karta's internal [`CharacterRecord`]
//! to the flat [`CardDocumentV2`] schema and embeds it in, or extracts it
//! from, a PNG byte buffer. Nothing here touches the filesystem.
//!
//! # Card Layout
//!
//! - Chunk type: `tEXt`
//! - Chunk data: `chara || 0x00 || base64(utf8(json))`
//! - Position: immediately before the `IEND` trailer
//!
//! When several card chunks are present the last one in stream order wins.
//!
//! # Example
//!
//! ```no_run
//! use karta_card::{decode_from_png, encode_to_png, CharacterRecord};
//!
//! let record: CharacterRecord = serde_json::from_str(&std::fs::read_to_string("nova.json")?)?;
//! let avatar = std::fs::read("nova.png")?;
//!
//! let card = encode_to_png(&record, Some(avatar.as_slice()))?;
//! std::fs::write("nova.card.png", &card)?;
//!
//! let back = decode_from_png(&card)?;
//! println!("{} (dialogs rebuilt: {})", back.profile.name, back.reconstructed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod blank;
mod codec;
mod error;
pub mod mapper;
mod record;
mod v2;

pub use blank::BLANK_PNG;
pub use codec::{decode_document_from_png, decode_from_png, encode_to_png, CardCodec, CodecOptions};
pub use error::{Error, PayloadError, Result};
pub use mapper::{from_v2, to_v2};
pub use record::{
    CharacterData, CharacterRecord, ExampleDialog, InitialMessage, Personality, PersonalityFields,
    Profile, Scenario, ScenarioFields,
};
pub use v2::{CardDocumentV2, CARD_KEYWORD, CHARACTER_VERSION, CREATOR, CREATOR_NOTES};

// Re-export for callers configuring a codec
pub use karta_png::SignatureCheck;
