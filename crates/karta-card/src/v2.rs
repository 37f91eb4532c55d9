//! V2 character card document.
//!
//! The external interchange shape: a flat JSON object whose field names are
//! part of the wire format. Field declaration order is the serialization
//! order, which keeps encoded output deterministic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::null_as_default;
use crate::{Error, Result};

/// Keyword of the `tEXt` chunk that carries the card.
pub const CARD_KEYWORD: &str = "chara";

/// Value of `creator` on every exported card.
pub const CREATOR: &str = "Karta";

/// Value of `creator_notes` on every exported card.
pub const CREATOR_NOTES: &str = "Exported from the Karta character manager";

/// Value of `character_version` on every exported card.
pub const CHARACTER_VERSION: &str = "1.0.0";

/// `spec` marker of the wrapped V2 layout written by other tools.
const WRAPPED_SPEC: &str = "chara_card_v2";

/// Flat V2 character card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDocumentV2 {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scenario: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_mes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mes_example: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator_notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_history_instructions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternate_greetings: Vec<String>,
    /// Lorebook; never written, kept verbatim when read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_book: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extensions: Map<String, Value>,
}

impl CardDocumentV2 {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Serialize)
    }

    /// Parse a card from JSON text.
    ///
    /// Accepts both the flat layout and the wrapped
    /// `{"spec": "chara_card_v2", "data": {...}}` layout.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::MalformedCardJson(e.into()))?;
        serde_json::from_value(unwrap_data(value)).map_err(|e| Error::MalformedCardJson(e.into()))
    }
}

/// Replace a wrapped V2 document by its `data` object.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut object)
            if object.get("spec").and_then(Value::as_str) == Some(WRAPPED_SPEC)
                && object.get("data").is_some_and(Value::is_object) =>
        {
            object.remove("data").unwrap_or_default()
        }
        other => other,
    }
}
