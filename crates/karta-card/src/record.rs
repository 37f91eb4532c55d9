//! Internal character record.
//!
//! This is the shape the storage layer keeps on disk. Several fields have
//! changed shape over time, so they are modelled as untagged enums that accept
//! every historical variant. The codec only ever reads a record when encoding,
//! and produces a partial one when decoding.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A character record as stored by the profile manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Name, description and tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: Profile,
    /// Personality in any of its historical shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,
    /// Scenario as plain text or an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
    /// Greetings; only the first one is exported.
    #[serde(default, deserialize_with = "null_as_default")]
    pub initial_messages: Vec<InitialMessage>,
    /// Example conversations.
    #[serde(default, deserialize_with = "null_as_default")]
    pub example_dialogs: Vec<ExampleDialog>,
    /// Set when `example_dialogs` was rebuilt from flattened card text and
    /// may not match the original entries.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reconstructed: bool,
}

/// Basic identity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// The `personality` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Personality {
    /// Oldest records: the personality text itself.
    Text(String),
    /// An object, possibly wrapping a nested `characterData`.
    Structured(PersonalityFields),
    /// Anything else; resolves to empty text.
    Other(Value),
}

/// Object form of [`Personality`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_data: Option<CharacterData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// Nested personality payload used by records created by the chatbot editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// The `scenario` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scenario {
    Text(String),
    Structured(ScenarioFields),
    Other(Value),
}

/// Object form of [`Scenario`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One entry of `initialMessages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialMessage {
    Text(String),
    Entry {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl InitialMessage {
    /// The message text, empty if the entry has none.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Entry { text } => text.as_deref().unwrap_or_default(),
        }
    }
}

/// One entry of `exampleDialogs`.
///
/// Single-turn entries carry `text`; two-turn entries carry `user` and
/// `assistant`. A non-empty `text` takes precedence when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDialog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,
}

impl ExampleDialog {
    /// A single-turn entry.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A two-turn entry.
    pub fn exchange(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            text: None,
            user: Some(user.into()),
            assistant: Some(assistant.into()),
        }
    }
}

/// Deserialize `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
