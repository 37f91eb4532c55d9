//! Mapping between [`CharacterRecord`] and [`CardDocumentV2`].
//!
//! Both directions are pure. Encoding is total: every missing field becomes
//! an empty string. Decoding is best effort; example dialogs in particular
//! are rebuilt from flattened text and the record is flagged accordingly.

mod dialog;
mod resolve;

pub use dialog::{format_dialogs, parse_dialogs, DIALOG_MARKER};
pub use resolve::{
    resolve_personality, resolve_scenario, ResolvedPersonality, PERSONALITY_MATCHERS,
    SCENARIO_MATCHERS,
};

use serde_json::Map;

use crate::record::{CharacterRecord, InitialMessage, Personality, PersonalityFields, Profile, Scenario};
use crate::v2::{CardDocumentV2, CHARACTER_VERSION, CREATOR, CREATOR_NOTES};

/// Map a record to a V2 card document.
pub fn to_v2(record: &CharacterRecord) -> CardDocumentV2 {
    let ResolvedPersonality {
        personality,
        system_prompt,
    } = resolve_personality(record.personality.as_ref());

    CardDocumentV2 {
        name: record.profile.name.clone(),
        description: record.profile.description.clone(),
        personality,
        scenario: resolve_scenario(record.scenario.as_ref()),
        first_mes: record
            .initial_messages
            .first()
            .map(|message| message.text().to_string())
            .unwrap_or_default(),
        mes_example: format_dialogs(&record.example_dialogs),
        creator_notes: CREATOR_NOTES.to_string(),
        system_prompt,
        post_history_instructions: String::new(),
        alternate_greetings: Vec::new(),
        character_book: None,
        tags: record.profile.tags.clone(),
        creator: CREATOR.to_string(),
        character_version: CHARACTER_VERSION.to_string(),
        extensions: Map::new(),
    }
}

/// Map a V2 card document back to a partial record.
pub fn from_v2(doc: &CardDocumentV2) -> CharacterRecord {
    let example_dialogs = parse_dialogs(&doc.mes_example);
    let initial_messages = if doc.first_mes.is_empty() {
        Vec::new()
    } else {
        vec![InitialMessage::Entry {
            text: Some(doc.first_mes.clone()),
        }]
    };

    CharacterRecord {
        profile: Profile {
            name: doc.name.clone(),
            description: doc.description.clone(),
            tags: doc.tags.clone(),
        },
        personality: Some(Personality::Structured(PersonalityFields {
            personality: Some(doc.personality.clone()),
            system_prompt: Some(doc.system_prompt.clone()),
            ..PersonalityFields::default()
        })),
        scenario: Some(Scenario::Text(doc.scenario.clone())),
        initial_messages,
        reconstructed: !example_dialogs.is_empty(),
        example_dialogs,
    }
}
