//! Property tests for the card codec over generated records.

use karta::card::mapper::{resolve_personality, resolve_scenario};
use karta::card::{CharacterData, PersonalityFields, ScenarioFields, BLANK_PNG};
use karta::png::{build_chunk, list_chunks, TRAILER_LEN};
use karta::prelude::*;
use proptest::prelude::*;

/// Arbitrary text, including multi-byte and astral characters.
fn any_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 .,!?'\"\\\\/\n\t]{0,24}",
        "\\PC{0,24}",
        "[äöüßéñçøåœ日本語한국어🌟🚀]{1,12}",
    ]
}

fn any_personality() -> impl Strategy<Value = Option<Personality>> {
    prop_oneof![
        Just(None),
        any_text().prop_map(|text| Some(Personality::Text(text))),
        (any_text(), proptest::option::of(any_text())).prop_map(|(personality, system_prompt)| {
            Some(Personality::Structured(PersonalityFields {
                character_data: Some(CharacterData {
                    personality: Some(personality),
                    system_prompt,
                }),
                ..PersonalityFields::default()
            }))
        }),
        (
            proptest::option::of(any_text()),
            proptest::option::of(any_text()),
            proptest::option::of(any_text()),
        )
            .prop_map(|(personality, text, system_prompt)| {
                Some(Personality::Structured(PersonalityFields {
                    character_data: None,
                    personality,
                    text,
                    system_prompt,
                }))
            }),
    ]
}

fn any_scenario() -> impl Strategy<Value = Option<Scenario>> {
    prop_oneof![
        Just(None),
        any_text().prop_map(|text| Some(Scenario::Text(text))),
        (proptest::option::of(any_text()), proptest::option::of(any_text()))
            .prop_map(|(scenario, text)| Some(Scenario::Structured(ScenarioFields { scenario, text }))),
    ]
}

fn any_initial_messages() -> impl Strategy<Value = Vec<InitialMessage>> {
    prop::collection::vec(
        prop_oneof![
            any_text().prop_map(InitialMessage::Text),
            proptest::option::of(any_text()).prop_map(|text| InitialMessage::Entry { text }),
        ],
        0..3,
    )
}

fn any_dialogs() -> impl Strategy<Value = Vec<ExampleDialog>> {
    prop::collection::vec(
        prop_oneof![
            any_text().prop_map(ExampleDialog::single),
            (any_text(), any_text()).prop_map(|(user, assistant)| ExampleDialog::exchange(user, assistant)),
        ],
        0..4,
    )
}

fn any_record() -> impl Strategy<Value = CharacterRecord> {
    (
        any_text(),
        any_text(),
        prop::collection::vec(any_text(), 0..5),
        any_personality(),
        any_scenario(),
        any_initial_messages(),
        any_dialogs(),
    )
        .prop_map(
            |(name, description, tags, personality, scenario, initial_messages, example_dialogs)| {
                CharacterRecord {
                    profile: Profile {
                        name,
                        description,
                        tags,
                    },
                    personality,
                    scenario,
                    initial_messages,
                    example_dialogs,
                    reconstructed: false,
                }
            },
        )
}

/// The blank image, optionally carrying an extra ancillary chunk.
fn any_source() -> impl Strategy<Value = Option<Vec<u8>>> {
    prop_oneof![
        Just(None),
        Just(Some(BLANK_PNG.to_vec())),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(|data| {
            let extra = build_chunk(b"zTXt", &data).unwrap();
            let split = BLANK_PNG.len() - TRAILER_LEN;
            let mut png = BLANK_PNG[..split].to_vec();
            png.extend_from_slice(&extra);
            png.extend_from_slice(&BLANK_PNG[split..]);
            Some(png)
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn core_fields_survive_a_round_trip(record in any_record(), source in any_source()) {
        let png = encode_to_png(&record, source.as_deref()).unwrap();
        let back = decode_from_png(&png).unwrap();

        prop_assert_eq!(&back.profile, &record.profile);
        prop_assert_eq!(
            resolve_personality(back.personality.as_ref()),
            resolve_personality(record.personality.as_ref())
        );
        prop_assert_eq!(
            resolve_scenario(back.scenario.as_ref()),
            resolve_scenario(record.scenario.as_ref())
        );
        prop_assert_eq!(
            back.initial_messages.first().map(|m| m.text()).unwrap_or_default(),
            record.initial_messages.first().map(|m| m.text()).unwrap_or_default()
        );
    }

    #[test]
    fn encoding_is_deterministic_and_well_formed(record in any_record(), source in any_source()) {
        let first = encode_to_png(&record, source.as_deref()).unwrap();
        let second = encode_to_png(&record, source.as_deref()).unwrap();
        prop_assert_eq!(&first, &second);

        let base_len = source.as_deref().unwrap_or(BLANK_PNG).len();
        let chunks = list_chunks(&first).unwrap();
        prop_assert!(chunks.iter().all(|c| c.integrity_ok));

        let card = chunks.iter().rev().find(|c| c.chunk_type == ChunkType::TEXT).unwrap();
        prop_assert_eq!(card.offset, base_len - TRAILER_LEN);
        prop_assert_eq!(first.len(), base_len + 12 + card.data.len());
    }
}
