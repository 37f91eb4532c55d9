//! Resolution of the multi-shape `personality` and `scenario` fields.
//!
//! Each shape is handled by a small matcher; the tables list them in
//! priority order and the first matcher that returns `Some` wins.

use crate::record::{Personality, Scenario};

/// Personality text and system prompt extracted from a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPersonality {
    pub personality: String,
    pub system_prompt: String,
}

type PersonalityMatcher = fn(&Personality) -> Option<ResolvedPersonality>;
type ScenarioMatcher = fn(&Scenario) -> Option<String>;

/// Personality matchers, highest priority first.
pub const PERSONALITY_MATCHERS: &[PersonalityMatcher] =
    &[plain_personality, nested_character_data, personality_fields];

/// Scenario matchers, highest priority first.
pub const SCENARIO_MATCHERS: &[ScenarioMatcher] = &[plain_scenario, scenario_field, scenario_text];

/// Resolve a personality, falling back to empty strings.
pub fn resolve_personality(personality: Option<&Personality>) -> ResolvedPersonality {
    personality
        .and_then(|p| PERSONALITY_MATCHERS.iter().find_map(|matcher| matcher(p)))
        .unwrap_or_default()
}

/// Resolve a scenario, falling back to an empty string.
pub fn resolve_scenario(scenario: Option<&Scenario>) -> String {
    scenario
        .and_then(|s| SCENARIO_MATCHERS.iter().find_map(|matcher| matcher(s)))
        .unwrap_or_default()
}

fn plain_personality(personality: &Personality) -> Option<ResolvedPersonality> {
    match personality {
        Personality::Text(text) => Some(ResolvedPersonality {
            personality: text.clone(),
            system_prompt: String::new(),
        }),
        _ => None,
    }
}

fn nested_character_data(personality: &Personality) -> Option<ResolvedPersonality> {
    let Personality::Structured(fields) = personality else {
        return None;
    };
    let data = fields.character_data.as_ref()?;
    Some(ResolvedPersonality {
        personality: data.personality.clone().unwrap_or_default(),
        system_prompt: data.system_prompt.clone().unwrap_or_default(),
    })
}

fn personality_fields(personality: &Personality) -> Option<ResolvedPersonality> {
    let Personality::Structured(fields) = personality else {
        return None;
    };
    Some(ResolvedPersonality {
        personality: first_non_empty([&fields.personality, &fields.text]),
        system_prompt: fields.system_prompt.clone().unwrap_or_default(),
    })
}

fn plain_scenario(scenario: &Scenario) -> Option<String> {
    match scenario {
        Scenario::Text(text) => Some(text.clone()),
        _ => None,
    }
}

fn scenario_field(scenario: &Scenario) -> Option<String> {
    match scenario {
        Scenario::Structured(fields) => non_empty(&fields.scenario),
        _ => None,
    }
}

fn scenario_text(scenario: &Scenario) -> Option<String> {
    match scenario {
        Scenario::Structured(fields) => non_empty(&fields.text),
        _ => None,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn first_non_empty<const N: usize>(candidates: [&Option<String>; N]) -> String {
    candidates
        .into_iter()
        .find_map(non_empty)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CharacterData, PersonalityFields, ScenarioFields};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resolved(personality: &str, system_prompt: &str) -> ResolvedPersonality {
        ResolvedPersonality {
            personality: personality.into(),
            system_prompt: system_prompt.into(),
        }
    }

    #[test]
    fn test_plain_personality() {
        let p = Personality::Text("Curious.".into());
        assert_eq!(resolve_personality(Some(&p)), resolved("Curious.", ""));
    }

    #[test]
    fn test_character_data_wins_over_fields() {
        let p = Personality::Structured(PersonalityFields {
            character_data: Some(CharacterData {
                personality: Some("Nested".into()),
                system_prompt: Some("Nested prompt".into()),
            }),
            personality: Some("Outer".into()),
            text: None,
            system_prompt: Some("Outer prompt".into()),
        });
        assert_eq!(resolve_personality(Some(&p)), resolved("Nested", "Nested prompt"));
    }

    #[test]
    fn test_empty_character_data_still_matches() {
        let p = Personality::Structured(PersonalityFields {
            character_data: Some(CharacterData::default()),
            personality: Some("Outer".into()),
            ..PersonalityFields::default()
        });
        assert_eq!(resolve_personality(Some(&p)), resolved("", ""));
    }

    #[test]
    fn test_personality_then_text() {
        let p = Personality::Structured(PersonalityFields {
            personality: Some(String::new()),
            text: Some("From text".into()),
            system_prompt: Some("Prompt".into()),
            ..PersonalityFields::default()
        });
        assert_eq!(resolve_personality(Some(&p)), resolved("From text", "Prompt"));

        let p = Personality::Structured(PersonalityFields {
            personality: Some("From personality".into()),
            text: Some("From text".into()),
            ..PersonalityFields::default()
        });
        assert_eq!(resolve_personality(Some(&p)), resolved("From personality", ""));
    }

    #[test]
    fn test_unknown_personality() {
        assert_eq!(resolve_personality(None), resolved("", ""));
        let p = Personality::Other(json!([1, 2, 3]));
        assert_eq!(resolve_personality(Some(&p)), resolved("", ""));
    }

    #[test]
    fn test_scenario_priority() {
        assert_eq!(resolve_scenario(Some(&Scenario::Text("Inn".into()))), "Inn");

        let both = Scenario::Structured(ScenarioFields {
            scenario: Some("Field".into()),
            text: Some("Text".into()),
        });
        assert_eq!(resolve_scenario(Some(&both)), "Field");

        let text_only = Scenario::Structured(ScenarioFields {
            scenario: Some(String::new()),
            text: Some("Text".into()),
        });
        assert_eq!(resolve_scenario(Some(&text_only)), "Text");

        assert_eq!(resolve_scenario(Some(&Scenario::Other(json!(3)))), "");
        assert_eq!(resolve_scenario(None), "");
    }
}
