//! Flattening of example dialogs into `mes_example` and back.
//!
//! Each dialog becomes a block:
//!
//! ```text
//! <START>
//! {{user}}: <user line>
//! {{char}}: <assistant line>
//! ```
//!
//! Single-turn entries put their text on the `{{user}}` line and leave the
//! `{{char}}` line empty, so after flattening they look exactly like a
//! two-turn entry with an empty reply. Parsing cannot tell them apart.

use crate::record::ExampleDialog;

/// Marker that opens every dialog block.
pub const DIALOG_MARKER: &str = "<START>";

const USER_PREFIX: &str = "{{user}}:";
const CHAR_PREFIX: &str = "{{char}}:";

/// Flatten dialogs into one `mes_example` string.
pub fn format_dialogs(dialogs: &[ExampleDialog]) -> String {
    dialogs
        .iter()
        .map(format_dialog)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_dialog(dialog: &ExampleDialog) -> String {
    match dialog.text.as_deref().filter(|t| !t.is_empty()) {
        Some(text) => format!("{DIALOG_MARKER}\n{USER_PREFIX} {text}\n{CHAR_PREFIX} "),
        None => format!(
            "{DIALOG_MARKER}\n{USER_PREFIX} {}\n{CHAR_PREFIX} {}",
            dialog.user.as_deref().unwrap_or_default(),
            dialog.assistant.as_deref().unwrap_or_default(),
        ),
    }
}

/// Rebuild two-turn dialogs from a `mes_example` string.
///
/// Lines that follow a `{{user}}:` or `{{char}}:` line without a prefix of
/// their own are treated as continuations of it. Repeated turns within one
/// block are joined with newlines.
pub fn parse_dialogs(mes_example: &str) -> Vec<ExampleDialog> {
    mes_example
        .split(DIALOG_MARKER)
        .filter(|segment| !segment.trim().is_empty())
        .map(parse_block)
        .collect()
}

#[derive(Clone, Copy)]
enum Speaker {
    User,
    Char,
}

fn parse_block(block: &str) -> ExampleDialog {
    let mut user = String::new();
    let mut assistant = String::new();
    let mut speaker = None;

    for line in block.lines() {
        let (target, content) = if let Some(rest) = line.strip_prefix(USER_PREFIX) {
            speaker = Some(Speaker::User);
            (Speaker::User, strip_one_space(rest))
        } else if let Some(rest) = line.strip_prefix(CHAR_PREFIX) {
            speaker = Some(Speaker::Char);
            (Speaker::Char, strip_one_space(rest))
        } else if let Some(current) = speaker {
            (current, line)
        } else {
            // Text before the first speaker line has nowhere to go
            continue;
        };

        let buf = match target {
            Speaker::User => &mut user,
            Speaker::Char => &mut assistant,
        };
        if !buf.is_empty() {
            buf.push('\n');
        }
        buf.push_str(content);
    }

    ExampleDialog::exchange(user.trim_end(), assistant.trim_end())
}

fn strip_one_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_dialogs(&[]), "");
    }

    #[test]
    fn test_format_shapes() {
        let dialogs = [
            ExampleDialog::single("Wave"),
            ExampleDialog::exchange("Hello", "Hi there"),
            ExampleDialog::default(),
        ];
        assert_eq!(
            format_dialogs(&dialogs),
            "<START>\n{{user}}: Wave\n{{char}}: \n\
             <START>\n{{user}}: Hello\n{{char}}: Hi there\n\
             <START>\n{{user}}: \n{{char}}: "
        );
    }

    #[test]
    fn test_empty_text_falls_back_to_exchange() {
        let dialog = ExampleDialog {
            text: Some(String::new()),
            user: Some("U".into()),
            assistant: Some("A".into()),
        };
        assert_eq!(format_dialogs(&[dialog]), "<START>\n{{user}}: U\n{{char}}: A");
    }

    #[test]
    fn test_parse_round_trip_of_exchanges() {
        let dialogs = vec![
            ExampleDialog::exchange("Hello", "Hi there"),
            ExampleDialog::exchange("How are you?", "Fine."),
        ];
        assert_eq!(parse_dialogs(&format_dialogs(&dialogs)), dialogs);
    }

    #[test]
    fn test_single_turn_is_reconstructed_as_exchange() {
        let flat = format_dialogs(&[ExampleDialog::single("Wave")]);
        assert_eq!(parse_dialogs(&flat), [ExampleDialog::exchange("Wave", "")]);
    }

    #[test]
    fn test_parse_multiline_and_loose_prefixes() {
        let flat = "<START>\n{{user}}:first\nsecond\n{{char}}: reply\n  indented\n";
        assert_eq!(
            parse_dialogs(flat),
            [ExampleDialog::exchange("first\nsecond", "reply\n  indented")]
        );
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        assert!(parse_dialogs("").is_empty());
        assert!(parse_dialogs("<START>\n<START>  \n").is_empty());
    }

    #[test]
    fn test_parse_repeated_turns() {
        let flat = "<START>\n{{user}}: a\n{{char}}: b\n{{user}}: c\n{{char}}: d";
        assert_eq!(parse_dialogs(flat), [ExampleDialog::exchange("a\nc", "b\nd")]);
    }

    #[test]
    fn test_parse_crlf() {
        let flat = "<START>\r\n{{user}}: a\r\n{{char}}: b\r\n";
        assert_eq!(parse_dialogs(flat), [ExampleDialog::exchange("a", "b")]);
    }
}
