//! # Message Classification
//!
//! Maps a transcript record to a display model. Nothing here knows about the
//! terminal: the TUI decides how a [`BlockView::Diff`] or a
//! [`MessageView::Command`] looks, this module only decides which one a
//! message is.
//!
//! Rules, first match wins:
//!
//! ```text
//! summary record               → MessageView::Summary
//! user text with command tags  → MessageView::Command
//! any unknown block            → MessageView::Raw (whole record as JSON)
//! text that parses as {old_string, new_string} → BlockView::Diff
//! text with markdown structure → BlockView::Markdown (if enabled)
//! other text                   → BlockView::Plain
//! tool_use block               → BlockView::ToolUse
//! ```
//!
//! Classification never fails. Malformed JSON in a text block is simply "not
//! a diff".

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::api::types::{ChatMessage, ClaudeMessage, ContentBlock, MessageContent};

static MARKDOWN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6} |[*-] |```|\d+\. )").unwrap());
static COMMAND_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<command-name>(.*?)</command-name>").unwrap());
static COMMAND_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<command-message>(.*?)</command-message>").unwrap());
static COMMAND_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<command-args>(.*?)</command-args>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub render_markdown: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            render_markdown: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageView {
    Summary { text: String },
    Command(CommandCard),
    Blocks(Vec<BlockView>),
    /// Pretty-printed JSON of a record nothing else could handle.
    Raw(String),
}

/// A slash command typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCard {
    pub name: String,
    pub message: Option<String>,
    pub args: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockView {
    Diff {
        removed: String,
        added: String,
        file_path: Option<String>,
    },
    Markdown(String),
    Plain(String),
    ToolUse { name: String, input: String },
}

pub fn classify(message: &ClaudeMessage, options: &RenderOptions) -> MessageView {
    match message {
        ClaudeMessage::Summary(summary) => MessageView::Summary {
            text: summary.summary.clone(),
        },
        ClaudeMessage::User(chat) => {
            if let MessageContent::Text { content, .. } = &chat.content
                && let Some(card) = extract_command(content)
            {
                return MessageView::Command(card);
            }
            classify_chat(message, chat, options)
        }
        ClaudeMessage::Assistant(chat) => classify_chat(message, chat, options),
    }
}

/// Classify an untyped record, e.g. one with a `message_type` this build
/// does not know.
pub fn classify_value(record: &Value, options: &RenderOptions) -> MessageView {
    match serde_json::from_value::<ClaudeMessage>(record.clone()) {
        Ok(message) => classify(&message, options),
        Err(_) => MessageView::Raw(pretty(record)),
    }
}

fn classify_chat(message: &ClaudeMessage, chat: &ChatMessage, options: &RenderOptions) -> MessageView {
    match &chat.content {
        MessageContent::Text { content, .. } => MessageView::Blocks(vec![classify_text(content, options)]),
        MessageContent::Blocks { content, .. } => {
            if content.iter().any(|b| matches!(b, ContentBlock::Unknown)) {
                let record = serde_json::to_value(message).unwrap_or(Value::Null);
                return MessageView::Raw(pretty(&record));
            }
            MessageView::Blocks(
                content
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::Text { text } => Some(classify_text(text, options)),
                        ContentBlock::ToolUse { name, input, .. } => Some(BlockView::ToolUse {
                            name: name.clone(),
                            input: pretty(input),
                        }),
                        ContentBlock::Unknown => None,
                    })
                    .collect(),
            )
        }
    }
}

pub fn classify_text(text: &str, options: &RenderOptions) -> BlockView {
    if let Some(diff) = parse_diff(text) {
        return diff;
    }
    if options.render_markdown && looks_like_markdown(text) {
        BlockView::Markdown(text.to_string())
    } else {
        BlockView::Plain(text.to_string())
    }
}

fn parse_diff(text: &str) -> Option<BlockView> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    let object = value.as_object()?;
    let removed = object.get("old_string")?;
    let added = object.get("new_string")?;
    Some(BlockView::Diff {
        removed: as_text(removed),
        added: as_text(added),
        file_path: object
            .get("file_path")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn looks_like_markdown(text: &str) -> bool {
    MARKDOWN_LINE.is_match(text)
}

/// Pull the command name, message, and arguments out of a tagged user
/// message. Triggers on any text containing both name tags.
pub fn extract_command(content: &str) -> Option<CommandCard> {
    if !(content.contains("<command-name>") && content.contains("</command-name>")) {
        return None;
    }
    let capture = |re: &Regex| {
        re.captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };
    Some(CommandCard {
        name: capture(&COMMAND_NAME).unwrap_or_else(|| "Unknown".to_string()),
        message: capture(&COMMAND_MESSAGE),
        args: capture(&COMMAND_ARGS),
    })
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SummaryMessage;
    use crate::test_support::{assistant_blocks, user_text};
    use serde_json::json;

    fn markdown_on() -> RenderOptions {
        RenderOptions::default()
    }

    fn markdown_off() -> RenderOptions {
        RenderOptions {
            render_markdown: false,
        }
    }

    #[test]
    fn test_summary_message() {
        let message = ClaudeMessage::Summary(SummaryMessage {
            summary: "Refactored auth".into(),
            leaf_uuid: "x".into(),
        });
        assert_eq!(
            classify(&message, &markdown_on()),
            MessageView::Summary {
                text: "Refactored auth".into()
            }
        );
    }

    #[test]
    fn test_json_diff_block() {
        let text = r#"{"old_string":"a","new_string":"b","file_path":"src/x.rs"}"#;
        assert_eq!(
            classify_text(text, &markdown_on()),
            BlockView::Diff {
                removed: "a".into(),
                added: "b".into(),
                file_path: Some("src/x.rs".into())
            }
        );
    }

    #[test]
    fn test_json_without_both_keys_is_not_a_diff() {
        let text = r#"{"old_string":"a"}"#;
        assert_eq!(classify_text(text, &markdown_off()), BlockView::Plain(text.into()));
    }

    #[test]
    fn test_malformed_json_falls_through_to_markdown() {
        let text = "{\"old_string\": \"a\",\n# broken";
        assert_eq!(classify_text(text, &markdown_on()), BlockView::Markdown(text.into()));
    }

    #[test]
    fn test_markdown_heuristic() {
        for text in ["# Title", "intro\n- item", "* star", "```rust\nfn x() {}\n```", "1. first"] {
            assert!(looks_like_markdown(text), "{text:?}");
        }
        for text in [
            "plain words",
            "#hashtag",
            "-dash",
            "v1.2 release",
            "-\nitem",
            "#\tx",
            "1.\tfirst",
        ] {
            assert!(!looks_like_markdown(text), "{text:?}");
        }
    }

    #[test]
    fn test_markdown_disabled_keeps_plain_text() {
        let text = "## Heading\n\n  indented";
        assert_eq!(classify_text(text, &markdown_off()), BlockView::Plain(text.into()));
    }

    #[test]
    fn test_tool_use_is_pretty_printed() {
        let message = assistant_blocks(
            "s1",
            vec![ContentBlock::ToolUse {
                id: "t1".into(),
                name: "Bash".into(),
                input: json!({"command": "ls"}),
            }],
        );
        let MessageView::Blocks(blocks) = classify(&message, &markdown_on()) else {
            panic!("expected blocks");
        };
        assert_eq!(
            blocks,
            vec![BlockView::ToolUse {
                name: "Bash".into(),
                input: "{\n  \"command\": \"ls\"\n}".into()
            }]
        );
    }

    #[test]
    fn test_command_card_extraction() {
        let message = user_text(
            "s1",
            "<command-message>review is running</command-message>\n<command-name>/review</command-name>\n<command-args>src/lib.rs</command-args>",
        );
        assert_eq!(
            classify(&message, &markdown_on()),
            MessageView::Command(CommandCard {
                name: "/review".into(),
                message: Some("review is running".into()),
                args: Some("src/lib.rs".into()),
            })
        );
    }

    #[test]
    fn test_command_card_with_only_name() {
        let card = extract_command("<command-name>/init</command-name>").unwrap();
        assert_eq!(card.name, "/init");
        assert_eq!(card.message, None);
        assert_eq!(card.args, None);
    }

    #[test]
    fn test_command_name_out_of_order_is_unknown() {
        let card = extract_command("</command-name> oops <command-name>").unwrap();
        assert_eq!(card.name, "Unknown");
    }

    #[test]
    fn test_command_tags_only_apply_to_user_strings() {
        let message = assistant_blocks(
            "s1",
            vec![ContentBlock::Text {
                text: "<command-name>/x</command-name>".into(),
            }],
        );
        assert!(matches!(classify(&message, &markdown_on()), MessageView::Blocks(_)));
    }

    #[test]
    fn test_plain_user_text() {
        let message = user_text("s1", "hello there");
        assert_eq!(
            classify(&message, &markdown_on()),
            MessageView::Blocks(vec![BlockView::Plain("hello there".into())])
        );
    }

    #[test]
    fn test_unknown_block_renders_whole_record() {
        let message = assistant_blocks(
            "s1",
            vec![ContentBlock::Text { text: "hi".into() }, ContentBlock::Unknown],
        );
        let MessageView::Raw(json) = classify(&message, &markdown_on()) else {
            panic!("expected raw fallback");
        };
        assert!(json.contains("\"message_type\": \"assistant\""));
        assert!(json.contains("\"session_id\": \"s1\""));
    }

    #[test]
    fn test_unknown_message_type_renders_raw() {
        let record = json!({"message_type": "system", "note": "compacted"});
        let MessageView::Raw(json) = classify_value(&record, &markdown_on()) else {
            panic!("expected raw fallback");
        };
        assert!(json.contains("\"note\": \"compacted\""));
    }

    #[test]
    fn test_known_value_is_classified_normally() {
        let record = json!({"message_type": "summary", "summary": "Done", "leafUuid": "l"});
        assert_eq!(
            classify_value(&record, &markdown_on()),
            MessageView::Summary { text: "Done".into() }
        );
    }
}
