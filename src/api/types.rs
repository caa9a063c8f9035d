//! # Data Model
//!
//! Records returned by the [`ManagerApi`](super::ManagerApi). Everything here
//! is plain data: fetched once, held by the view that asked for it, and
//! replaced wholesale on the next fetch.
//!
//! JSON field names follow the assistant's on-disk formats (`defaultMode`,
//! `PreToolUse`, `leafUuid`) so records round-trip through export and the
//! configuration files unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Sessions
// ============================================================================

/// Connection details for the IDE window a session was started from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdeInfo {
    pub pid: u32,
    pub workspace_folders: Vec<String>,
    pub ide_name: String,
    pub transport: String,
    pub running_in_windows: bool,
    pub auth_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaudeSession {
    pub session_id: String,
    pub project_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
    pub git_branch: Option<String>,
    pub latest_content_preview: Option<String>,
    pub ide_info: Option<IdeInfo>,
    pub is_processing: bool,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Processing,
    Completed,
    Stopped,
    Error,
}

/// One record of a session transcript.
///
/// Summary records carry neither `uuid` nor `timestamp`; keeping them in their
/// own variant means no code path can ask a summary for either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "message_type")]
pub enum ClaudeMessage {
    #[serde(rename = "user")]
    User(ChatMessage),
    #[serde(rename = "assistant")]
    Assistant(ChatMessage),
    #[serde(rename = "summary")]
    Summary(SummaryMessage),
}

impl ClaudeMessage {
    /// Session the message belongs to. Summaries are not bound to one.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            ClaudeMessage::User(m) | ClaudeMessage::Assistant(m) => Some(&m.session_id),
            ClaudeMessage::Summary(_) => None,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, ClaudeMessage::Summary(_))
    }

    /// Wire name of the variant (`user`, `assistant`, `summary`).
    pub fn kind(&self) -> &'static str {
        match self {
            ClaudeMessage::User(_) => "user",
            ClaudeMessage::Assistant(_) => "assistant",
            ClaudeMessage::Summary(_) => "summary",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub uuid: String,
    pub parent_uuid: Option<String>,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub cwd: String,
    pub git_branch: Option<String>,
    pub processing_status: ProcessingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryMessage {
    pub summary: String,
    #[serde(rename = "leafUuid")]
    pub leaf_uuid: String,
}

/// Message payload: a raw string (typed prompts, slash commands) or a list of
/// structured blocks (assistant replies).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text { role: String, content: String },
    Blocks { role: String, content: Vec<ContentBlock> },
}

impl MessageContent {
    pub fn role(&self) -> &str {
        match self {
            MessageContent::Text { role, .. } | MessageContent::Blocks { role, .. } => role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// Any block type this dashboard does not know how to draw.
    #[serde(other)]
    Unknown,
}

// ============================================================================
// Commands and to-dos
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandLogEntry {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub command: String,
    pub cwd: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoItem {
    pub id: String,
    pub content: String,
    pub status: TodoStatus,
    pub priority: TodoPriority,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn label(self) -> &'static str {
        match self {
            TodoStatus::Pending => "Pending",
            TodoStatus::InProgress => "In progress",
            TodoStatus::Completed => "Completed",
        }
    }

    /// Not yet done.
    pub fn is_open(self) -> bool {
        matches!(self, TodoStatus::Pending | TodoStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    Low,
    Medium,
    High,
}

impl TodoPriority {
    pub fn label(self) -> &'static str {
        match self {
            TodoPriority::Low => "low",
            TodoPriority::Medium => "medium",
            TodoPriority::High => "high",
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ClaudeSettings {
    pub permissions: PermissionSettings,
    pub hooks: HookSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PermissionSettings {
    #[serde(rename = "defaultMode")]
    pub default_mode: String,
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HookSettings {
    #[serde(rename = "PreToolUse")]
    pub pre_tool_use: Vec<HookMatcher>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HookMatcher {
    pub matcher: String,
    pub hooks: Vec<Hook>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hook {
    #[serde(rename = "type")]
    pub hook_type: String,
    pub command: String,
}

// ============================================================================
// Aggregates
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSummary {
    pub project_path: String,
    pub session_count: usize,
    pub last_activity: DateTime<Utc>,
    pub total_messages: usize,
    pub active_todos: usize,
    pub latest_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub total_messages: usize,
    pub total_commands: usize,
    pub active_projects: usize,
    pub pending_todos: usize,
}

// ============================================================================
// Configuration directory
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaudeFileInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub is_directory: bool,
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaudeDirectoryInfo {
    pub path: String,
    pub files: Vec<ClaudeFileInfo>,
    pub total_size: u64,
}

/// Something under the configuration directory changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub reason: String,
    pub paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_parsing() {
        let todo_data = r#"[{"id":"1","content":"Test","status":"in_progress","priority":"high"}]"#;
        let todos: Vec<TodoItem> = serde_json::from_str(todo_data).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].status, TodoStatus::InProgress);
        assert_eq!(todos[0].priority, TodoPriority::High);
    }

    #[test]
    fn test_settings_parsing_uses_wire_names() {
        let settings_data = r#"{
            "permissions": {
                "defaultMode": "bypassPermissions",
                "allow": ["Bash(ls:*)"],
                "deny": ["Bash(rm:*)"]
            },
            "hooks": {
                "PreToolUse": [
                    {"matcher": "Bash", "hooks": [{"type": "command", "command": "audit.sh"}]}
                ]
            }
        }"#;
        let settings: ClaudeSettings = serde_json::from_str(settings_data).unwrap();
        assert_eq!(settings.permissions.default_mode, "bypassPermissions");
        assert_eq!(settings.permissions.allow, vec!["Bash(ls:*)"]);
        assert_eq!(settings.hooks.pre_tool_use[0].hooks[0].hook_type, "command");

        let json = serde_json::to_value(&settings).unwrap();
        assert!(json["permissions"].get("defaultMode").is_some());
        assert!(json["hooks"].get("PreToolUse").is_some());
    }

    #[test]
    fn test_message_tagged_by_message_type() {
        let raw = r#"{
            "message_type": "assistant",
            "uuid": "a1",
            "parent_uuid": null,
            "session_id": "s1",
            "timestamp": "2025-07-20T05:00:00Z",
            "cwd": "/p",
            "git_branch": "main",
            "processing_status": "completed",
            "content": {"role": "assistant", "content": [
                {"type": "text", "text": "hi"},
                {"type": "tool_use", "id": "t1", "name": "Bash", "input": {"command": "ls"}},
                {"type": "thinking", "thinking": "hmm"}
            ]}
        }"#;
        let message: ClaudeMessage = serde_json::from_str(raw).unwrap();
        let ClaudeMessage::Assistant(chat) = &message else {
            panic!("expected assistant, got {message:?}");
        };
        let MessageContent::Blocks { content, .. } = &chat.content else {
            panic!("expected blocks");
        };
        assert_eq!(content.len(), 3);
        assert!(matches!(content[2], ContentBlock::Unknown));
        assert_eq!(message.session_id(), Some("s1"));
    }

    #[test]
    fn test_summary_has_no_session() {
        let raw = r#"{"message_type": "summary", "summary": "Did things", "leafUuid": "x"}"#;
        let message: ClaudeMessage = serde_json::from_str(raw).unwrap();
        assert!(message.is_summary());
        assert_eq!(message.session_id(), None);
        assert_eq!(message.kind(), "summary");
    }

    #[test]
    fn test_string_content_is_text_variant() {
        let content: MessageContent =
            serde_json::from_str(r#"{"role": "user", "content": "hello"}"#).unwrap();
        assert_eq!(
            content,
            MessageContent::Text {
                role: "user".into(),
                content: "hello".into()
            }
        );
        assert_eq!(content.role(), "user");
    }
}
