use std::fmt;

use async_trait::async_trait;

use super::notify::Subscription;
use super::types::{
    ClaudeDirectoryInfo, ClaudeMessage, ClaudeSession, ClaudeSettings, CommandLogEntry, IdeInfo,
    ProjectSummary, SessionStats, TodoItem,
};

/// Errors a backend call can surface to a view.
/// Every variant ends up as the text of an inline error panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport-level failure (timeout, connection refused).
    Network(String),
    /// The requested session or file does not exist.
    NotFound(String),
    /// The backend answered with something that could not be decoded.
    Parse(String),
    /// Local file I/O failed (export, configuration directory).
    Io(String),
    /// The backend refused the request (e.g. invalid settings).
    Rejected(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::NotFound(what) => write!(f, "not found: {what}"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Io(msg) => write!(f, "I/O error: {msg}"),
            ApiError::Rejected(msg) => write!(f, "request rejected: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The dashboard's only window onto session data.
///
/// The real implementation lives outside this crate; [`MockApi`](super::MockApi)
/// stands in for demos and tests.
#[async_trait]
pub trait ManagerApi: Send + Sync {
    /// Human-readable name of the data source, shown in the title bar.
    fn name(&self) -> &str;

    async fn get_all_sessions(&self) -> ApiResult<Vec<ClaudeSession>>;

    /// Sessions modified since the previous call (delta fetch for selective refresh).
    async fn get_changed_sessions(&self) -> ApiResult<Vec<ClaudeSession>>;

    /// Non-summary messages of one session, in transcript order.
    async fn get_session_messages(&self, session_id: &str) -> ApiResult<Vec<ClaudeMessage>>;

    async fn search_sessions(&self, query: &str) -> ApiResult<Vec<ClaudeSession>>;

    async fn get_command_history(&self) -> ApiResult<Vec<CommandLogEntry>>;

    async fn search_commands(&self, query: &str) -> ApiResult<Vec<CommandLogEntry>>;

    async fn get_todos(&self) -> ApiResult<Vec<TodoItem>>;

    async fn get_settings(&self) -> ApiResult<ClaudeSettings>;

    async fn save_settings(&self, settings: &ClaudeSettings) -> ApiResult<()>;

    async fn get_project_summary(&self) -> ApiResult<Vec<ProjectSummary>>;

    async fn get_session_stats(&self) -> ApiResult<SessionStats>;

    /// Pretty-printed JSON array of the session's non-summary messages.
    async fn export_session_data(&self, session_id: &str) -> ApiResult<String>;

    async fn activate_ide_window(&self, ide_info: &IdeInfo) -> ApiResult<()>;

    async fn get_claude_directory_info(&self) -> ApiResult<ClaudeDirectoryInfo>;

    async fn read_claude_file(&self, path: &str) -> ApiResult<String>;

    async fn write_claude_file(&self, path: &str, content: &str) -> ApiResult<()>;

    /// Subscribe to change notifications. Dropping the subscription unsubscribes.
    fn changes(&self) -> Subscription;
}
